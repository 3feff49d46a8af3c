use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
	pub level: String,
}

impl Default for LogSettings {
	fn default() -> Self {
		Self { level: "info".to_owned() }
	}
}

/// build the filter for the configured level, http internals stay quiet
fn filter(settings: &LogSettings) -> Result<EnvFilter> {
	let level = tracing::Level::from_str(settings.level.as_str())
		.with_context(|| format!("invalid log level {:?}", settings.level))?;

	Ok(EnvFilter::default()
		.add_directive(LevelFilter::from_level(level).into())
		.add_directive("hyper=warn".parse()?)
		.add_directive("reqwest=warn".parse()?))
}

pub fn setup_logging(settings: &LogSettings) -> Result<()> {
	// stdout belongs to the event pipeline
	let fmt_layer = fmt::layer().with_writer(std::io::stderr);

	tracing_subscriber::registry()
		.with(filter(settings)?)
		.with(fmt_layer)
		.try_init()
		.context("failed to install tracing subscriber")?;

	Ok(())
}
