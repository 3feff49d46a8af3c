use std::{ffi::OsString, time::Duration};

use clap::{Arg, Command};
use config::{Config, Environment, File};
use serde::Deserialize;
use serde_with::{serde_as, DurationSecondsWithFrac};

use crate::{error::HandlerError, event::Event, log::LogSettings};

/// incident api used when no url is configured
pub const DEFAULT_URL: &str = "https://betteruptime.com/api/v2/incidents";

/// seconds an api request may take
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// annotation prefix for per entity or per check settings
pub const KEYSPACE: &str = "sensu.io/plugins/sensu-handler-betteruptime/config";

/// prefix of the environment variables, e.g. `BETTER_UPTIME_TOKEN`
const ENV_PREFIX: &str = "BETTER_UPTIME";

/// Settings of one invocation. Built once in `main` and handed down by
/// reference.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
	/// bearer token for the incident api
	pub token: String,
	/// incident api endpoint
	pub url: String,
	/// fractional seconds are kept
	#[serde_as(as = "DurationSecondsWithFrac<f64>")]
	pub timeout: Duration,
	pub log: LogSettings,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			token: String::new(),
			url: DEFAULT_URL.to_owned(),
			timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
			log: LogSettings::default(),
		}
	}
}

fn command() -> Command<'static> {
	Command::new(clap::crate_name!())
		.version(clap::crate_version!())
		.about(clap::crate_description!())
		.author(clap::crate_authors!())
		.args(&[
			Arg::new("config")
				.help("path of an optional config file")
				.takes_value(true)
				.short('c')
				.long("config"),
			Arg::new("token")
				.help("API token for Better Uptime")
				.takes_value(true)
				.short('t')
				.long("token"),
			Arg::new("url")
				.help("incident API url")
				.takes_value(true)
				.short('u')
				.long("url"),
			Arg::new("timeout")
				.help("seconds to wait for the incident API")
				.takes_value(true)
				.long("timeout"),
			Arg::new("level")
				.help("log level")
				.possible_values(["error", "warn", "info", "debug", "trace"])
				.ignore_case(true)
				.takes_value(true)
				.long("log"),
		])
}

impl Settings {
	/// load settings from the process arguments and environment
	pub fn load() -> Result<Self, HandlerError> {
		Self::load_from(std::env::args_os(), None)
	}

	/// Load settings from defaults, an optional config file, the environment
	/// and the command line, later sources win.
	///
	/// # Arguments
	///
	/// * `args` - command line including the binary name
	///
	/// * `env` - environment to read instead of the process environment
	pub fn load_from<I, T>(
		args: I,
		env: Option<config::Map<String, String>>,
	) -> Result<Self, HandlerError>
	where
		I: IntoIterator<Item = T>,
		T: Into<OsString> + Clone,
	{
		let opts = command().get_matches_from(args);

		let mut builder = Config::builder()
			.set_default("token", "")?
			.set_default("url", DEFAULT_URL)?
			.set_default("timeout", DEFAULT_TIMEOUT_SECS as f64)?
			.set_default("log.level", "info")?;

		if let Some(path) = opts.value_of("config") {
			builder = builder.add_source(File::with_name(path));
		}

		builder = builder.add_source(
			Environment::with_prefix(ENV_PREFIX).prefix_separator("_").separator("__").source(env),
		);

		for (key, arg) in [("token", "token"), ("url", "url"), ("timeout", "timeout"), ("log.level", "level")] {
			if let Some(value) = opts.value_of(arg) {
				builder = builder.set_override(key, value)?;
			}
		}

		Ok(builder.build()?.try_deserialize()?)
	}

	/// Override settings from annotations in [KEYSPACE]. Entity annotations
	/// are applied first so check annotations win.
	pub fn apply_annotations(&mut self, event: &Event) -> Result<(), HandlerError> {
		let metadata = event
			.entity
			.iter()
			.map(|entity| &entity.metadata)
			.chain(event.check.iter().map(|check| &check.metadata));

		for meta in metadata {
			if let Some(token) = meta.annotation(&format!("{KEYSPACE}/apitoken")) {
				self.token = token.to_owned();
			}
			if let Some(url) = meta.annotation(&format!("{KEYSPACE}/url")) {
				self.url = url.to_owned();
			}
			if let Some(timeout) = meta.annotation(&format!("{KEYSPACE}/timeout")) {
				self.timeout = timeout
					.parse::<f64>()
					.ok()
					.and_then(|secs| Duration::try_from_secs_f64(secs).ok())
					.ok_or_else(|| {
						HandlerError::Configuration(format!("invalid timeout annotation {timeout:?}"))
					})?;
			}
		}

		Ok(())
	}

	/// make sure everything needed for an api call is there
	pub fn check(&self) -> Result<(), HandlerError> {
		if self.token.is_empty() {
			return Err(HandlerError::Configuration(
				"--token or BETTER_UPTIME_TOKEN environment variable is required".to_owned(),
			));
		}

		if self.timeout.is_zero() {
			return Err(HandlerError::Configuration("timeout must be greater than zero".to_owned()));
		}

		Ok(())
	}
}
