//! monitoring event handler that opens and resolves Better Uptime incidents
//!
//! Invoked once per event with the event as json on stdin:
//! - a critical check (status 2) opens an incident
//! - any other status resolves it
//! - incident fields can be overridden with `betteruptime/config/*` annotations

use anyhow::{Context, Result};

use crate::{client::IncidentClient, event::Event, settings::Settings};

mod client;
mod error;
mod event;
mod handler;
mod incident;
mod log;
mod resolver;
mod settings;

/// exit the complete program if one thread panics
fn setup_panic_handler() {
	let default_panic = std::panic::take_hook();
	std::panic::set_hook(Box::new(move |info| {
		default_panic(info);
		std::process::exit(1);
	}));
}

/// the entry point of the program
#[tokio::main(flavor = "current_thread")]
pub async fn main() -> Result<()> {
	setup_panic_handler();

	let mut settings = Settings::load().context("failed to load config and command line arguments")?;

	log::setup_logging(&settings.log).context("could not setup logging")?;

	let event = Event::from_reader(std::io::stdin().lock()).context("failed to read event from stdin")?;
	event.validate().context("invalid event")?;

	settings.apply_annotations(&event).context("invalid settings in event annotations")?;
	settings.check()?;

	let client = IncidentClient::new(settings.timeout).context("failed to build incident client")?;

	handler::handle_event(&settings, &client, &event).await.context("failed to handle event")?;

	Ok(())
}
