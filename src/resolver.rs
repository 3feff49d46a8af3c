//! Derives the incident request from the annotations of an event.
//!
//! Every field has a fallback, so resolving never fails. Annotations with an
//! empty value are treated as if they were missing.

use crate::{event::ValidEvent, incident::IncidentRequest};

/// annotation keys read by the resolver
pub mod keys {
	pub const NAME: &str = "betteruptime/config/name";
	pub const SUMMARY: &str = "betteruptime/config/summary";
	pub const DESCRIPTION: &str = "betteruptime/config/description";
	pub const EMAIL: &str = "betteruptime/config/email";
	pub const SEND_PUSH: &str = "betteruptime/config/sendpush";
	pub const SEND_MAIL: &str = "betteruptime/config/sendmail";
	pub const CALL: &str = "betteruptime/config/call";
	pub const TEAM_WAIT: &str = "betteruptime/config/teamwait";
}

/// requester used when the check doesn't name one
pub const DEFAULT_REQUESTER_EMAIL: &str = "my-great-email@example.com";

impl IncidentRequest {
	/// Build the incident for an event.
	///
	/// # Arguments
	///
	/// * `event` - the validated event, both entity and check are named
	pub fn from_event(event: ValidEvent<'_>) -> Self {
		let ValidEvent { entity, check } = event;

		let name = entity
			.annotation(keys::NAME)
			.or_else(|| check.annotation(keys::NAME))
			.map_or_else(|| format!("{} - {}", entity.name(), check.name()), str::to_owned);

		let summary = check.annotation(keys::SUMMARY).unwrap_or_else(|| check.name()).to_owned();

		let description =
			check.annotation(keys::DESCRIPTION).unwrap_or(check.output.as_str()).to_owned();

		let requester_email =
			check.annotation(keys::EMAIL).unwrap_or(DEFAULT_REQUESTER_EMAIL).to_owned();

		// only presence matters, "false" enables a channel too
		let push = check.annotation(keys::SEND_PUSH).is_some();
		let email = check.annotation(keys::SEND_MAIL).is_some();
		let call = check.annotation(keys::CALL).is_some();

		let team_wait = check.annotation(keys::TEAM_WAIT).map_or(0, parse_team_wait);

		Self { requester_email, name, summary, description, call, email, push, team_wait }
	}
}

/// minutes to wait, anything that isn't a non-negative integer means 0
fn parse_team_wait(value: &str) -> u32 {
	match value.parse() {
		Ok(minutes) => minutes,
		Err(err) => {
			tracing::debug!(value, %err, "ignoring unparseable team wait annotation");
			0
		}
	}
}
