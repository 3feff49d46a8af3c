//! Turns one event into one incident api call.
//!
//! A critical check opens an incident, every other status resolves one.
//! Nothing is remembered between invocations, so a resolve can't refer to the
//! id returned by an earlier create.
use std::fmt;

use crate::{
	client::IncidentClient,
	error::HandlerError,
	event::{Event, STATUS_CRITICAL},
	incident::{IncidentRequest, IncidentResponse},
	settings::Settings,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// what to do with the incident of an event
pub enum Action {
	Create,
	Resolve,
}

impl Action {
	/// classify a check status
	pub fn from_status(status: u32) -> Self {
		if status == STATUS_CRITICAL {
			Self::Create
		} else {
			Self::Resolve
		}
	}

	pub fn past_tense(self) -> &'static str {
		match self {
			Self::Create => "created",
			Self::Resolve => "resolved",
		}
	}
}

impl fmt::Display for Action {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Create => "create",
			Self::Resolve => "resolve",
		})
	}
}

/// Handle a single event.
///
/// # Arguments
///
/// * `settings` - validated settings, token and url of the api
///
/// * `client` - client used for the single outbound request
///
/// * `event` - the event read from stdin
pub async fn handle_event(
	settings: &Settings,
	client: &IncidentClient,
	event: &Event,
) -> Result<IncidentResponse, HandlerError> {
	let event = event.validate()?;
	let incident = IncidentRequest::from_event(event);
	let action = Action::from_status(event.check.status);

	tracing::debug!(
		%action,
		entity = event.entity.name(),
		check = event.check.name(),
		status = event.check.status,
		incident = incident.name.as_str(),
		"dispatching event"
	);

	match action {
		Action::Create => client.create_incident(&settings.url, &settings.token, &incident).await,
		Action::Resolve => client.resolve_incident(&settings.url, &settings.token, &incident).await,
	}
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use serde_json::json;
	use wiremock::{
		matchers::{body_partial_json, method},
		Mock, MockServer, ResponseTemplate,
	};

	use super::*;
	use crate::{event::tests::event, resolver::keys};

	fn settings(url: String) -> Settings {
		Settings { url, token: "secret".to_owned(), ..Settings::default() }
	}

	fn client() -> IncidentClient {
		IncidentClient::new(Duration::from_secs(5)).unwrap()
	}

	#[test]
	fn only_critical_creates() {
		assert_eq!(Action::from_status(2), Action::Create);

		for status in [0, 1, 3, 127, u32::MAX] {
			assert_eq!(Action::from_status(status), Action::Resolve, "status {status}");
		}
	}

	#[tokio::test]
	async fn critical_event_opens_named_incident() {
		let server = MockServer::start().await;

		Mock::given(method("POST"))
			.and(body_partial_json(json!({ "name": "DB Down" })))
			.respond_with(ResponseTemplate::new(201).set_body_json(json!({
				"data": { "id": 7, "type": "incident", "attributes": { "name": "DB Down" } }
			})))
			.expect(1)
			.mount(&server)
			.await;

		let event = event("db-1", &[(keys::NAME, "DB Down")], "postgres", &[], 2);
		let reply = handle_event(&settings(server.uri()), &client(), &event).await.unwrap();

		assert_eq!(reply.id(), 7);
	}

	#[tokio::test]
	async fn recovery_with_server_error_fails() {
		let server = MockServer::start().await;

		Mock::given(method("POST"))
			.and(body_partial_json(json!({ "name": "web-1 - disk-space" })))
			.respond_with(ResponseTemplate::new(500))
			.expect(1)
			.mount(&server)
			.await;

		let event = event("web-1", &[], "disk-space", &[], 0);
		let err = handle_event(&settings(server.uri()), &client(), &event).await.unwrap_err();

		assert!(matches!(err, HandlerError::UnexpectedStatus { action: Action::Resolve, .. }));
		assert!(err.to_string().contains("500"), "{err}");
	}

	#[tokio::test]
	async fn malformed_url_makes_no_call() {
		let server = MockServer::start().await;

		let event = event("web-1", &[], "disk-space", &[], 2);
		let err = handle_event(&settings("not a url".to_owned()), &client(), &event).await.unwrap_err();

		assert!(matches!(err, HandlerError::MalformedUrl { .. }), "{err:?}");
		assert!(server.received_requests().await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn invalid_event_makes_no_call() {
		let server = MockServer::start().await;

		let err = handle_event(&settings(server.uri()), &client(), &Event::default()).await.unwrap_err();

		assert!(matches!(err, HandlerError::InvalidEvent(_)), "{err:?}");
		assert!(server.received_requests().await.unwrap().is_empty());
	}
}
