//! http client for the Better Uptime incident api
use std::time::Duration;

use reqwest::{header::CONTENT_TYPE, StatusCode};
use url::Url;

use crate::{
	error::HandlerError,
	handler::Action,
	incident::{IncidentRequest, IncidentResponse},
};

#[derive(Debug, Clone)]
/// Sends incidents to the api. Every call makes exactly one request, there
/// are no retries.
pub struct IncidentClient {
	/// http client
	client: reqwest::Client,
	/// upper bound for a whole request including the response body
	timeout: Duration,
}

impl IncidentClient {
	/// construct http client
	///
	/// # Arguments
	///
	/// * `timeout` - how long a request may take before it's cancelled
	pub fn new(timeout: Duration) -> Result<Self, HandlerError> {
		let client = reqwest::Client::builder()
			.timeout(timeout)
			.build()
			.map_err(HandlerError::Transport)?;

		Ok(Self { client, timeout })
	}

	/// open an incident
	pub async fn create_incident(
		&self,
		url: &str,
		token: &str,
		incident: &IncidentRequest,
	) -> Result<IncidentResponse, HandlerError> {
		self.send(Action::Create, url, token, incident).await
	}

	/// resolve an incident, the api tells create and resolve apart by payload
	pub async fn resolve_incident(
		&self,
		url: &str,
		token: &str,
		incident: &IncidentRequest,
	) -> Result<IncidentResponse, HandlerError> {
		self.send(Action::Resolve, url, token, incident).await
	}

	async fn send(
		&self,
		action: Action,
		url: &str,
		token: &str,
		incident: &IncidentRequest,
	) -> Result<IncidentResponse, HandlerError> {
		let body = serde_json::to_vec(incident).map_err(HandlerError::Serialize)?;

		let url = Url::parse(url)
			.map_err(|source| HandlerError::MalformedUrl { url: url.to_owned(), source })?;

		let response = self
			.client
			.post(url)
			.header(CONTENT_TYPE, "application/json")
			.bearer_auth(token)
			.body(body)
			.send()
			.await
			.map_err(|err| HandlerError::from_reqwest(err, self.timeout))?;

		let status = response.status();
		tracing::info!(%action, status = status.as_u16(), "incident api responded");

		if status != StatusCode::CREATED {
			return Err(HandlerError::UnexpectedStatus { action, status });
		}

		let body =
			response.bytes().await.map_err(|err| HandlerError::from_reqwest(err, self.timeout))?;
		let reply: IncidentResponse =
			serde_json::from_slice(&body).map_err(HandlerError::Deserialize)?;

		tracing::info!(%action, incident_id = reply.id(), "incident {}", action.past_tense());
		tracing::debug!(kind = %reply.data.kind, attributes = ?reply.data.attributes, "incident api reply");

		Ok(reply)
	}
}
