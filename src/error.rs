//! errors of a single handler invocation
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use crate::handler::Action;

/// Everything that can make an invocation fail. None of these are retried,
/// they all end up at the invocation boundary in `main`.
#[derive(Error, Debug)]
pub enum HandlerError {
	/// required setting missing or a setting has an invalid value
	#[error("{0}")]
	Configuration(String),

	/// settings could not be loaded from file, environment or command line
	#[error("failed to load settings")]
	Settings(#[from] config::ConfigError),

	/// stdin did not contain a parseable event
	#[error("failed to parse event")]
	EventFormat(#[source] serde_json::Error),

	/// the event misses data needed to build an incident
	#[error("invalid event: {0}")]
	InvalidEvent(&'static str),

	/// the incident request could not be marshaled
	#[error("failed to serialize incident request")]
	Serialize(#[source] serde_json::Error),

	/// the incident api replied with 201 but the body is not an incident
	#[error("failed to deserialize incident api response")]
	Deserialize(#[source] serde_json::Error),

	#[error("malformed incident api url {url:?}")]
	MalformedUrl {
		url: String,
		#[source]
		source: url::ParseError,
	},

	/// dns, connection or body transfer failure
	#[error("failed to reach incident api")]
	Transport(#[source] reqwest::Error),

	#[error("incident api request timed out after {0:?}")]
	Timeout(Duration),

	/// anything but 201 Created
	#[error("failed to {action} incident, unexpected status code {status}")]
	UnexpectedStatus { action: Action, status: StatusCode },
}

impl HandlerError {
	/// map a reqwest error into a timeout or a transport error
	pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
		if err.is_timeout() {
			Self::Timeout(timeout)
		} else {
			Self::Transport(err)
		}
	}
}
