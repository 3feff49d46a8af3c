//! incident payloads exchanged with the Better Uptime incident api
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// body of a create or resolve request
pub struct IncidentRequest {
	pub requester_email: String,
	pub name: String,
	pub summary: String,
	pub description: String,
	pub call: bool,
	pub email: bool,
	pub push: bool,
	/// minutes before the incident is escalated to the team
	pub team_wait: u32,
}

#[derive(Clone, Debug, Deserialize)]
/// reply of the incident api
pub struct IncidentResponse {
	pub data: IncidentData,
}

impl IncidentResponse {
	pub fn id(&self) -> i64 {
		self.data.id
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct IncidentData {
	/// 0 if the api left it out
	#[serde(default)]
	pub id: i64,
	#[serde(default, rename = "type")]
	pub kind: String,
	#[serde(default)]
	pub attributes: IncidentAttributes,
}

/// Attributes of an incident as reported by the api. Nothing in here is
/// required, missing or null attributes are left empty.
#[serde_as]
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
#[allow(dead_code, clippy::missing_docs_in_private_items)]
pub struct IncidentAttributes {
	#[serde_as(as = "DefaultOnNull")]
	pub name: String,
	pub url: Option<String>,
	pub http_method: Option<String>,
	#[serde_as(as = "DefaultOnNull")]
	pub cause: String,
	pub incident_group_id: Option<i64>,
	pub started_at: Option<DateTime<Utc>>,
	pub acknowledged_at: Option<DateTime<Utc>>,
	pub acknowledged_by: Option<String>,
	pub resolved_at: Option<DateTime<Utc>>,
	pub resolved_by: Option<String>,
	pub response_content: Option<String>,
	// shape differs between api versions
	pub response_options: Option<serde_json::Value>,
	pub regions: Option<serde_json::Value>,
	pub response_url: Option<String>,
	pub screenshot_url: Option<String>,
	pub escalation_policy_id: Option<serde_json::Value>,
	#[serde_as(as = "DefaultOnNull")]
	pub call: bool,
	#[serde_as(as = "DefaultOnNull")]
	pub sms: bool,
	#[serde_as(as = "DefaultOnNull")]
	pub email: bool,
	#[serde_as(as = "DefaultOnNull")]
	pub push: bool,
}
