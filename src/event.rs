//! data structures for deserializing the monitoring event read from stdin
use std::{collections::HashMap, io::Read};

use serde::Deserialize;
use serde_with::{serde_as, DefaultOnNull};

use crate::error::HandlerError;

/// check status signalling a critical problem, every other status means ok
pub const STATUS_CRITICAL: u32 = 2;

#[derive(Clone, Debug, Default, Deserialize)]
/// a single observation of the monitoring pipeline
pub struct Event {
	#[serde(default)]
	pub entity: Option<Entity>,
	#[serde(default)]
	pub check: Option<Check>,
}

/// name and annotations shared by entities and checks
#[serde_as]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ObjectMeta {
	#[serde(default)]
	pub name: String,
	/// sent as `null` when a resource has none
	#[serde_as(as = "DefaultOnNull")]
	#[serde(default)]
	pub annotations: HashMap<String, String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
/// the monitored host or service
pub struct Entity {
	#[serde(default)]
	pub metadata: ObjectMeta,
}

#[derive(Clone, Debug, Default, Deserialize)]
/// the probe that produced the event
pub struct Check {
	#[serde(default)]
	pub metadata: ObjectMeta,
	#[serde(default)]
	pub output: String,
	#[serde(default)]
	pub status: u32,
}

impl ObjectMeta {
	/// annotation value, `None` if missing or empty
	pub fn annotation(&self, key: &str) -> Option<&str> {
		self.annotations.get(key).map(String::as_str).filter(|value| !value.is_empty())
	}
}

impl Entity {
	pub fn name(&self) -> &str {
		&self.metadata.name
	}

	pub fn annotation(&self, key: &str) -> Option<&str> {
		self.metadata.annotation(key)
	}
}

impl Check {
	pub fn name(&self) -> &str {
		&self.metadata.name
	}

	pub fn annotation(&self, key: &str) -> Option<&str> {
		self.metadata.annotation(key)
	}
}

/// An event that carries a named entity and a named check. Only this can be
/// turned into an incident.
#[derive(Clone, Copy, Debug)]
pub struct ValidEvent<'a> {
	pub entity: &'a Entity,
	pub check: &'a Check,
}

impl Event {
	/// read the whole of `reader` and parse it as an event
	pub fn from_reader(reader: impl Read) -> Result<Self, HandlerError> {
		serde_json::from_reader(reader).map_err(HandlerError::EventFormat)
	}

	pub fn validate(&self) -> Result<ValidEvent<'_>, HandlerError> {
		let entity = self.entity.as_ref().ok_or(HandlerError::InvalidEvent("event has no entity"))?;
		let check = self.check.as_ref().ok_or(HandlerError::InvalidEvent("event has no check"))?;

		if entity.name().is_empty() {
			return Err(HandlerError::InvalidEvent("entity name is empty"));
		}
		if check.name().is_empty() {
			return Err(HandlerError::InvalidEvent("check name is empty"));
		}

		Ok(ValidEvent { entity, check })
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use serde_json::json;

	use super::*;

	/// build a valid event for tests
	pub(crate) fn event(
		entity: &str,
		entity_annotations: &[(&str, &str)],
		check: &str,
		check_annotations: &[(&str, &str)],
		status: u32,
	) -> Event {
		fn to_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
			pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
		}

		Event {
			entity: Some(Entity {
				metadata: ObjectMeta { name: entity.to_owned(), annotations: to_map(entity_annotations) },
			}),
			check: Some(Check {
				metadata: ObjectMeta { name: check.to_owned(), annotations: to_map(check_annotations) },
				output: format!("{check} output"),
				status,
			}),
		}
	}

	#[test]
	fn parses_pipeline_event() {
		let data = json!({
			"timestamp": 1650000000,
			"entity": {
				"entity_class": "agent",
				"metadata": {
					"name": "web-1",
					"namespace": "default",
					"annotations": { "betteruptime/config/name": "DB Down" }
				}
			},
			"check": {
				"metadata": { "name": "disk-space", "annotations": null },
				"output": "disk 97% full",
				"status": 2,
				"interval": 60
			}
		});

		let event = Event::from_reader(data.to_string().as_bytes()).unwrap();
		let valid = event.validate().unwrap();

		assert_eq!(valid.entity.name(), "web-1");
		assert_eq!(valid.entity.annotation("betteruptime/config/name"), Some("DB Down"));
		assert_eq!(valid.check.name(), "disk-space");
		assert!(valid.check.metadata.annotations.is_empty());
		assert_eq!(valid.check.output, "disk 97% full");
		assert_eq!(valid.check.status, 2);
	}

	#[test]
	fn missing_fields_take_defaults() {
		let event =
			Event::from_reader(r#"{"entity":{"metadata":{"name":"a"}},"check":{"metadata":{"name":"b"}}}"#.as_bytes())
				.unwrap();
		let check = event.check.as_ref().unwrap();

		assert_eq!(check.status, 0);
		assert_eq!(check.output, "");
		assert!(event.validate().is_ok());
	}

	#[test]
	fn empty_annotation_counts_as_missing() {
		let event = event("e", &[], "c", &[("betteruptime/config/call", "")], 0);

		assert_eq!(event.check.unwrap().annotation("betteruptime/config/call"), None);
	}

	#[test]
	fn rejects_garbage() {
		assert!(matches!(Event::from_reader(&b"not json"[..]), Err(HandlerError::EventFormat(_))));
	}

	#[test]
	fn rejects_incomplete_events() {
		let no_check = Event::from_reader(&br#"{"entity":{"metadata":{"name":"a"}}}"#[..]).unwrap();
		assert!(matches!(no_check.validate(), Err(HandlerError::InvalidEvent("event has no check"))));

		let no_entity = Event::from_reader(&br#"{"check":{"metadata":{"name":"a"}}}"#[..]).unwrap();
		assert!(matches!(no_entity.validate(), Err(HandlerError::InvalidEvent("event has no entity"))));

		let unnamed = event("", &[], "c", &[], 2);
		assert!(matches!(unnamed.validate(), Err(HandlerError::InvalidEvent("entity name is empty"))));

		let unnamed = event("e", &[], "", &[], 2);
		assert!(matches!(unnamed.validate(), Err(HandlerError::InvalidEvent("check name is empty"))));
	}
}
