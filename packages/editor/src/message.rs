//! Outbound publish events and inbound window messages.

use resonance_content::FieldSet;
use serde::{Deserialize, Serialize};

pub const PUBLISH_EVENT_TYPE: &str = "publish";
pub const PUBLISH_SUCCESS_TYPE: &str = "publish-success";

/// Aggregated field set of every dirty region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub scope_id: String,
    pub fields: FieldSet,
}

impl PublishEvent {
    pub fn new(scope_id: impl Into<String>, fields: FieldSet) -> Self {
        Self {
            kind: PUBLISH_EVENT_TYPE.to_string(),
            scope_id: scope_id.into(),
            fields,
        }
    }
}

/// A message received from the host window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub origin: String,
    pub data: serde_json::Value,
}

impl InboundMessage {
    pub fn new(origin: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            origin: origin.into(),
            data,
        }
    }

    /// `{"type": "publish-success"}` from the given origin
    pub fn publish_success(origin: impl Into<String>) -> Self {
        Self::new(origin, serde_json::json!({ "type": PUBLISH_SUCCESS_TYPE }))
    }

    pub fn message_type(&self) -> Option<&str> {
        self.data.get("type").and_then(serde_json::Value::as_str)
    }

    pub fn is_publish_success(&self) -> bool {
        self.message_type() == Some(PUBLISH_SUCCESS_TYPE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_event_shape() {
        let mut fields = FieldSet::new();
        fields.insert_text("hero.title.value", "Hi");

        let json = serde_json::to_value(PublishEvent::new("page", fields)).unwrap();
        assert_eq!(json["type"], "publish");
        assert_eq!(json["scopeId"], "page");
        assert_eq!(json["fields"]["hero.title.value"], "Hi");
    }

    #[test]
    fn test_inbound_message_type() {
        assert!(InboundMessage::publish_success("https://a").is_publish_success());

        let other = InboundMessage::new("https://a", serde_json::json!({ "type": "ping" }));
        assert!(!other.is_publish_success());

        let untyped = InboundMessage::new("https://a", serde_json::json!("publish-success"));
        assert_eq!(untyped.message_type(), None);
    }
}
