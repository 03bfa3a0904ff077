//! Handler output

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Result;

/// Bulk payload of a tool result. Exactly one is produced per call.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
    Image { data: Vec<u8>, mime_type: String },
}

/// What a tool handler returns on success.
///
/// The payload is rendered into MCP content frames by the dispatcher; the
/// deep link becomes a leading text frame and metadata is attached to the
/// result envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    pub payload: Payload,
    pub deep_link: Option<String>,
    pub metadata: Map<String, Value>,
}

impl ToolResult {
    fn with_payload(payload: Payload) -> Self {
        Self {
            payload,
            deep_link: None,
            metadata: Map::new(),
        }
    }

    /// Serialize any value as the JSON payload.
    pub fn json<T: Serialize>(value: &T) -> Result<Self> {
        Ok(Self::with_payload(Payload::Json(serde_json::to_value(value)?)))
    }

    pub fn from_value(value: Value) -> Self {
        Self::with_payload(Payload::Json(value))
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::with_payload(Payload::Text(text.into()))
    }

    pub fn image(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self::with_payload(Payload::Image {
            data,
            mime_type: mime_type.into(),
        })
    }

    /// Empty links are ignored.
    pub fn with_deep_link(mut self, link: impl Into<String>) -> Self {
        let link = link.into();
        self.deep_link = Some(link).filter(|l| !l.is_empty());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_payload() {
        #[derive(Serialize)]
        struct Row {
            name: &'static str,
        }
        let result = ToolResult::json(&vec![Row { name: "a" }]).unwrap();
        assert_eq!(result.payload, Payload::Json(json!([{"name": "a"}])));
        assert!(result.deep_link.is_none());
        assert!(result.metadata.is_empty());
    }

    #[test]
    fn test_sidecars_are_additive() {
        let result = ToolResult::text("hello")
            .with_deep_link("https://example.chronosphere.io/alerts")
            .with_metadata("series_count", 3);
        assert_eq!(result.payload, Payload::Text("hello".into()));
        assert_eq!(
            result.deep_link.as_deref(),
            Some("https://example.chronosphere.io/alerts")
        );
        assert_eq!(result.metadata["series_count"], json!(3));
    }

    #[test]
    fn test_empty_deep_link_is_dropped() {
        let result = ToolResult::text("x").with_deep_link("");
        assert!(result.deep_link.is_none());
    }
}
