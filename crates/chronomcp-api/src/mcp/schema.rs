//! JSON Schema fragments for tool parameters
//!
//! Tools describe their arguments with a small builder instead of derived
//! schemas because several tools share parameter groups (time range,
//! limits, alert filters) and the generated config tools need to assemble
//! schemas from data.

use serde_json::{json, Map, Value};

/// Object schema with named properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamSchema {
    properties: Map<String, Value>,
    required: Vec<String>,
}

impl ParamSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property with an arbitrary schema.
    pub fn property(mut self, name: &str, schema: Value, required: bool) -> Self {
        self.properties.insert(name.to_string(), schema);
        if required && !self.required.iter().any(|r| r == name) {
            self.required.push(name.to_string());
        }
        self
    }

    pub fn string(self, name: &str, description: &str, required: bool) -> Self {
        self.property(
            name,
            json!({"type": "string", "description": description}),
            required,
        )
    }

    pub fn boolean(self, name: &str, description: &str, required: bool) -> Self {
        self.property(
            name,
            json!({"type": "boolean", "description": description}),
            required,
        )
    }

    pub fn integer(self, name: &str, description: &str, required: bool) -> Self {
        self.property(
            name,
            json!({"type": "integer", "description": description}),
            required,
        )
    }

    pub fn number(self, name: &str, description: &str, required: bool) -> Self {
        self.property(
            name,
            json!({"type": "number", "description": description}),
            required,
        )
    }

    pub fn string_array(self, name: &str, description: &str, required: bool) -> Self {
        self.property(
            name,
            json!({"type": "array", "items": {"type": "string"}, "description": description}),
            required,
        )
    }

    pub fn enumeration(self, name: &str, description: &str, values: &[&str], required: bool) -> Self {
        self.property(
            name,
            json!({"type": "string", "enum": values, "description": description}),
            required,
        )
    }

    pub fn object(self, name: &str, description: &str, inner: ParamSchema, required: bool) -> Self {
        let mut schema = inner.into_value();
        if let Value::Object(map) = &mut schema {
            map.insert("description".to_string(), Value::String(description.to_string()));
        }
        self.property(name, schema, required)
    }

    pub fn object_array(
        self,
        name: &str,
        description: &str,
        item: ParamSchema,
        required: bool,
    ) -> Self {
        self.property(
            name,
            json!({"type": "array", "items": item.into_value(), "description": description}),
            required,
        )
    }

    /// `start`, `end` and `duration`, all optional.
    pub fn time_range(self) -> Self {
        self.string(
            "start",
            "Start of the time range as an RFC 3339 timestamp. Requires end; cannot be combined with duration.",
            false,
        )
        .string(
            "end",
            "End of the time range as an RFC 3339 timestamp. Defaults to now.",
            false,
        )
        .string(
            "duration",
            "Length of the time range ending at end, e.g. 15m, 1h, 1h30m, 2d. Defaults to 1h.",
            false,
        )
    }

    /// Merge another schema's properties into this one.
    pub fn merge(mut self, other: ParamSchema) -> Self {
        for (name, schema) in other.properties {
            let required = other.required.contains(&name);
            self = self.property(&name, schema, required);
        }
        self
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn into_object(self) -> Map<String, Value> {
        let mut schema = Map::new();
        schema.insert("type".to_string(), Value::String("object".to_string()));
        schema.insert("properties".to_string(), Value::Object(self.properties));
        if !self.required.is_empty() {
            schema.insert("required".to_string(), json!(self.required));
        }
        schema
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.into_object())
    }
}
