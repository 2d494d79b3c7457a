//! Tool parameter schemas.

use serde::{Deserialize, Serialize};

/// JSON Schema-based parameter definition for a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentToolParameters {
    /// JSON Schema object describing the parameters.
    pub schema: serde_json::Value,
}

impl AgentToolParameters {
    /// Create an empty parameter schema (no parameters).
    pub fn empty() -> Self {
        Self {
            schema: serde_json::json!({
                "type": "object",
                "properties": {},
                "required": [],
            }),
        }
    }

    /// Builder: create an object schema with properties.
    pub fn object() -> ParameterBuilder {
        ParameterBuilder {
            description: None,
            properties: serde_json::Map::new(),
            required: Vec::new(),
        }
    }
}

/// Builder for constructing tool parameter schemas.
pub struct ParameterBuilder {
    description: Option<String>,
    properties: serde_json::Map<String, serde_json::Value>,
    required: Vec<String>,
}

impl ParameterBuilder {
    fn property(mut self, name: impl Into<String>, schema: serde_json::Value, required: bool) -> Self {
        let name = name.into();
        self.properties.insert(name.clone(), schema);
        if required {
            self.required.push(name);
        }
        self
    }

    /// Describe the object itself (used for nested objects).
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a string property. An empty description is omitted.
    pub fn string(self, name: impl Into<String>, description: &str, required: bool) -> Self {
        self.property(name, typed("string", description), required)
    }

    /// Add a number property.
    pub fn number(self, name: impl Into<String>, description: &str, required: bool) -> Self {
        self.property(name, typed("number", description), required)
    }

    /// Add an integer property.
    pub fn integer(self, name: impl Into<String>, description: &str, required: bool) -> Self {
        self.property(name, typed("integer", description), required)
    }

    /// Add an enum (string) property.
    pub fn string_enum(
        self,
        name: impl Into<String>,
        description: &str,
        values: &[&str],
        required: bool,
    ) -> Self {
        let mut schema = typed("string", description);
        schema["enum"] = serde_json::json!(values);
        self.property(name, schema, required)
    }

    /// Add an array-of-strings property.
    pub fn string_array(self, name: impl Into<String>, description: &str, required: bool) -> Self {
        let mut schema = typed("array", description);
        schema["items"] = serde_json::json!({ "type": "string" });
        self.property(name, schema, required)
    }

    /// Add a nested object property built with another builder.
    pub fn object(self, name: impl Into<String>, nested: ParameterBuilder, required: bool) -> Self {
        self.property(name, nested.into_schema(), required)
    }

    fn into_schema(self) -> serde_json::Value {
        let mut schema = serde_json::json!({
            "type": "object",
            "properties": self.properties,
            "required": self.required,
        });
        if let Some(description) = self.description {
            schema["description"] = description.into();
        }
        schema
    }

    /// Build into AgentToolParameters.
    pub fn build(self) -> AgentToolParameters {
        AgentToolParameters {
            schema: self.into_schema(),
        }
    }
}

fn typed(kind: &str, description: &str) -> serde_json::Value {
    if description.is_empty() {
        serde_json::json!({ "type": kind })
    } else {
        serde_json::json!({ "type": kind, "description": description })
    }
}
