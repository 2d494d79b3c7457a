//! Typed access to tool call arguments.

use crate::error::TravelError;

/// Wrapper around tool call arguments providing typed extraction.
#[derive(Debug, Clone)]
pub struct ToolArguments {
    value: serde_json::Value,
}

impl ToolArguments {
    /// Wrap raw arguments. A JSON-encoded string payload (as chat APIs send
    /// it) is decoded; an empty string becomes `{}`.
    pub fn new(value: serde_json::Value) -> Self {
        let value = match value {
            serde_json::Value::String(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    serde_json::json!({})
                } else {
                    serde_json::from_str(trimmed).unwrap_or(serde_json::Value::String(raw))
                }
            }
            serde_json::Value::Null => serde_json::json!({}),
            other => other,
        };
        Self { value }
    }

    /// Get the raw JSON value.
    pub fn raw(&self) -> &serde_json::Value {
        &self.value
    }

    /// Get a string argument by key.
    pub fn get_str(&self, key: &str) -> Result<&str, TravelError> {
        self.value
            .get(key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| TravelError::InvalidArgument(format!("Missing string argument: {key}")))
    }

    /// Get a non-negative index argument. Models frequently send whole
    /// numbers as floats (`1.0`), which are accepted.
    pub fn get_index(&self, key: &str) -> Result<usize, TravelError> {
        let value = self
            .value
            .get(key)
            .ok_or_else(|| TravelError::InvalidArgument(format!("Missing index argument: {key}")))?;
        if let Some(n) = value.as_u64() {
            return Ok(n as usize);
        }
        match value.as_f64() {
            Some(f) if f >= 0.0 && f.fract() == 0.0 => Ok(f as usize),
            _ => Err(TravelError::InvalidArgument(format!(
                "Argument {key} must be a non-negative integer, got {value}"
            ))),
        }
    }

    /// Get an optional index argument, falling back to `default`.
    pub fn get_index_or(&self, key: &str, default: usize) -> Result<usize, TravelError> {
        match self.value.get(key) {
            None | Some(serde_json::Value::Null) => Ok(default),
            Some(_) => self.get_index(key),
        }
    }

    /// Get a nested object.
    pub fn get_object(&self, key: &str) -> Result<&serde_json::Value, TravelError> {
        self.value
            .get(key)
            .filter(|v| v.is_object())
            .ok_or_else(|| TravelError::InvalidArgument(format!("Missing object argument: {key}")))
    }

    /// Deserialize the entire arguments into a typed struct.
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> Result<T, TravelError> {
        serde_json::from_value(self.value.clone()).map_err(|e| {
            TravelError::InvalidArgument(format!("Failed to deserialize arguments: {e}"))
        })
    }
}
