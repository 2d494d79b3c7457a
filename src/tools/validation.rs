//! Validate tool call arguments against JSON Schema before execution.

use serde_json::Value;

/// Validate tool arguments against a JSON Schema.
///
/// Checks the object shape, required field presence, and property types.
/// Nested object properties and array items are checked recursively.
/// A `null` is accepted for optional properties, since models often send
/// explicit nulls for fields they chose not to fill. Returns the first
/// violation found, prefixed with its field path.
pub fn validate_arguments(args: &Value, schema: &Value) -> Result<(), String> {
    validate_at("", args, schema)
}

fn validate_at(path: &str, value: &Value, schema: &Value) -> Result<(), String> {
    if let Some(expected) = schema.get("type").and_then(Value::as_str) {
        if !value_matches_type(value, expected) {
            return Err(if path.is_empty() {
                format!("expected {expected} arguments, got {}", json_type_name(value))
            } else {
                format!(
                    "field '{path}' expected type '{expected}', got {}",
                    json_type_name(value)
                )
            });
        }
    }

    if let Some(obj) = value.as_object() {
        let required: Vec<&str> = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|r| r.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        for name in &required {
            if !obj.contains_key(*name) {
                return Err(format!("missing required field '{}'", join(path, name)));
            }
        }

        if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
            for (key, field) in obj {
                let Some(prop_schema) = properties.get(key) else {
                    continue;
                };
                if field.is_null() && !required.contains(&key.as_str()) {
                    continue;
                }
                validate_at(&join(path, key), field, prop_schema)?;
            }
        }
    }

    if let (Some(items), Some(item_schema)) = (value.as_array(), schema.get("items")) {
        for (i, item) in items.iter().enumerate() {
            validate_at(&format!("{path}[{i}]"), item, item_schema)?;
        }
    }

    Ok(())
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn value_matches_type(value: &Value, expected: &str) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => {
            value.is_i64()
                || value.is_u64()
                || value.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
        }
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hotels_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "destination": { "type": "string" },
                "rooms": { "type": "number" },
                "max_price_per_night": { "type": "number" },
            },
            "required": ["destination", "rooms"],
        })
    }

    #[test]
    fn rejects_non_object_args() {
        let err = validate_arguments(&json!("Vancouver"), &hotels_schema()).unwrap_err();
        assert!(err.contains("expected object"));
    }

    #[test]
    fn rejects_missing_required_field() {
        let err = validate_arguments(&json!({ "destination": "Vancouver" }), &hotels_schema())
            .unwrap_err();
        assert!(err.contains("missing required field 'rooms'"));
    }

    #[test]
    fn rejects_field_with_wrong_type() {
        let err = validate_arguments(
            &json!({ "destination": "Vancouver", "rooms": "two" }),
            &hotels_schema(),
        )
        .unwrap_err();
        assert!(err.contains("field 'rooms'"));
        assert!(err.contains("expected type 'number'"));
    }

    #[test]
    fn accepts_null_for_optional_field() {
        let args = json!({ "destination": "Vancouver", "rooms": 1, "max_price_per_night": null });
        assert!(validate_arguments(&args, &hotels_schema()).is_ok());
    }

    #[test]
    fn rejects_null_for_required_field() {
        let args = json!({ "destination": null, "rooms": 1 });
        assert!(validate_arguments(&args, &hotels_schema()).is_err());
    }

    #[test]
    fn reports_nested_path_for_missing_field() {
        let schema = json!({
            "type": "object",
            "properties": {
                "prefs": {
                    "type": "object",
                    "properties": { "origin": { "type": "string" } },
                    "required": ["origin"],
                }
            },
            "required": ["prefs"],
        });

        let err = validate_arguments(&json!({ "prefs": {} }), &schema).unwrap_err();
        assert_eq!(err, "missing required field 'prefs.origin'");
    }

    #[test]
    fn checks_array_item_types() {
        let schema = json!({
            "type": "object",
            "properties": {
                "interests": { "type": "array", "items": { "type": "string" } }
            },
        });

        assert!(validate_arguments(&json!({ "interests": ["food", "music"] }), &schema).is_ok());
        let err = validate_arguments(&json!({ "interests": ["food", 3] }), &schema).unwrap_err();
        assert!(err.contains("interests[1]"));
    }

    #[test]
    fn integer_accepts_whole_floats_only() {
        let schema = json!({
            "type": "object",
            "properties": { "flight_index": { "type": "integer" } },
            "required": ["flight_index"],
        });

        assert!(validate_arguments(&json!({ "flight_index": 1 }), &schema).is_ok());
        assert!(validate_arguments(&json!({ "flight_index": 1.0 }), &schema).is_ok());
        let err = validate_arguments(&json!({ "flight_index": 1.5 }), &schema).unwrap_err();
        assert!(err.contains("expected type 'integer'"));
    }

    #[test]
    fn accepts_anything_against_empty_schema() {
        assert!(validate_arguments(&json!({ "anything": 42 }), &json!({})).is_ok());
        assert!(validate_arguments(&Value::Null, &json!({})).is_ok());
    }
}
