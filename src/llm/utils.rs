use crate::error::{AssistantError, Result};
use schemars::gen::SchemaSettings;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Keywords the generateContent response schema rejects.
const UNSUPPORTED_SCHEMA_KEYS: [&str; 5] = [
    "$schema",
    "definitions",
    "title",
    "additionalProperties",
    "format",
];

/// Cuts a JSON object out of a model reply that may carry markdown fences or
/// chatter around it. Without braces the trimmed input is returned as is.
pub fn extract_json_object(raw: &str) -> &str {
    if let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) {
        if start < end {
            return &raw[start..=end];
        }
    }
    raw.trim()
}

/// Parses a model reply into `T`. Any failure is an analysis failure; it
/// never touches the dataset.
pub fn parse_model_reply<T: DeserializeOwned>(raw: &str) -> Result<T> {
    serde_json::from_str(extract_json_object(raw)).map_err(|e| {
        AssistantError::AnalysisFailure(format!("Could not parse model reply as JSON: {}", e))
    })
}

/// Generates an inline response schema for `T` in the subset the
/// generative-language API accepts (no `$ref`, no definitions, no titles).
pub fn response_schema_for<T: JsonSchema>() -> serde_json::Result<Value> {
    let generator = SchemaSettings::openapi3()
        .with(|s| {
            s.inline_subschemas = true;
            s.meta_schema = None;
        })
        .into_generator();
    let root = generator.into_root_schema_for::<T>();

    let mut value = serde_json::to_value(root)?;
    strip_unsupported_keys(&mut value, false);
    Ok(value)
}

fn strip_unsupported_keys(value: &mut Value, is_property_map: bool) {
    match value {
        Value::Object(map) => {
            if !is_property_map {
                for key in UNSUPPORTED_SCHEMA_KEYS {
                    map.remove(key);
                }
            }
            for (key, child) in map.iter_mut() {
                strip_unsupported_keys(child, !is_property_map && key == "properties");
            }
        }
        Value::Array(items) => {
            for item in items {
                strip_unsupported_keys(item, false);
            }
        }
        _ => {}
    }
}
