//! Per-directory template metadata (`_templateinfo.json`).

use serde_json::{Map, Value};

/// Key/value metadata read from a template directory.
///
/// Only `description` and `priority` carry meaning; other keys are kept so
/// that nothing is lost, but the compiler never reads them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateInfo {
    values: Map<String, Value>,
}

impl TemplateInfo {
    /// Empty metadata, as for a directory without a metadata file.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse metadata text. On failure the reason is returned for the caller
    /// to attach to the file path.
    pub fn parse(text: &str) -> Result<Self, String> {
        let value: Value = serde_json::from_str(text).map_err(|e| format!("not valid JSON: {e}"))?;
        let Value::Object(values) = value else {
            return Err(format!("expected a JSON object, found {}", kind_of(&value)));
        };

        if let Some(description) = values.get("description") {
            if !description.is_string() {
                return Err(format!(
                    "'description' must be a string, found {}",
                    kind_of(description)
                ));
            }
        }
        if let Some(priority) = values.get("priority") {
            if priority.as_i64().is_none() {
                return Err(format!("'priority' must be an integer, found {priority}"));
            }
        }

        Ok(Self { values })
    }

    /// Display description override.
    pub fn description(&self) -> Option<&str> {
        self.values.get("description").and_then(Value::as_str)
    }

    /// Sort priority override.
    pub fn priority(&self) -> Option<i64> {
        self.values.get("priority").and_then(Value::as_i64)
    }

    /// Raw value of any key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Whether no keys are present.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
