//! JSON argument parsing helpers for model-issued calls.
//!
//! Arguments follow the converter's shape: path/query values under `parameters`,
//! the JSON body under `requestBody`.
//!
//! ```rust
//! use ftooling::{parameter_map, parse_arguments, request_body};
//!
//! let args = parse_arguments(r#"{"parameters":{"id":"42"}}"#).expect("object should parse");
//! assert_eq!(parameter_map(&args).and_then(|p| p.get("id")).and_then(|v| v.as_str()), Some("42"));
//! assert_eq!(request_body(&args), &args);
//! ```

use serde_json::{Map, Value};

use crate::ToolError;

/// Parses raw call arguments; blank input is treated as `{}`.
pub fn parse_arguments(args_json: &str) -> Result<Value, ToolError> {
    if args_json.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }

    let value: Value = serde_json::from_str(args_json)
        .map_err(|err| ToolError::invalid_arguments(format!("invalid JSON arguments: {err}")))?;
    if !value.is_object() {
        return Err(ToolError::invalid_arguments("expected JSON object arguments"));
    }

    Ok(value)
}

pub fn parameter_map(args: &Value) -> Option<&Map<String, Value>> {
    args.get("parameters").and_then(Value::as_object)
}

/// The `requestBody` member when present and non-null, else the whole arguments value.
pub fn request_body(args: &Value) -> &Value {
    match args.get("requestBody") {
        Some(body) if !body.is_null() => body,
        _ => args,
    }
}

pub fn required_string(args: &Map<String, Value>, key: &str) -> Result<String, ToolError> {
    args.get(key)
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| ToolError::invalid_arguments(format!("missing required string: '{key}'")))
}
