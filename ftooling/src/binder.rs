//! Turns a resolved route plus model arguments into a concrete HTTP request.
//!
//! ```rust
//! use fschema::{ToolRecord, load_sources};
//! use ftooling::{HttpMethod, bind};
//! use serde_json::json;
//!
//! let schema = r#"{
//!     "info": {"title": "Pets"},
//!     "servers": [{"url": "https://pets.example.com"}],
//!     "paths": {"/pets/{id}": {"get": {"operationId": "getPet"}}}
//! }"#;
//! let load = load_sources(&[ToolRecord::new(schema)]);
//! let source = &load.sources[0];
//! let route = source.route_map.entry_for("getPet").expect("route");
//!
//! let bound = bind(source, route, &json!({"parameters": {"id": "42"}})).expect("bind");
//! assert_eq!(bound.method, HttpMethod::Get);
//! assert_eq!(bound.url, "https://pets.example.com/pets/42");
//! ```

use std::collections::HashSet;

use fschema::{RouteEntry, SchemaSource, fill_template};
use serde_json::{Map, Value};
use url::form_urlencoded;

use crate::{ToolError, parameter_map, request_body};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl BoundRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Binds `args` to `route` of `source`.
///
/// Body-transport sources are POSTed as JSON; the rest are sent as GET with the
/// parameters that no path placeholder consumed.
pub fn bind(
    source: &SchemaSource,
    route: &RouteEntry,
    args: &Value,
) -> Result<BoundRequest, ToolError> {
    let empty = Map::new();
    let parameters = parameter_map(args).unwrap_or(&empty);
    let mut consumed = HashSet::new();

    let path = fill_template(&route.pattern, &route.params, |name| {
        let value = parameters
            .get(name)
            .and_then(path_value)
            .ok_or_else(|| ToolError::missing_parameter(name, &route.function))?;
        consumed.insert(name.to_string());
        Ok::<_, ToolError>(urlencoding::encode(&value).into_owned())
    })?;

    let custom_headers = source
        .header_pairs()
        .map_err(|err| ToolError::from(err).with_tool_name(route.function.clone()))?;
    let mut url = join_url(&source.base_url, &path);

    if source.request_in_body {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        for (name, value) in custom_headers {
            set_header(&mut headers, name, value);
        }

        return Ok(BoundRequest {
            method: HttpMethod::Post,
            url,
            headers,
            body: Some(request_body(args).clone()),
        });
    }

    let query = query_string(parameters, &consumed);
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query);
    }

    Ok(BoundRequest {
        method: HttpMethod::Get,
        url,
        headers: custom_headers,
        body: None,
    })
}

/// Absent, `null`, and empty-string values do not satisfy a placeholder.
fn path_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(query_value)
                .collect::<Vec<_>>()
                .join(","),
        ),
        other => Some(other.to_string()),
    }
}

fn query_string(parameters: &Map<String, Value>, consumed: &HashSet<String>) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in parameters {
        if consumed.contains(name) {
            continue;
        }
        if let Some(value) = query_value(value) {
            serializer.append_pair(name, &value);
        }
    }
    serializer.finish()
}

fn join_url(base: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{}{}", base.trim_end_matches('/'), path)
    } else {
        format!("{base}{path}")
    }
}

fn set_header(headers: &mut Vec<(String, String)>, name: String, value: String) {
    match headers
        .iter_mut()
        .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
    {
        Some(entry) => *entry = (name, value),
        None => headers.push((name, value)),
    }
}
