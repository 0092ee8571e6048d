//! OpenAPI-style document to function descriptor conversion.
//!
//! ```rust
//! use fschema::convert;
//! use serde_json::json;
//!
//! let document = json!({
//!     "info": {"title": "Pets", "description": "Pet store"},
//!     "servers": [{"url": "https://pets.example.com"}],
//!     "paths": {
//!         "/pets/{id}": {
//!             "get": {
//!                 "operationId": "getPet",
//!                 "parameters": [{"name": "id", "in": "path", "schema": {"type": "string"}}]
//!             }
//!         }
//!     }
//! });
//!
//! let converted = convert(&document).expect("document should convert");
//! assert_eq!(converted.functions[0].name, "getPet");
//! assert_eq!(converted.routes[0].path, "/pets/:id");
//! assert!(!converted.request_in_body());
//! ```

use serde_json::{Map, Value, json};

use crate::refs::RefResolver;
use crate::{FunctionDescriptor, Route, SchemaError, normalize_path, path_params};

const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaInfo {
    pub title: String,
    pub description: String,
    /// First declared server URL.
    pub server: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedSchema {
    pub info: SchemaInfo,
    pub functions: Vec<FunctionDescriptor>,
    pub routes: Vec<Route>,
}

impl ConvertedSchema {
    /// Transport flag of the source, taken from its first declared operation.
    pub fn request_in_body(&self) -> bool {
        self.routes
            .first()
            .map(|route| route.request_in_body)
            .unwrap_or(false)
    }
}

/// Converts a decoded document into function descriptors and routes.
///
/// Operations are visited in document order. Any structural problem fails the whole
/// document; callers decide whether that is fatal.
pub fn convert(document: &Value) -> Result<ConvertedSchema, SchemaError> {
    let root = document
        .as_object()
        .ok_or_else(|| SchemaError::invalid_document("schema document must be a JSON object"))?;
    let resolver = RefResolver::new(document);

    let info = read_info(root)?;
    let paths = root
        .get("paths")
        .ok_or_else(|| SchemaError::missing_field("paths"))?
        .as_object()
        .ok_or_else(|| SchemaError::invalid_document("'paths' must be an object"))?;

    let mut functions = Vec::new();
    let mut routes = Vec::new();

    for (path, item) in paths {
        let item = resolver.follow(item)?;
        let item = item.as_object().ok_or_else(|| {
            SchemaError::invalid_document(format!("path item '{path}' must be an object"))
        })?;
        let shared_parameters = item
            .get("parameters")
            .map(|value| read_parameters(&resolver, value))
            .transpose()?
            .unwrap_or_default();
        let pattern = normalize_path(path);
        let params = path_params(path);

        for (method, operation) in item {
            if !HTTP_METHODS.contains(&method.as_str()) {
                continue;
            }

            let operation = resolver.follow(operation)?.as_object().ok_or_else(|| {
                SchemaError::invalid_document(format!(
                    "operation '{method} {path}' must be an object"
                ))
            })?;
            let operation_id = operation
                .get("operationId")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .ok_or_else(|| {
                    SchemaError::missing_field(&format!("{method} {path}: operationId"))
                })?;

            let mut parameters = shared_parameters.clone();
            if let Some(value) = operation.get("parameters") {
                for parameter in read_parameters(&resolver, value)? {
                    merge_parameter(&mut parameters, parameter);
                }
            }

            let request_body = operation
                .get("requestBody")
                .map(|body| read_request_body(&resolver, body))
                .transpose()?;

            functions.push(FunctionDescriptor {
                name: operation_id.to_string(),
                description: describe(operation),
                parameters: build_parameter_schema(&parameters, request_body.as_ref()),
                source: 0,
            });
            routes.push(Route {
                path: pattern.clone(),
                method: method.to_ascii_uppercase(),
                operation_id: operation_id.to_string(),
                params: params.clone(),
                request_in_body: request_body.is_some(),
            });
        }
    }

    Ok(ConvertedSchema {
        info,
        functions,
        routes,
    })
}

fn read_info(root: &Map<String, Value>) -> Result<SchemaInfo, SchemaError> {
    let info = root
        .get("info")
        .and_then(Value::as_object)
        .ok_or_else(|| SchemaError::missing_field("info"))?;
    let title = info
        .get("title")
        .and_then(Value::as_str)
        .ok_or_else(|| SchemaError::missing_field("info.title"))?;
    let description = info
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let server = root
        .get("servers")
        .and_then(Value::as_array)
        .and_then(|servers| servers.first())
        .and_then(|server| server.get("url"))
        .and_then(Value::as_str)
        .ok_or_else(|| SchemaError::missing_field("servers[0].url"))?;

    Ok(SchemaInfo {
        title: title.to_string(),
        description: description.to_string(),
        server: server.to_string(),
    })
}

fn describe(operation: &Map<String, Value>) -> String {
    ["description", "summary"]
        .iter()
        .find_map(|key| operation.get(*key).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string()
}

#[derive(Debug, Clone)]
struct Parameter {
    name: String,
    location: String,
    required: bool,
    schema: Option<Value>,
}

fn read_parameters(resolver: &RefResolver<'_>, value: &Value) -> Result<Vec<Parameter>, SchemaError> {
    let list = value
        .as_array()
        .ok_or_else(|| SchemaError::invalid_document("'parameters' must be an array"))?;

    list.iter()
        .map(|entry| {
            let entry = resolver.follow(entry)?;
            let name = entry
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| SchemaError::missing_field("parameter.name"))?;
            let location = entry
                .get("in")
                .and_then(Value::as_str)
                .ok_or_else(|| SchemaError::missing_field("parameter.in"))?;
            let required = location == "path"
                || entry.get("required").and_then(Value::as_bool).unwrap_or(false);

            let schema = match entry.get("schema") {
                Some(schema) => {
                    let mut schema = resolver.inline(schema)?;
                    if let (Some(object), Some(description)) = (
                        schema.as_object_mut(),
                        entry.get("description").and_then(Value::as_str),
                    ) {
                        object
                            .entry("description")
                            .or_insert_with(|| Value::String(description.to_string()));
                    }
                    Some(schema)
                }
                None => None,
            };

            Ok(Parameter {
                name: name.to_string(),
                location: location.to_string(),
                required,
                schema,
            })
        })
        .collect()
}

fn merge_parameter(parameters: &mut Vec<Parameter>, parameter: Parameter) {
    match parameters
        .iter_mut()
        .find(|existing| existing.name == parameter.name && existing.location == parameter.location)
    {
        Some(existing) => *existing = parameter,
        None => parameters.push(parameter),
    }
}

struct RequestBody {
    required: bool,
    schema: Value,
}

fn read_request_body(resolver: &RefResolver<'_>, value: &Value) -> Result<RequestBody, SchemaError> {
    let body = resolver.follow(value)?;
    let required = body.get("required").and_then(Value::as_bool).unwrap_or(false);
    let schema = body
        .get("content")
        .and_then(|content| content.get("application/json"))
        .and_then(|media| media.get("schema"))
        .map(|schema| resolver.inline(schema))
        .transpose()?
        .unwrap_or_else(|| json!({"type": "object"}));

    Ok(RequestBody { required, schema })
}

fn build_parameter_schema(parameters: &[Parameter], body: Option<&RequestBody>) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    if let Some(body) = body {
        properties.insert("requestBody".to_string(), body.schema.clone());
        if body.required {
            required.push(Value::String("requestBody".to_string()));
        }
    }

    let mut parameter_properties = Map::new();
    let mut parameter_required = Vec::new();
    for parameter in parameters {
        let Some(schema) = &parameter.schema else {
            continue;
        };
        parameter_properties.insert(parameter.name.clone(), schema.clone());
        if parameter.required {
            parameter_required.push(Value::String(parameter.name.clone()));
        }
    }

    if !parameter_properties.is_empty() {
        let mut parameters_schema = json!({
            "type": "object",
            "properties": parameter_properties,
        });
        if !parameter_required.is_empty() {
            parameters_schema["required"] = Value::Array(parameter_required);
            required.push(Value::String("parameters".to_string()));
        }
        properties.insert("parameters".to_string(), parameters_schema);
    }

    let mut schema = json!({
        "type": "object",
        "properties": properties,
    });
    if !required.is_empty() {
        schema["required"] = Value::Array(required);
    }
    schema
}
