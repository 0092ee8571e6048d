//! Schema sources and per-request loading of selected tools.

use serde::Deserialize;
use serde_json::Value;

use fprovider::ToolDefinition;

use crate::{ConvertedSchema, FunctionDescriptor, RouteMap, SchemaError, convert};

/// Base URL marking a source whose functions run in-process.
pub const LOCAL_EXECUTOR: &str = "local://executor";

/// A tool selected by the caller for one chat turn.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ToolRecord {
    #[serde(default)]
    pub name: Option<String>,
    /// Raw JSON text of an OpenAPI-style document.
    pub schema: String,
    /// Raw JSON object text of extra request headers.
    #[serde(default)]
    pub custom_headers: Option<String>,
}

impl ToolRecord {
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            name: None,
            schema: schema.into(),
            custom_headers: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_custom_headers(mut self, headers: impl Into<String>) -> Self {
        self.custom_headers = Some(headers.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct SchemaSource {
    pub title: String,
    pub description: String,
    pub base_url: String,
    pub custom_headers: Option<String>,
    pub route_map: RouteMap,
    pub request_in_body: bool,
}

impl SchemaSource {
    pub fn from_converted(converted: &ConvertedSchema, custom_headers: Option<String>) -> Self {
        Self {
            title: converted.info.title.clone(),
            description: converted.info.description.clone(),
            base_url: converted.info.server.clone(),
            custom_headers,
            route_map: RouteMap::from_routes(&converted.routes),
            request_in_body: converted.request_in_body(),
        }
    }

    pub fn is_local(&self) -> bool {
        self.base_url == LOCAL_EXECUTOR
    }

    pub fn declares(&self, function: &str) -> bool {
        self.route_map.contains_function(function)
    }

    /// Parses `custom_headers` into name/value pairs in declaration order.
    ///
    /// Blank or absent headers yield an empty list. Non-string values are JSON-encoded.
    pub fn header_pairs(&self) -> Result<Vec<(String, String)>, SchemaError> {
        let Some(raw) = self
            .custom_headers
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
        else {
            return Ok(Vec::new());
        };

        let parsed: Value = serde_json::from_str(raw)
            .map_err(|err| SchemaError::invalid_headers(format!("custom headers: {err}")))?;
        let object = parsed
            .as_object()
            .ok_or_else(|| SchemaError::invalid_headers("custom headers must be a JSON object"))?;

        Ok(object
            .iter()
            .map(|(name, value)| {
                let value = match value {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                };
                (name.clone(), value)
            })
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceFailure {
    /// Position of the record in the selection.
    pub index: usize,
    pub name: Option<String>,
    pub error: SchemaError,
}

/// A function dropped because an earlier source already declared its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowedFunction {
    pub name: String,
    pub source: usize,
    pub owner: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SchemaLoad {
    pub sources: Vec<SchemaSource>,
    pub functions: Vec<FunctionDescriptor>,
    pub failures: Vec<SourceFailure>,
    pub shadowed: Vec<ShadowedFunction>,
}

impl SchemaLoad {
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.functions
            .iter()
            .map(FunctionDescriptor::to_tool_definition)
            .collect()
    }

    pub fn has_functions(&self) -> bool {
        !self.functions.is_empty()
    }
}

/// Converts every record, collecting failures instead of stopping at them.
///
/// Function names are unique in the result: a name declared by an earlier source
/// shadows later declarations.
pub fn load_sources(records: &[ToolRecord]) -> SchemaLoad {
    let mut load = SchemaLoad::default();

    for (index, record) in records.iter().enumerate() {
        let converted = serde_json::from_str::<Value>(&record.schema)
            .map_err(|err| SchemaError::invalid_json(err.to_string()))
            .and_then(|document| convert(&document));

        let converted = match converted {
            Ok(converted) => converted,
            Err(error) => {
                load.failures.push(SourceFailure {
                    index,
                    name: record.name.clone(),
                    error,
                });
                continue;
            }
        };

        let source_index = load.sources.len();
        for mut function in converted.functions.iter().cloned() {
            if let Some(owner) = load
                .functions
                .iter()
                .find(|existing| existing.name == function.name)
                .map(|existing| existing.source)
            {
                load.shadowed.push(ShadowedFunction {
                    name: function.name,
                    source: source_index,
                    owner,
                });
                continue;
            }

            function.source = source_index;
            load.functions.push(function);
        }

        load.sources.push(SchemaSource::from_converted(
            &converted,
            record.custom_headers.clone(),
        ));
    }

    load
}
