//! Tool execution errors and classifications.

use std::error::Error;
use std::fmt::{Display, Formatter};

use fschema::SchemaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolErrorKind {
    /// A locally routed function has no in-process handler.
    NotFound,
    /// No selected schema source declares the function.
    FunctionNotRegistered,
    /// A path placeholder had no usable value.
    MissingParameter,
    InvalidArguments,
    /// Source configuration (such as custom headers) could not be used.
    InvalidSchema,
    Execution,
    Timeout,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub message: String,
    pub tool_name: Option<String>,
    pub tool_call_id: Option<String>,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            tool_name: None,
            tool_call_id: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::NotFound, message)
    }

    pub fn function_not_registered(function: &str) -> Self {
        Self::new(
            ToolErrorKind::FunctionNotRegistered,
            format!("Function {function} not found in any schema"),
        )
        .with_tool_name(function)
    }

    pub fn missing_parameter(parameter: &str, function: &str) -> Self {
        Self::new(
            ToolErrorKind::MissingParameter,
            format!("Parameter {parameter} not found for function {function}"),
        )
        .with_tool_name(function)
    }

    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidArguments, message)
    }

    pub fn invalid_schema(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidSchema, message)
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Execution, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Timeout, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Other, message)
    }

    pub fn with_tool_name(mut self, tool_name: impl Into<String>) -> Self {
        self.tool_name = Some(tool_name.into());
        self
    }

    pub fn with_tool_call_id(mut self, tool_call_id: impl Into<String>) -> Self {
        self.tool_call_id = Some(tool_call_id.into());
        self
    }

    /// Whether the failure stems from what the model asked for rather than the system.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self.kind,
            ToolErrorKind::FunctionNotRegistered
                | ToolErrorKind::MissingParameter
                | ToolErrorKind::InvalidArguments
                | ToolErrorKind::NotFound
        )
    }
}

impl Display for ToolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (&self.tool_name, &self.tool_call_id) {
            (Some(tool_name), Some(tool_call_id)) => write!(
                f,
                "{:?} [tool={}, call_id={}]: {}",
                self.kind, tool_name, tool_call_id, self.message
            ),
            (Some(tool_name), None) => {
                write!(f, "{:?} [tool={}]: {}", self.kind, tool_name, self.message)
            }
            _ => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl Error for ToolError {}

impl From<SchemaError> for ToolError {
    fn from(value: SchemaError) -> Self {
        Self::invalid_schema(value.message)
    }
}
