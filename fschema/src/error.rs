//! Schema conversion errors.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorKind {
    InvalidJson,
    MissingField,
    InvalidDocument,
    UnresolvedReference,
    InvalidHeaders,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    pub kind: SchemaErrorKind,
    pub message: String,
}

impl SchemaError {
    pub fn new(kind: SchemaErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        Self::new(SchemaErrorKind::InvalidJson, message)
    }

    pub fn missing_field(field: &str) -> Self {
        Self::new(
            SchemaErrorKind::MissingField,
            format!("missing required field '{field}'"),
        )
    }

    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::new(SchemaErrorKind::InvalidDocument, message)
    }

    pub fn unresolved_reference(reference: &str) -> Self {
        Self::new(
            SchemaErrorKind::UnresolvedReference,
            format!("unable to resolve reference '{reference}'"),
        )
    }

    pub fn invalid_headers(message: impl Into<String>) -> Self {
        Self::new(SchemaErrorKind::InvalidHeaders, message)
    }
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for SchemaError {}
