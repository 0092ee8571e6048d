//! Function-name resolution across the sources selected for one turn.
//!
//! ```rust
//! use fschema::{ToolRecord, load_sources};
//! use ftooling::{ResolvedCall, ToolCatalog};
//!
//! let schema = r#"{
//!     "info": {"title": "Pets"},
//!     "servers": [{"url": "https://pets.example.com"}],
//!     "paths": {"/pets/{id}": {"get": {"operationId": "getPet"}}}
//! }"#;
//! let catalog = ToolCatalog::new(load_sources(&[ToolRecord::new(schema)]).sources);
//!
//! match catalog.resolve("getPet").expect("getPet is declared") {
//!     ResolvedCall::Remote { route, .. } => assert_eq!(route.pattern, "/pets/:id"),
//!     ResolvedCall::Local { .. } => unreachable!(),
//! }
//! assert!(catalog.resolve("deletePet").is_err());
//! ```

use fschema::{RouteEntry, SchemaSource};

use crate::ToolError;

#[derive(Debug, Clone, Copy)]
pub enum ResolvedCall<'a> {
    /// Served by the local tool registry.
    Local { source: &'a SchemaSource },
    Remote {
        source: &'a SchemaSource,
        route: &'a RouteEntry,
    },
}

impl<'a> ResolvedCall<'a> {
    pub fn source(&self) -> &'a SchemaSource {
        match *self {
            Self::Local { source } | Self::Remote { source, .. } => source,
        }
    }
}

/// Ordered schema sources owned by one request.
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    sources: Vec<SchemaSource>,
}

impl ToolCatalog {
    pub fn new(sources: Vec<SchemaSource>) -> Self {
        Self { sources }
    }

    pub fn sources(&self) -> &[SchemaSource] {
        &self.sources
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Finds the first source, in selection order, that declares `function`.
    pub fn resolve(&self, function: &str) -> Result<ResolvedCall<'_>, ToolError> {
        let source = self
            .sources
            .iter()
            .find(|source| source.declares(function))
            .ok_or_else(|| ToolError::function_not_registered(function))?;

        if source.is_local() {
            return Ok(ResolvedCall::Local { source });
        }

        let route = source
            .route_map
            .entry_for(function)
            .ok_or_else(|| ToolError::function_not_registered(function))?;
        Ok(ResolvedCall::Remote { source, route })
    }
}
