//! Conversion of OpenAPI-style tool documents into callable function descriptors.
//!
//! Each selected tool document becomes a [`SchemaSource`] with a [`RouteMap`] from
//! function name to normalized path template, plus [`FunctionDescriptor`]s for the
//! completion client.
//!
//! ```rust
//! use fschema::{ToolRecord, load_sources};
//!
//! let schema = r#"{
//!     "info": {"title": "Clock"},
//!     "servers": [{"url": "local://executor"}],
//!     "paths": {"/now": {"get": {"operationId": "getCurrentDateTime"}}}
//! }"#;
//!
//! let load = load_sources(&[ToolRecord::new(schema)]);
//! assert!(load.failures.is_empty());
//! assert!(load.sources[0].is_local());
//! assert_eq!(load.tool_definitions()[0].name, "getCurrentDateTime");
//! ```

mod convert;
mod descriptor;
mod error;
mod refs;
mod route;
mod source;

pub use convert::{ConvertedSchema, SchemaInfo, convert};
pub use descriptor::FunctionDescriptor;
pub use error::{SchemaError, SchemaErrorKind};
pub use refs::{MAX_INLINE_NODES, MAX_REF_DEPTH};
pub use route::{Route, RouteEntry, RouteMap, fill_template, normalize_path, path_params};
pub use source::{
    LOCAL_EXECUTOR, SchemaLoad, SchemaSource, ShadowedFunction, SourceFailure, ToolRecord,
    load_sources,
};
