//! Resolution, binding, and execution of model-issued tool calls.
//!
//! A [`ToolCatalog`] maps function names to the schema source that declares them,
//! [`bind`] builds the outbound HTTP request, and [`DispatchToolRuntime`] runs each
//! call either through the local [`ToolRegistry`] or a [`RemoteToolTransport`].

mod args;
mod binder;
mod catalog;
mod error;
mod hooks;
mod registry;
mod remote;
mod runtime;
mod tool;
mod types;

pub mod platform;

pub mod prelude {
    pub use crate::{
        CallTarget, DispatchToolRuntime, HttpToolTransport, RemoteToolTransport, ResolvedCall,
        Tool, ToolCatalog, ToolError, ToolErrorKind, ToolExecutionContext, ToolExecutionResult,
        ToolFuture, ToolRegistry, ToolRuntime, ToolRuntimeHooks,
    };
}

pub use args::{parameter_map, parse_arguments, request_body, required_string};
pub use binder::{BoundRequest, HttpMethod, bind};
pub use catalog::{ResolvedCall, ToolCatalog};
pub use error::{ToolError, ToolErrorKind};
pub use hooks::{NoopToolRuntimeHooks, ToolRuntimeHooks};
pub use registry::ToolRegistry;
pub use remote::{DEFAULT_REMOTE_TIMEOUT, HttpToolTransport, RemoteResponse, RemoteToolTransport};
pub use runtime::{DEFAULT_LOCAL_TIMEOUT, DispatchToolRuntime, ToolRuntime};
pub use tool::{FunctionTool, Tool, ToolFuture};
pub use types::{CallTarget, ToolExecutionContext, ToolExecutionResult};
