//! Unified facade over the toolrelay workspace crates.
//!
//! A chat model is handed OpenAPI-described tools; each call it requests is resolved to a
//! local handler or an HTTP endpoint, executed in order, and folded back into the
//! conversation before the final completion.
//!
//! ```rust
//! use toolrelay::{ProviderId, parse_provider_id, platform_tool_record, relay_messages, turn};
//!
//! let request = turn("gpt-4o", relay_messages![user => "What time is it?"])
//!     .with_tool(platform_tool_record());
//!
//! assert_eq!(request.tools.len(), 1);
//! assert_eq!(parse_provider_id("custom"), Some(ProviderId::Custom));
//! ```

mod macros;

pub mod prelude;
pub mod providers;
pub mod runtime;
pub mod util;

pub use fchat;
pub use fcommon;
pub use fobserve;
pub use fprovider;
pub use fschema;
pub use ftooling;

pub use fchat::{
    ChatError, ChatErrorKind, ChatPolicy, ChatService, ChatServiceBuilder, ChatSettings,
    ChatTurnHooks, ChatTurnRequest, ChatTurnResult, DEFAULT_TOOL_MODEL, DirectChatRequest,
    NoopChatTurnHooks, TurnOutcome, TurnPhase,
};
pub use fcommon::{BoxFuture, MetadataMap, TraceId};
pub use fobserve::{
    MetricsObservabilityHooks, SafeProviderHooks, SafeToolHooks, SafeTurnHooks,
    TracingObservabilityHooks,
};
pub use fprovider::{
    ChatClientProxy, CustomModel, CustomModelStore, InMemoryCustomModelStore, Message,
    ModelCatalog, ModelProvider, ModelRequest, ModelResponse, OutputItem, ProviderError,
    ProviderErrorKind, ProviderFuture, ProviderId, ProviderOperationHooks, ProviderRegistry,
    RetryPolicy, Role, SecretString, StopReason, TokenUsage, ToolCall, ToolDefinition,
};
pub use fschema::{
    FunctionDescriptor, LOCAL_EXECUTOR, SchemaError, SchemaErrorKind, SchemaLoad, SchemaSource,
    SourceFailure, ToolRecord, load_sources,
};
pub use ftooling::{
    FunctionTool, HttpToolTransport, RemoteToolTransport, Tool, ToolError, ToolErrorKind,
    ToolExecutionContext, ToolExecutionResult, ToolFuture, ToolRegistry, ToolRuntimeHooks,
};

pub use providers::{
    DEFAULT_COMPLETION_TIMEOUT, ProviderBuildConfig, build_openai_provider, build_proxy,
    http_client,
};
pub use runtime::{
    DispatcherParts, build_dispatcher_with, chat_service, observed, platform_tool_record,
    platform_tools,
};
pub use util::{
    assistant_message, parse_provider_id, system_message, tool_record, turn, user_message,
};
