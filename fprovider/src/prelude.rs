//! Common `fprovider` imports for downstream crates.

pub use crate::{
    ChatClientProxy, Message, ModelCatalog, ModelProvider, ModelRequest, ModelRequestBuilder,
    ModelResponse, NoopOperationHooks, OutputItem, ProviderError, ProviderErrorKind, ProviderId,
    ProviderOperationHooks, ProviderRegistry, ResolvedClient, RetryPolicy, Role, StopReason,
    TokenUsage, ToolCall, ToolDefinition, ToolModelSelection, complete_with_retry,
};
pub use fcommon::{BoxFuture, MetadataMap};
