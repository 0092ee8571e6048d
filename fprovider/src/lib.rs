//! Completion-client capability used by the tool-invocation dispatcher.
//!
//! A provider accepts a message list plus tool descriptors and answers with either
//! assistant content or a list of requested tool calls.

mod catalog;
mod credentials;
mod custom;
mod error;
mod model;
mod provider;
mod proxy;
mod registry;
mod resilience;

pub mod adapters;
pub mod prelude;

pub use catalog::{ModelCatalog, ModelProfile, ToolModelSelection};
pub use credentials::{SecretString, SecureCredentialManager};
pub use custom::{CustomModel, CustomModelStore, InMemoryCustomModelStore};
pub use error::{ProviderError, ProviderErrorKind};
pub use model::{
    Message, ModelRequest, ModelRequestBuilder, ModelResponse, OutputItem, ProviderId, Role,
    StopReason, TokenUsage, ToolCall, ToolDefinition,
};
pub use provider::{ModelProvider, ProviderFuture};
pub use proxy::{ChatClientProxy, CustomProviderFactory, ResolvedClient};
pub use registry::ProviderRegistry;
pub use resilience::{
    NoopOperationHooks, ProviderOperationHooks, RetryPolicy, complete_with_retry,
    execute_with_retry,
};
