//! Common imports for most toolrelay applications.

pub use crate::{
    assistant_message, build_dispatcher_with, chat_service, observed, parse_provider_id,
    platform_tool_record, platform_tools, system_message, tool_record, turn, user_message,
};
pub use crate::{ProviderBuildConfig, build_openai_provider, build_proxy, http_client};
pub use crate::{relay_messages, relay_msg};
pub use crate::{
    ChatError, ChatErrorKind, ChatPolicy, ChatService, ChatServiceBuilder, ChatSettings,
    ChatTurnRequest, ChatTurnResult, CustomModel, DirectChatRequest, DispatcherParts,
    InMemoryCustomModelStore, Message, ModelProvider, ModelRequest, ProviderError, ProviderId,
    Role, ToolCall, ToolDefinition, ToolError, ToolExecutionContext, ToolExecutionResult,
    ToolRecord, ToolRegistry, TraceId, TurnOutcome,
};
