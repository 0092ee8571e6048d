//! Tool-calling turn orchestration over completion clients.
//!
//! A turn plans with the canonical client, runs each requested tool call in order,
//! and sends the enriched conversation to the caller's finalizing client.
//!
//! ```rust
//! use fchat::{ChatSettings, ChatTurnRequest};
//! use fprovider::{Message, ProviderId, Role};
//! use fschema::ToolRecord;
//!
//! let request = ChatTurnRequest::new(
//!     ChatSettings::new("gpt-4o").with_temperature(0.2),
//!     vec![Message::new(Role::User, "What time is it?")],
//! )
//! .with_tool(ToolRecord::new("{}").with_name("clock"))
//! .with_custom_model("team-llama");
//!
//! assert_eq!(request.provider, ProviderId::Custom);
//! assert_eq!(request.tools.len(), 1);
//! ```

mod error;
mod hooks;
mod service;
mod types;

pub mod prelude {
    pub use crate::{
        ChatError, ChatErrorKind, ChatPolicy, ChatService, ChatServiceBuilder, ChatSettings,
        ChatTurnHooks, ChatTurnRequest, ChatTurnResult, DirectChatRequest, TurnOutcome,
        TurnPhase,
    };
    pub use fcommon::TraceId;
    pub use fschema::ToolRecord;
    pub use ftooling::{ToolError, ToolErrorKind, ToolExecutionResult, ToolRegistry};
}

pub use error::{ChatError, ChatErrorKind};
pub use hooks::{ChatTurnHooks, NoopChatTurnHooks};
pub use service::{ChatPolicy, ChatService, ChatServiceBuilder, DEFAULT_TOOL_MODEL};
pub use types::{
    ChatSettings, ChatTurnRequest, ChatTurnResult, DirectChatRequest, TurnOutcome, TurnPhase,
};
