mod auth;
mod provider;
mod serde_api;
mod transport;
mod types;

pub use provider::{OpenAiProvider, custom_model_factory};
pub use transport::{DEFAULT_OPENAI_BASE_URL, OpenAiHttpTransport, OpenAiTransport};
pub use types::{
    OpenAiAssistantMessage, OpenAiAuth, OpenAiFinishReason, OpenAiMessage, OpenAiRequest,
    OpenAiResponse, OpenAiRole, OpenAiTool, OpenAiToolCall, OpenAiUsage,
};
