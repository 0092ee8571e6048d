//! Turn requests, outcomes, and phases.

use fcommon::TraceId;
use fprovider::{Message, ModelResponse, ProviderId, TokenUsage};
use fschema::{ShadowedFunction, SourceFailure, ToolRecord};
use ftooling::ToolExecutionResult;

/// Caller's generation settings; applied to the finalizing completion.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSettings {
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl ChatSettings {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurnRequest {
    pub settings: ChatSettings,
    pub messages: Vec<Message>,
    /// Completion client that produces the final answer.
    pub provider: ProviderId,
    pub custom_model_id: Option<String>,
    pub tools: Vec<ToolRecord>,
    pub trace_id: Option<TraceId>,
}

impl ChatTurnRequest {
    pub fn new(settings: ChatSettings, messages: Vec<Message>) -> Self {
        Self {
            settings,
            messages,
            provider: ProviderId::OpenAi,
            custom_model_id: None,
            tools: Vec::new(),
            trace_id: None,
        }
    }

    pub fn with_provider(mut self, provider: ProviderId) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_custom_model(mut self, custom_model_id: impl Into<String>) -> Self {
        self.provider = ProviderId::Custom;
        self.custom_model_id = Some(custom_model_id.into());
        self
    }

    pub fn with_tool(mut self, record: ToolRecord) -> Self {
        self.tools.push(record);
        self
    }

    pub fn with_tools(mut self, records: Vec<ToolRecord>) -> Self {
        self.tools = records;
        self
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<TraceId>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }
}

/// One completion against a custom model, with no tool planning.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectChatRequest {
    pub settings: ChatSettings,
    pub messages: Vec<Message>,
    pub provider: ProviderId,
    pub custom_model_id: Option<String>,
}

impl DirectChatRequest {
    pub fn custom(
        custom_model_id: impl Into<String>,
        settings: ChatSettings,
        messages: Vec<Message>,
    ) -> Self {
        Self {
            settings,
            messages,
            provider: ProviderId::Custom,
            custom_model_id: Some(custom_model_id.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnPhase {
    Planning,
    Calling,
    Finalizing,
}

impl TurnPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Calling => "calling",
            Self::Finalizing => "finalizing",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// The planner answered without requesting tools.
    Direct { content: String },
    /// Tools ran and the finalizing completion produced the answer.
    Final(ModelResponse),
}

impl TurnOutcome {
    pub fn content(&self) -> String {
        match self {
            Self::Direct { content } => content.clone(),
            Self::Final(response) => response.text(),
        }
    }

    pub fn used_tools(&self) -> bool {
        matches!(self, Self::Final(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurnResult {
    pub outcome: TurnOutcome,
    /// Conversation as sent to the finalizer, including assistant tool calls and results.
    pub transcript: Vec<Message>,
    pub tool_results: Vec<ToolExecutionResult>,
    pub tool_model: String,
    pub usage: TokenUsage,
    pub schema_failures: Vec<SourceFailure>,
    pub shadowed: Vec<ShadowedFunction>,
}

impl ChatTurnResult {
    pub fn content(&self) -> String {
        self.outcome.content()
    }
}
