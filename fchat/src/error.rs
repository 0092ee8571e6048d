//! Turn-level errors and their mapping to caller-facing status and message.

use std::error::Error;
use std::fmt::{Display, Formatter};

use fprovider::{ProviderError, ProviderErrorKind, ProviderId};
use ftooling::{ToolError, ToolErrorKind};

use crate::TurnPhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatErrorKind {
    InvalidRequest,
    Authentication,
    Provider,
    Tooling,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatError {
    pub kind: ChatErrorKind,
    pub message: String,
    /// Phase of the turn that failed; `None` before planning starts.
    pub phase: Option<TurnPhase>,
    pub status: Option<u16>,
    /// Completion client the failure came from, when known.
    pub provider: Option<ProviderId>,
    pub tool_kind: Option<ToolErrorKind>,
}

impl ChatError {
    pub fn new(kind: ChatErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            phase: None,
            status: None,
            provider: None,
            tool_kind: None,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::InvalidRequest, message).with_status(400)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Provider, message)
    }

    pub fn tooling(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Tooling, message)
    }

    pub fn with_phase(mut self, phase: TurnPhase) -> Self {
        self.phase = Some(phase);
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_provider(mut self, provider: ProviderId) -> Self {
        self.provider = Some(provider);
        self
    }

    /// HTTP status for the boundary: the recorded one, else derived from the kind.
    pub fn status_code(&self) -> u16 {
        match (self.status, self.kind) {
            (Some(status), _) => status,
            (None, ChatErrorKind::InvalidRequest) => 400,
            (None, ChatErrorKind::Authentication) => 401,
            (None, _) => 500,
        }
    }

    /// Message shown to the caller. Credential failures become profile-settings hints.
    pub fn user_message(&self) -> String {
        let lowered = self.message.to_ascii_lowercase();
        let label = provider_label(self.provider);

        if lowered.contains("api key not found") {
            format!("{label} API Key not found. Please set it in your profile settings.")
        } else if lowered.contains("incorrect api key") {
            format!("{label} API Key is incorrect. Please fix it in your profile settings.")
        } else {
            self.message.clone()
        }
    }
}

fn provider_label(provider: Option<ProviderId>) -> &'static str {
    match provider {
        Some(ProviderId::Custom) => "Custom",
        Some(ProviderId::OpenAi) | None => "OpenAI",
    }
}

impl Display for ChatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.phase {
            Some(phase) => write!(f, "{:?} ({}): {}", self.kind, phase.as_str(), self.message),
            None => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl Error for ChatError {}

impl From<ProviderError> for ChatError {
    fn from(value: ProviderError) -> Self {
        let kind = match value.kind {
            ProviderErrorKind::Authentication => ChatErrorKind::Authentication,
            _ => ChatErrorKind::Provider,
        };

        let mut error = ChatError::new(kind, value.message);
        error.status = value.status;
        error
    }
}

impl From<ToolError> for ChatError {
    fn from(value: ToolError) -> Self {
        let mut error = ChatError::tooling(value.message);
        error.tool_kind = Some(value.kind);
        error
    }
}
