//! Tool runtime context and execution result types.

use fcommon::{MetadataMap, TraceId};
use fprovider::{Message, Role, ToolCall};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolExecutionContext {
    pub trace_id: Option<TraceId>,
    pub metadata: MetadataMap,
}

impl ToolExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<TraceId>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Where a resolved call was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallTarget {
    Local,
    Remote,
}

/// Outcome of one tool call, ready to be appended to the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolExecutionResult {
    pub tool_call_id: String,
    pub function_name: String,
    /// JSON-encoded payload.
    pub content: String,
    pub target: CallTarget,
    /// Upstream status for remote calls that got a response.
    pub status: Option<u16>,
}

impl ToolExecutionResult {
    pub fn new(call: &ToolCall, payload: &Value, target: CallTarget) -> Self {
        Self {
            tool_call_id: call.id.clone(),
            function_name: call.name.clone(),
            content: payload.to_string(),
            target,
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Whether a remote payload was a folded `{"error": ..}` failure.
    pub fn is_folded_error(&self) -> bool {
        self.target == CallTarget::Remote
            && serde_json::from_str::<Value>(&self.content)
                .ok()
                .and_then(|value| value.as_object().map(|object| object.contains_key("error")))
                .unwrap_or(false)
    }

    pub fn into_message(self, role: Role) -> Message {
        Message::tool_result(role, self.tool_call_id, self.function_name, self.content)
    }
}
