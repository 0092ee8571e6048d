//! Small convenience constructors for common types.

use crate::{ChatSettings, ChatTurnRequest, Message, ProviderId, Role, ToolRecord};

pub fn system_message(content: impl Into<String>) -> Message {
    Message::new(Role::System, content)
}

pub fn user_message(content: impl Into<String>) -> Message {
    Message::new(Role::User, content)
}

pub fn assistant_message(content: impl Into<String>) -> Message {
    Message::new(Role::Assistant, content)
}

/// Tool record from a raw schema document and optional raw JSON headers.
pub fn tool_record(schema: impl Into<String>, custom_headers: Option<&str>) -> ToolRecord {
    let record = ToolRecord::new(schema);
    match custom_headers {
        Some(headers) => record.with_custom_headers(headers),
        None => record,
    }
}

pub fn turn(model: impl Into<String>, messages: Vec<Message>) -> ChatTurnRequest {
    ChatTurnRequest::new(ChatSettings::new(model), messages)
}

/// Parses the provider segment of `/api/tools/{provider}`.
pub fn parse_provider_id(value: &str) -> Option<ProviderId> {
    match value.trim().to_ascii_lowercase().as_str() {
        "openai" | "open-ai" => Some(ProviderId::OpenAi),
        "custom" => Some(ProviderId::Custom),
        _ => None,
    }
}
