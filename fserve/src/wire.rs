//! Inbound JSON bodies and their conversion into dispatcher requests.

use serde::Deserialize;
use serde_json::Value;
use toolrelay::{
    ChatSettings, ChatTurnRequest, DirectChatRequest, Message, ProviderId, Role, ToolCall,
    ToolRecord,
};

use crate::ApiError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSettingsBody {
    pub model: String,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl From<ChatSettingsBody> for ChatSettings {
    fn from(body: ChatSettingsBody) -> Self {
        Self {
            model: body.model,
            temperature: body.temperature,
            max_tokens: body.max_tokens,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FunctionBody {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallBody {
    pub id: String,
    pub function: FunctionBody,
}

/// Chat message in the OpenAI wire shape. Non-string content is kept as JSON text.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageBody {
    pub role: String,
    #[serde(default)]
    pub content: Value,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tool_call_id: Option<String>,
    /// `null` and absent both mean no calls.
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCallBody>>,
}

impl TryFrom<MessageBody> for Message {
    type Error = ApiError;

    fn try_from(body: MessageBody) -> Result<Self, Self::Error> {
        let role = match body.role.as_str() {
            "system" => Role::System,
            "user" => Role::User,
            "assistant" => Role::Assistant,
            "tool" => Role::Tool,
            other => {
                return Err(ApiError::bad_request(format!(
                    "Unsupported message role '{other}'"
                )));
            }
        };

        let content = match body.content {
            Value::Null => String::new(),
            Value::String(text) => text,
            other => other.to_string(),
        };

        let mut message = Message::new(role, content);
        message.name = body.name;
        message.tool_call_id = body.tool_call_id;
        message.tool_calls = body
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| ToolCall {
                id: call.id,
                name: call.function.name,
                arguments: call.function.arguments,
            })
            .collect();
        Ok(message)
    }
}

fn messages(bodies: Vec<MessageBody>) -> Result<Vec<Message>, ApiError> {
    bodies.into_iter().map(Message::try_from).collect()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsRequestBody {
    pub chat_settings: ChatSettingsBody,
    pub messages: Vec<MessageBody>,
    #[serde(default)]
    pub custom_model_id: Option<String>,
    #[serde(default)]
    pub selected_tools: Vec<ToolRecord>,
}

impl ToolsRequestBody {
    pub fn into_turn(self, provider: ProviderId) -> Result<ChatTurnRequest, ApiError> {
        let request = ChatTurnRequest::new(self.chat_settings.into(), messages(self.messages)?)
            .with_provider(provider)
            .with_tools(self.selected_tools);

        Ok(match self.custom_model_id {
            Some(id) if provider == ProviderId::Custom => request.with_custom_model(id),
            _ => request,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomChatBody {
    pub chat_settings: ChatSettingsBody,
    pub messages: Vec<MessageBody>,
    pub custom_model_id: String,
}

impl CustomChatBody {
    pub fn into_direct(self) -> Result<DirectChatRequest, ApiError> {
        Ok(DirectChatRequest::custom(
            self.custom_model_id,
            self.chat_settings.into(),
            messages(self.messages)?,
        ))
    }
}
