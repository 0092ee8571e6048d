use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use toolrelay::{ChatService, TurnOutcome, parse_provider_id};

use crate::ApiError;
use crate::wire::{CustomChatBody, ToolsRequestBody};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
pub struct AppState {
    pub chat: ChatService,
}

impl AppState {
    pub fn new(chat: ChatService) -> Self {
        Self { chat }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/tools/:provider", post(run_tools))
        .route("/api/chat/custom", post(chat_custom))
        .route("/api/health", get(health))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

async fn run_tools(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    headers: HeaderMap,
    body: Result<Json<ToolsRequestBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let provider = parse_provider_id(&provider)
        .ok_or_else(|| ApiError::bad_request(format!("Unsupported provider '{provider}'")))?;
    let Json(body) = body.map_err(rejected)?;

    let mut request = body.into_turn(provider)?;
    if let Some(trace_id) = request_id(&headers) {
        request = request.with_trace_id(trace_id);
    }

    let result = state.chat.run_turn(request).await?;
    tracing::debug!(
        tool_calls = result.tool_results.len(),
        total_tokens = result.usage.total_tokens,
        "turn completed"
    );

    let content_type = match &result.outcome {
        TurnOutcome::Direct { .. } => "application/json",
        TurnOutcome::Final(_) => "text/plain; charset=utf-8",
    };
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type)],
        result.content(),
    )
        .into_response())
}

async fn chat_custom(
    State(state): State<AppState>,
    body: Result<Json<CustomChatBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body.map_err(rejected)?;
    let response = state.chat.complete_direct(body.into_direct()?).await?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        response.text(),
    )
        .into_response())
}

fn request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn rejected(rejection: JsonRejection) -> ApiError {
    tracing::warn!(error = %rejection.body_text(), "rejected request body");
    ApiError::bad_request(rejection.body_text())
}
