use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use fserve::{AppState, router};
use mockito::Matcher;
use serde_json::{Value, json};
use toolrelay::{
    CustomModel, CustomModelStore, DispatcherParts, InMemoryCustomModelStore, Message,
    ModelProvider, ModelRequest, ModelResponse, OutputItem, ProviderBuildConfig, ProviderError,
    ProviderFuture, ProviderId, Role, StopReason, TokenUsage, ToolCall, build_dispatcher_with,
    build_openai_provider, build_proxy, platform_tool_record,
};
use tower::ServiceExt;

#[derive(Default)]
struct ScriptedProvider {
    responses: Mutex<VecDeque<Vec<OutputItem>>>,
    requests: Mutex<Vec<ModelRequest>>,
}

impl ScriptedProvider {
    fn new(responses: Vec<Vec<OutputItem>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl ModelProvider for ScriptedProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenAi
    }

    fn complete<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<ModelResponse, ProviderError>> {
        Box::pin(async move {
            self.requests
                .lock()
                .expect("requests lock")
                .push(request.clone());
            let output = self
                .responses
                .lock()
                .expect("responses lock")
                .pop_front()
                .ok_or_else(|| ProviderError::other("no scripted response left"))?;

            Ok(ModelResponse {
                provider: ProviderId::OpenAi,
                model: request.model,
                output,
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage::default(),
            })
        })
    }
}

fn text(content: &str) -> Vec<OutputItem> {
    vec![OutputItem::Message(Message::new(Role::Assistant, content))]
}

fn call(name: &str, arguments: Value) -> Vec<OutputItem> {
    vec![OutputItem::ToolCall(ToolCall {
        id: "call_1".to_string(),
        name: name.to_string(),
        arguments: arguments.to_string(),
    })]
}

fn app(provider: Arc<ScriptedProvider>) -> Router {
    let service =
        build_dispatcher_with(provider, DispatcherParts::default().without_observability());
    router(AppState::new(service))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Option<String>, String) {
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");

    (
        status,
        content_type,
        String::from_utf8(bytes.to_vec()).expect("utf-8 body"),
    )
}

fn error_message(body: &str) -> String {
    let value: Value = serde_json::from_str(body).expect("json error body");
    value["message"].as_str().expect("message field").to_string()
}

fn platform_tools_body(model: &str, prompt: &str) -> Value {
    json!({
        "chatSettings": {"model": model, "temperature": 0.4},
        "messages": [{"role": "user", "content": prompt}],
        "selectedTools": [{"name": "platform", "schema": platform_tool_record().schema}]
    })
}

#[tokio::test]
async fn health_reports_ok() {
    let request = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .expect("request");
    let (status, _, body) = send(app(ScriptedProvider::new(vec![])), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).expect("json"), json!({"status": "ok"}));
}

#[tokio::test]
async fn direct_answer_is_returned_as_json_content() {
    let provider = ScriptedProvider::new(vec![text("No tools needed.")]);
    let (status, content_type, body) = send(
        app(provider.clone()),
        post_json("/api/tools/openai", platform_tools_body("gpt-4o", "hello")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert_eq!(body, "No tools needed.");
    assert_eq!(provider.requests().len(), 1);
}

#[tokio::test]
async fn tool_turn_returns_final_text_as_plain_text() {
    let provider = ScriptedProvider::new(vec![
        call("echoArguments", json!({"requestBody": {"ping": "pong"}})),
        text("Echoed pong."),
    ]);
    let request = Request::builder()
        .method("POST")
        .uri("/api/tools/openai")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-request-id", "req-77")
        .body(Body::from(platform_tools_body("gpt-4o", "echo ping").to_string()))
        .expect("request");

    let (status, content_type, body) = send(app(provider.clone()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/plain; charset=utf-8"));
    assert_eq!(body, "Echoed pong.");

    let requests = provider.requests();
    assert_eq!(requests.len(), 2);
    assert!(!requests[0].tools.is_empty());
    assert_eq!(requests[0].options.temperature, None);
    assert!(requests[1].tools.is_empty());
    assert_eq!(requests[1].options.temperature, Some(0.4));

    let tool_message = requests[1]
        .messages
        .iter()
        .find(|message| message.role == Role::Tool)
        .expect("tool result appended");
    assert_eq!(tool_message.tool_call_id.as_deref(), Some("call_1"));
    assert!(tool_message.content.contains("pong"));
}

#[tokio::test]
async fn unsupported_provider_segment_is_rejected() {
    let (status, _, body) = send(
        app(ScriptedProvider::new(vec![])),
        post_json("/api/tools/anthropic", platform_tools_body("gpt-4o", "hi")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Unsupported provider 'anthropic'");
}

#[tokio::test]
async fn malformed_body_becomes_message_error() {
    let (status, _, body) = send(
        app(ScriptedProvider::new(vec![])),
        post_json("/api/tools/openai", json!({"messages": []})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).contains("chatSettings"));
}

#[tokio::test]
async fn empty_conversation_is_rejected_before_planning() {
    let provider = ScriptedProvider::new(vec![]);
    let (status, _, body) = send(
        app(provider.clone()),
        post_json(
            "/api/tools/openai",
            json!({"chatSettings": {"model": "gpt-4o"}, "messages": []}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "at least one message is required");
    assert!(provider.requests().is_empty());
}

#[tokio::test]
async fn unknown_function_fails_the_turn_with_server_error() {
    let provider = ScriptedProvider::new(vec![call("launchRocket", json!({}))]);
    let (status, _, body) = send(
        app(provider),
        post_json("/api/tools/openai", platform_tools_body("gpt-4o", "launch")),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        error_message(&body),
        "Function launchRocket not found in any schema"
    );
}

#[tokio::test]
async fn custom_chat_without_configured_models_is_unavailable() {
    let (status, _, body) = send(
        app(ScriptedProvider::new(vec![])),
        post_json(
            "/api/chat/custom",
            json!({
                "chatSettings": {"model": "llama"},
                "messages": [{"role": "user", "content": "hi"}],
                "customModelId": "llama"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(error_message(&body), "custom models are not configured");
}

fn custom_app(base_url: String) -> Router {
    let planner = build_openai_provider(&ProviderBuildConfig::new()).expect("planner");
    let store = InMemoryCustomModelStore::new()
        .with_model(CustomModel::new("llama", base_url, "custom-key").with_model("llama-3-70b"))
        .expect("store");
    let proxy = build_proxy(
        planner.clone(),
        Some(Arc::new(store) as Arc<dyn CustomModelStore>),
        Duration::from_secs(5),
    )
    .expect("proxy");
    let service = build_dispatcher_with(
        planner,
        DispatcherParts::default()
            .with_proxy(proxy)
            .without_observability(),
    );
    router(AppState::new(service))
}

fn custom_chat_body() -> Value {
    json!({
        "chatSettings": {"model": "llama", "temperature": 0.1},
        "messages": [{"role": "user", "content": "hi"}],
        "customModelId": "llama"
    })
}

#[tokio::test]
async fn custom_chat_completes_against_stored_model() {
    let mut server = mockito::Server::new_async().await;
    let completion = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer custom-key")
        .match_body(Matcher::Regex(r#""model":"llama-3-70b""#.to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "model": "llama-3-70b",
                "choices": [{
                    "message": {"role": "assistant", "content": "Hello from llama."},
                    "finish_reason": "stop"
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let (status, content_type, body) = send(
        custom_app(server.url()),
        post_json("/api/chat/custom", custom_chat_body()),
    )
    .await;

    completion.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/plain; charset=utf-8"));
    assert_eq!(body, "Hello from llama.");
}

#[tokio::test]
async fn custom_chat_rejected_key_becomes_profile_hint() {
    let mut server = mockito::Server::new_async().await;
    let _completion = server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#)
        .create_async()
        .await;

    let (status, _, body) = send(
        custom_app(server.url()),
        post_json("/api/chat/custom", custom_chat_body()),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        error_message(&body),
        "Custom API Key is incorrect. Please fix it in your profile settings."
    );
}
