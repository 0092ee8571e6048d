use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use fchat::prelude::*;
use fprovider::{
    ChatClientProxy, CustomModel, InMemoryCustomModelStore, Message, ModelProvider, ModelRequest,
    ModelResponse, OutputItem, ProviderError, ProviderFuture, ProviderId, ProviderRegistry,
    RetryPolicy, Role, StopReason, TokenUsage, ToolCall, ToolDefinition,
};
use ftooling::HttpToolTransport;
use serde_json::{Value, json};

/// Replays queued responses and records every request it receives.
struct ScriptedProvider {
    id: ProviderId,
    responses: Mutex<VecDeque<Result<ModelResponse, ProviderError>>>,
    requests: Mutex<Vec<ModelRequest>>,
}

impl ScriptedProvider {
    fn new(id: ProviderId, responses: Vec<Result<ModelResponse, ProviderError>>) -> Self {
        Self {
            id,
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl ModelProvider for ScriptedProvider {
    fn id(&self) -> ProviderId {
        self.id
    }

    fn complete<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<ModelResponse, ProviderError>> {
        Box::pin(async move {
            self.requests.lock().expect("requests lock").push(request);
            self.responses
                .lock()
                .expect("responses lock")
                .pop_front()
                .unwrap_or_else(|| Err(ProviderError::other("no scripted response left")))
        })
    }
}

fn text(provider: ProviderId, content: &str) -> Result<ModelResponse, ProviderError> {
    Ok(ModelResponse {
        provider,
        model: "scripted".to_string(),
        output: vec![OutputItem::Message(Message::new(Role::Assistant, content))],
        stop_reason: StopReason::EndTurn,
        usage: TokenUsage {
            input_tokens: 4,
            output_tokens: 2,
            total_tokens: 6,
        },
    })
}

fn calls(calls: &[(&str, &str, Value)]) -> Result<ModelResponse, ProviderError> {
    Ok(ModelResponse {
        provider: ProviderId::OpenAi,
        model: "scripted".to_string(),
        output: calls
            .iter()
            .map(|(id, name, arguments)| {
                OutputItem::ToolCall(ToolCall {
                    id: id.to_string(),
                    name: name.to_string(),
                    arguments: arguments.to_string(),
                })
            })
            .collect(),
        stop_reason: StopReason::ToolUse,
        usage: TokenUsage {
            input_tokens: 10,
            output_tokens: 3,
            total_tokens: 13,
        },
    })
}

fn local_schema() -> String {
    json!({
        "openapi": "3.0.0",
        "info": {"title": "Mailer", "description": "Sends mail"},
        "servers": [{"url": "local://executor"}],
        "paths": {
            "/email": {
                "post": {
                    "operationId": "sendEmail",
                    "description": "Send an email",
                    "requestBody": {"content": {"application/json": {"schema": {"type": "object"}}}}
                }
            }
        }
    })
    .to_string()
}

fn pets_schema(base_url: &str) -> String {
    json!({
        "openapi": "3.0.0",
        "info": {"title": "Pets"},
        "servers": [{"url": base_url}],
        "paths": {
            "/pets/{id}": {
                "get": {
                    "operationId": "getPet",
                    "parameters": [{"name": "id", "in": "path", "schema": {"type": "string"}}]
                }
            }
        }
    })
    .to_string()
}

fn mail_registry() -> Arc<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.register_sync_fn(
        ToolDefinition {
            name: "sendEmail".to_string(),
            description: "Send an email".to_string(),
            input_schema: "{\"type\":\"object\"}".to_string(),
        },
        |_args, _ctx| Ok(json!({"status": "sent"})),
    );
    Arc::new(registry)
}

fn user(content: &str) -> Vec<Message> {
    vec![Message::new(Role::User, content)]
}

#[tokio::test]
async fn no_tool_calls_returns_planner_content_without_second_completion() {
    let planner = Arc::new(ScriptedProvider::new(
        ProviderId::OpenAi,
        vec![text(ProviderId::OpenAi, "plain answer")],
    ));
    let service = ChatService::builder(planner.clone()).build();

    let result = service
        .run_turn(ChatTurnRequest::new(ChatSettings::new("gpt-4o"), user("hello")))
        .await
        .expect("turn should succeed");

    assert_eq!(
        result.outcome,
        TurnOutcome::Direct {
            content: "plain answer".to_string()
        }
    );
    let requests = planner.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].tools.is_empty());
    assert_eq!(requests[0].model, "gpt-4o");
}

#[tokio::test]
async fn local_tool_result_is_appended_and_finalized() {
    let planner = Arc::new(ScriptedProvider::new(
        ProviderId::OpenAi,
        vec![
            calls(&[("call_1", "sendEmail", json!({"requestBody": {"to": "a@b.c"}}))]),
            text(ProviderId::OpenAi, "email sent"),
        ],
    ));
    let service = ChatService::builder(planner.clone())
        .local_tools(mail_registry())
        .build();

    let request = ChatTurnRequest::new(
        ChatSettings::new("gpt-4o").with_temperature(0.4),
        user("mail Bob"),
    )
    .with_tool(ToolRecord::new(local_schema()));
    let result = service.run_turn(request).await.expect("turn should succeed");

    assert_eq!(result.content(), "email sent");
    assert_eq!(result.tool_results.len(), 1);
    assert_eq!(result.tool_results[0].content, r#"{"status":"sent"}"#);

    let requests = planner.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].tools.len(), 1);
    assert_eq!(requests[0].tools[0].name, "sendEmail");
    assert_eq!(requests[0].options.temperature, None);

    let finalizing = &requests[1];
    assert!(finalizing.tools.is_empty());
    assert_eq!(finalizing.options.temperature, Some(0.4));
    assert_eq!(finalizing.messages.len(), 3);
    assert!(finalizing.messages[1].has_tool_calls());
    let tool_message = &finalizing.messages[2];
    assert_eq!(tool_message.role, Role::Tool);
    assert_eq!(tool_message.tool_call_id.as_deref(), Some("call_1"));
    assert_eq!(tool_message.name.as_deref(), Some("sendEmail"));
    assert_eq!(result.usage.total_tokens, 19);
}

#[tokio::test]
async fn results_keep_request_order_even_when_remote_calls_fail() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/pets/1")
        .with_status(200)
        .with_body(r#"{"id":"1","name":"Rex"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/pets/2")
        .with_status(404)
        .create_async()
        .await;

    let planner = Arc::new(ScriptedProvider::new(
        ProviderId::OpenAi,
        vec![
            calls(&[
                ("call_a", "getPet", json!({"parameters": {"id": "2"}})),
                ("call_b", "sendEmail", json!({})),
                ("call_c", "getPet", json!({"parameters": {"id": "1"}})),
            ]),
            text(ProviderId::OpenAi, "done"),
        ],
    ));
    let service = ChatService::builder(planner.clone())
        .local_tools(mail_registry())
        .transport(Arc::new(HttpToolTransport::default()))
        .build();

    let request = ChatTurnRequest::new(ChatSettings::new("gpt-4o"), user("pets"))
        .with_tool(ToolRecord::new(pets_schema(&server.url())))
        .with_tool(ToolRecord::new(local_schema()));
    let result = service.run_turn(request).await.expect("turn should succeed");

    let ids: Vec<&str> = result
        .tool_results
        .iter()
        .map(|result| result.tool_call_id.as_str())
        .collect();
    assert_eq!(ids, vec!["call_a", "call_b", "call_c"]);
    assert_eq!(result.tool_results[0].content, r#"{"error":"Not Found"}"#);
    assert!(result.tool_results[0].is_folded_error());
    assert_eq!(result.tool_results[2].content, r#"{"id":"1","name":"Rex"}"#);

    let transcript_ids: Vec<Option<&str>> = result.transcript[2..]
        .iter()
        .map(|message| message.tool_call_id.as_deref())
        .collect();
    assert_eq!(
        transcript_ids,
        vec![Some("call_a"), Some("call_b"), Some("call_c")]
    );
}

#[tokio::test]
async fn invalid_generation_settings_fail_before_any_tool_runs() {
    let sent = Arc::new(AtomicUsize::new(0));
    let mut registry = ToolRegistry::new();
    let counter = sent.clone();
    registry.register_sync_fn(
        ToolDefinition {
            name: "sendEmail".to_string(),
            description: "Send an email".to_string(),
            input_schema: "{\"type\":\"object\"}".to_string(),
        },
        move |_args, _ctx| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(json!({"status": "sent"}))
        },
    );

    let planner = Arc::new(ScriptedProvider::new(
        ProviderId::OpenAi,
        vec![
            calls(&[("call_1", "sendEmail", json!({"requestBody": {"to": "a@b.c"}}))]),
            text(ProviderId::OpenAi, "email sent"),
        ],
    ));
    let service = ChatService::builder(planner.clone())
        .local_tools(Arc::new(registry))
        .build();

    for settings in [
        ChatSettings::new("gpt-4o").with_temperature(3.0),
        ChatSettings::new("gpt-4o").with_max_tokens(0),
    ] {
        let request = ChatTurnRequest::new(settings, user("mail Bob"))
            .with_tool(ToolRecord::new(local_schema()));
        let error = service.run_turn(request).await.expect_err("turn should fail");
        assert_eq!(error.status_code(), 400);
    }

    assert!(planner.requests().is_empty());
    assert_eq!(sent.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unknown_function_aborts_before_finalizing() {
    let planner = Arc::new(ScriptedProvider::new(
        ProviderId::OpenAi,
        vec![calls(&[("call_1", "launchRocket", json!({}))])],
    ));
    let service = ChatService::builder(planner.clone())
        .local_tools(mail_registry())
        .build();

    let request = ChatTurnRequest::new(ChatSettings::new("gpt-4o"), user("launch"))
        .with_tool(ToolRecord::new(local_schema()));
    let error = service.run_turn(request).await.expect_err("turn should fail");

    assert_eq!(error.phase, Some(TurnPhase::Calling));
    assert_eq!(error.tool_kind, Some(ToolErrorKind::FunctionNotRegistered));
    assert_eq!(error.message, "Function launchRocket not found in any schema");
    assert_eq!(error.status_code(), 500);
    assert_eq!(planner.requests().len(), 1);
}

#[tokio::test]
async fn missing_local_handler_is_turn_fatal() {
    let planner = Arc::new(ScriptedProvider::new(
        ProviderId::OpenAi,
        vec![calls(&[("call_1", "sendEmail", json!({}))])],
    ));
    let service = ChatService::builder(planner).build();

    let request = ChatTurnRequest::new(ChatSettings::new("gpt-4o"), user("mail"))
        .with_tool(ToolRecord::new(local_schema()));
    let error = service.run_turn(request).await.expect_err("turn should fail");

    assert_eq!(error.tool_kind, Some(ToolErrorKind::NotFound));
    assert_eq!(error.message, "Function sendEmail not found");
}

#[tokio::test]
async fn broken_schemas_are_skipped_and_reported() {
    let planner = Arc::new(ScriptedProvider::new(
        ProviderId::OpenAi,
        vec![text(ProviderId::OpenAi, "nothing to do")],
    ));
    let service = ChatService::builder(planner.clone()).build();

    let request = ChatTurnRequest::new(ChatSettings::new("gpt-4o"), user("hi"))
        .with_tool(ToolRecord::new("not json").with_name("broken"))
        .with_tool(ToolRecord::new(local_schema()));
    let result = service.run_turn(request).await.expect("turn should succeed");

    assert_eq!(result.schema_failures.len(), 1);
    assert_eq!(result.schema_failures[0].index, 0);
    assert_eq!(planner.requests()[0].tools.len(), 1);
}

#[tokio::test]
async fn foreign_models_plan_with_fallback_and_use_system_role() {
    let planner = Arc::new(ScriptedProvider::new(
        ProviderId::OpenAi,
        vec![calls(&[("call_1", "sendEmail", json!({}))])],
    ));
    let custom = Arc::new(ScriptedProvider::new(
        ProviderId::Custom,
        vec![text(ProviderId::Custom, "custom final")],
    ));

    let store = InMemoryCustomModelStore::new()
        .with_model(
            CustomModel::new(
                "team-llama",
                "http://llama.internal/v1",
                "key",
            )
            .with_model("llama-3-70b"),
        )
        .expect("store insert");
    let custom_for_factory = custom.clone();
    let mut providers = ProviderRegistry::new();
    providers.register_shared(planner.clone());
    let proxy = ChatClientProxy::new(providers)
        .with_custom_models(Arc::new(store))
        .with_custom_factory(Arc::new(move |_model: &CustomModel| {
            Ok(custom_for_factory.clone() as Arc<dyn ModelProvider>)
        }));

    let service = ChatService::builder(planner.clone())
        .proxy(proxy)
        .local_tools(mail_registry())
        .policy(ChatPolicy::default().with_retry(RetryPolicy::disabled()))
        .build();

    let request = ChatTurnRequest::new(ChatSettings::new("llama-3-70b"), user("mail"))
        .with_custom_model("team-llama")
        .with_tool(ToolRecord::new(local_schema()));
    let result = service.run_turn(request).await.expect("turn should succeed");

    assert_eq!(result.tool_model, "gpt-3.5-turbo");
    assert_eq!(planner.requests()[0].model, "gpt-3.5-turbo");
    assert_eq!(result.content(), "custom final");

    let finalizing = custom.requests();
    assert_eq!(finalizing.len(), 1);
    assert_eq!(finalizing[0].model, "llama-3-70b");
    assert_eq!(finalizing[0].messages[2].role, Role::System);
}

#[tokio::test]
async fn unknown_custom_model_surfaces_not_found() {
    let planner = Arc::new(ScriptedProvider::new(
        ProviderId::OpenAi,
        vec![calls(&[("call_1", "sendEmail", json!({}))])],
    ));
    let proxy = ChatClientProxy::new(ProviderRegistry::new())
        .with_custom_models(Arc::new(InMemoryCustomModelStore::new()));
    let service = ChatService::builder(planner)
        .proxy(proxy)
        .local_tools(mail_registry())
        .build();

    let request = ChatTurnRequest::new(ChatSettings::new("gpt-4o"), user("mail"))
        .with_custom_model("ghost")
        .with_tool(ToolRecord::new(local_schema()));
    let error = service.run_turn(request).await.expect_err("turn should fail");

    assert_eq!(error.phase, Some(TurnPhase::Finalizing));
    assert_eq!(error.provider, Some(ProviderId::Custom));
    assert_eq!(error.status_code(), 404);
}

#[tokio::test]
async fn planner_credential_failure_becomes_profile_hint() {
    let planner = Arc::new(ScriptedProvider::new(
        ProviderId::OpenAi,
        vec![Err(
            ProviderError::authentication("OpenAI API Key not found").with_status(401)
        )],
    ));
    let service = ChatService::builder(planner).build();

    let error = service
        .run_turn(ChatTurnRequest::new(ChatSettings::new("gpt-4o"), user("hi")))
        .await
        .expect_err("turn should fail");

    assert_eq!(error.phase, Some(TurnPhase::Planning));
    assert_eq!(error.status_code(), 401);
    assert_eq!(
        error.user_message(),
        "OpenAI API Key not found. Please set it in your profile settings."
    );
}

#[tokio::test]
async fn direct_custom_completion_skips_planning() {
    let planner = Arc::new(ScriptedProvider::new(ProviderId::OpenAi, Vec::new()));
    let custom = Arc::new(ScriptedProvider::new(
        ProviderId::Custom,
        vec![text(ProviderId::Custom, "hi from llama")],
    ));
    let store = InMemoryCustomModelStore::new()
        .with_model(CustomModel::new(
            "team-llama",
            "http://llama.internal/v1",
            "key",
        ))
        .expect("store insert");
    let custom_for_factory = custom.clone();
    let proxy = ChatClientProxy::new(ProviderRegistry::new())
        .with_custom_models(Arc::new(store))
        .with_custom_factory(Arc::new(move |_model: &CustomModel| {
            Ok(custom_for_factory.clone() as Arc<dyn ModelProvider>)
        }));
    let service = ChatService::builder(planner.clone()).proxy(proxy).build();

    let response = service
        .complete_direct(DirectChatRequest::custom(
            "team-llama",
            ChatSettings::new("llama-3-8b").with_max_tokens(64),
            user("hi"),
        ))
        .await
        .expect("completion should succeed");

    assert_eq!(response.text(), "hi from llama");
    assert!(planner.requests().is_empty());
    let sent = custom.requests();
    assert_eq!(sent[0].model, "llama-3-8b");
    assert_eq!(sent[0].options.max_tokens, Some(64));
}
