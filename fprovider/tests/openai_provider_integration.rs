#![cfg(feature = "provider-openai")]

use std::sync::Arc;

use fprovider::adapters::openai::{OpenAiHttpTransport, OpenAiProvider};
use fprovider::{
    ChatClientProxy, CustomModel, InMemoryCustomModelStore, Message, ModelProvider,
    ModelRequest, ProviderErrorKind, ProviderId, ProviderRegistry, Role,
    SecureCredentialManager,
};
use mockito::Matcher;
use serde_json::json;

fn http_provider(base_url: String, key: &str) -> OpenAiProvider {
    let credentials = Arc::new(SecureCredentialManager::new());
    credentials.set_openai_api_key(key).expect("key should set");
    let transport = OpenAiHttpTransport::new(reqwest::Client::new())
        .with_base_url(base_url)
        .with_organization("org-test");
    OpenAiProvider::new(credentials, Arc::new(transport))
}

#[tokio::test]
async fn http_transport_posts_chat_completion_and_parses_tool_calls() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-integration-123")
        .match_header("openai-organization", "org-test")
        .match_body(Matcher::PartialJson(json!({
            "model": "gpt-4o",
            "messages": [{"role": "user", "content": "what time is it?"}]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "model": "gpt-4o",
                "choices": [{
                    "message": {
                        "role": "assistant",
                        "content": null,
                        "tool_calls": [{
                            "id": "call_abc",
                            "type": "function",
                            "function": {"name": "getCurrentDateTime", "arguments": "{}"}
                        }]
                    },
                    "finish_reason": "tool_calls"
                }],
                "usage": {"prompt_tokens": 12, "completion_tokens": 5, "total_tokens": 17}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let provider = http_provider(server.url(), "sk-integration-123");
    let response = provider
        .complete(ModelRequest::new(
            "gpt-4o",
            vec![Message::new(Role::User, "what time is it?")],
        ))
        .await
        .expect("completion should succeed");

    mock.assert_async().await;
    let calls = response.tool_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].id, "call_abc");
    assert_eq!(calls[0].name, "getCurrentDateTime");
    assert_eq!(response.usage.total_tokens, 17);
}

#[tokio::test]
async fn http_transport_maps_unauthorized_with_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":{"message":"Incorrect API key provided: sk-bad"}}"#)
        .create_async()
        .await;

    let provider = http_provider(server.url(), "sk-bad");
    let error = provider
        .complete(ModelRequest::new(
            "gpt-4o",
            vec![Message::new(Role::User, "hi")],
        ))
        .await
        .expect_err("401 should fail");

    assert_eq!(error.kind, ProviderErrorKind::Authentication);
    assert_eq!(error.status, Some(401));
    assert!(error.message.contains("Incorrect API key"));
}

#[tokio::test]
async fn proxy_builds_custom_provider_against_stored_endpoint() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer team-key")
        .match_body(Matcher::PartialJson(json!({"model": "mixtral"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "model": "mixtral",
                "choices": [{
                    "message": {"role": "assistant", "content": "hello from custom"},
                    "finish_reason": "stop"
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let store = InMemoryCustomModelStore::new()
        .with_model(
            CustomModel::new("team", format!("{}/v1", server.url()), "team-key")
                .with_model("mixtral"),
        )
        .expect("insert should succeed");
    let proxy = ChatClientProxy::new(ProviderRegistry::new()).with_custom_models(Arc::new(store));

    let client = proxy
        .resolve(ProviderId::Custom, Some("team"))
        .await
        .expect("custom model should resolve");
    let response = client
        .provider
        .complete(ModelRequest::new(
            client.model_for("gpt-4o"),
            vec![Message::new(Role::User, "hi")],
        ))
        .await
        .expect("completion should succeed");

    mock.assert_async().await;
    assert_eq!(response.provider, ProviderId::Custom);
    assert_eq!(response.text(), "hello from custom");
}
