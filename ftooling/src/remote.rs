//! Outbound HTTP calls to remote tool endpoints.
//!
//! Failures never surface as errors here: they become `{"error": "<reason>"}`
//! payloads so the model can react to them on the next turn.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use crate::{BoundRequest, HttpMethod, ToolFuture};

pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq)]
pub struct RemoteResponse {
    /// Upstream status, absent when no response arrived.
    pub status: Option<u16>,
    pub payload: Value,
}

impl RemoteResponse {
    pub fn ok(status: u16, payload: Value) -> Self {
        Self {
            status: Some(status),
            payload,
        }
    }

    pub fn failed(status: Option<u16>, reason: impl Into<String>) -> Self {
        Self {
            status,
            payload: json!({ "error": reason.into() }),
        }
    }
}

pub trait RemoteToolTransport: Send + Sync {
    fn send<'a>(&'a self, request: BoundRequest) -> ToolFuture<'a, RemoteResponse>;
}

#[derive(Debug, Clone)]
pub struct HttpToolTransport {
    client: Client,
    timeout: Duration,
}

impl Default for HttpToolTransport {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

impl HttpToolTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            timeout: DEFAULT_REMOTE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl RemoteToolTransport for HttpToolTransport {
    fn send<'a>(&'a self, request: BoundRequest) -> ToolFuture<'a, RemoteResponse> {
        Box::pin(async move {
            let mut builder = match request.method {
                HttpMethod::Get => self.client.get(&request.url),
                HttpMethod::Post => self.client.post(&request.url),
            }
            .timeout(self.timeout);

            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = &request.body {
                match serde_json::to_vec(body) {
                    Ok(bytes) => builder = builder.body(bytes),
                    Err(err) => return RemoteResponse::failed(None, err.to_string()),
                }
            }

            let response = match builder.send().await {
                Ok(response) => response,
                Err(err) if err.is_timeout() => {
                    return RemoteResponse::failed(
                        None,
                        format!("request timed out after {}s", self.timeout.as_secs()),
                    );
                }
                Err(err) => return RemoteResponse::failed(None, err.to_string()),
            };

            let status = response.status();
            if !status.is_success() {
                return RemoteResponse::failed(Some(status.as_u16()), status_text(status));
            }

            match response.bytes().await {
                Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => {
                    RemoteResponse::ok(status.as_u16(), Value::Null)
                }
                Ok(bytes) => match serde_json::from_slice::<Value>(&bytes) {
                    Ok(payload) => RemoteResponse::ok(status.as_u16(), payload),
                    Err(err) => RemoteResponse::failed(
                        Some(status.as_u16()),
                        format!("invalid JSON response: {err}"),
                    ),
                },
                Err(err) => RemoteResponse::failed(Some(status.as_u16()), err.to_string()),
            }
        })
    }
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(ToString::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}
