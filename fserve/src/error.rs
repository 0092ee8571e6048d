use std::fmt::{Display, Formatter};

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use toolrelay::{ChatError, ProviderError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeErrorKind {
    Config,
    CustomModels,
    Provider,
    Io,
}

/// Startup failure: bad configuration or an unbindable listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeError {
    pub kind: ServeErrorKind,
    pub message: String,
}

impl ServeError {
    pub fn new(kind: ServeErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ServeErrorKind::Config, message)
    }

    pub fn custom_models(message: impl Into<String>) -> Self {
        Self::new(ServeErrorKind::CustomModels, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ServeErrorKind::Io, message)
    }
}

impl Display for ServeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ServeError {}

impl From<ProviderError> for ServeError {
    fn from(error: ProviderError) -> Self {
        Self::new(ServeErrorKind::Provider, error.to_string())
    }
}

impl From<std::io::Error> for ServeError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

/// Request failure rendered as `{"message": ...}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl From<ChatError> for ApiError {
    fn from(error: ChatError) -> Self {
        let status =
            StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        tracing::error!(
            error_kind = ?error.kind,
            phase = error.phase.map(|phase| phase.as_str()),
            status = status.as_u16(),
            error = %error,
            "chat request failed"
        );
        Self::new(status, error.user_message())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                message: self.message,
            }),
        )
            .into_response()
    }
}
