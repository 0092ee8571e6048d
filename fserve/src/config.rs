//! Environment-driven server configuration.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use toolrelay::{CustomModel, DEFAULT_TOOL_MODEL, InMemoryCustomModelStore, SecretString};

use crate::ServeError;

pub const DEFAULT_BIND: &str = "127.0.0.1:8787";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_COMPLETION_TIMEOUT_SECS: u64 = 90;

#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub bind: SocketAddr,
    pub openai_api_key: Option<SecretString>,
    pub openai_organization: Option<String>,
    pub openai_base_url: Option<String>,
    /// Planning model used when the caller's model is outside the OpenAI catalog.
    pub default_tool_model: String,
    pub tool_timeout: Duration,
    pub completion_timeout: Duration,
    pub log_level: String,
    pub custom_models_path: Option<PathBuf>,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8787)),
            openai_api_key: None,
            openai_organization: None,
            openai_base_url: None,
            default_tool_model: DEFAULT_TOOL_MODEL.to_string(),
            tool_timeout: Duration::from_secs(DEFAULT_TOOL_TIMEOUT_SECS),
            completion_timeout: Duration::from_secs(DEFAULT_COMPLETION_TIMEOUT_SECS),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            custom_models_path: None,
        }
    }
}

impl ServeConfig {
    pub fn from_env() -> Result<Self, ServeError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bind = get("TOOLRELAY_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind
            .parse::<SocketAddr>()
            .map_err(|err| ServeError::config(format!("TOOLRELAY_BIND '{bind}' is invalid: {err}")))?;

        Ok(Self {
            bind,
            openai_api_key: get("OPENAI_API_KEY").map(SecretString::new),
            openai_organization: get("OPENAI_ORGANIZATION_ID"),
            openai_base_url: get("OPENAI_BASE_URL"),
            default_tool_model: get("OPENAI_DEFAULT_TOOL_MODEL")
                .unwrap_or_else(|| DEFAULT_TOOL_MODEL.to_string()),
            tool_timeout: seconds(
                "TOOLRELAY_TOOL_TIMEOUT_SECS",
                get("TOOLRELAY_TOOL_TIMEOUT_SECS"),
                DEFAULT_TOOL_TIMEOUT_SECS,
            )?,
            completion_timeout: seconds(
                "TOOLRELAY_COMPLETION_TIMEOUT_SECS",
                get("TOOLRELAY_COMPLETION_TIMEOUT_SECS"),
                DEFAULT_COMPLETION_TIMEOUT_SECS,
            )?,
            log_level: get("TOOLRELAY_LOG").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            custom_models_path: get("TOOLRELAY_CUSTOM_MODELS").map(PathBuf::from),
        })
    }

    pub fn load_custom_models(&self) -> Result<Option<InMemoryCustomModelStore>, ServeError> {
        self.custom_models_path
            .as_deref()
            .map(load_custom_models)
            .transpose()
    }
}

fn seconds(key: &str, value: Option<String>, default: u64) -> Result<Duration, ServeError> {
    let Some(value) = value else {
        return Ok(Duration::from_secs(default));
    };

    match value.parse::<u64>() {
        Ok(0) => Err(ServeError::config(format!("{key} must be greater than zero"))),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(_) => Err(ServeError::config(format!(
            "{key} must be a whole number of seconds, got '{value}'"
        ))),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomModelRecord {
    id: String,
    #[serde(default)]
    model: Option<String>,
    base_url: String,
    api_key: String,
}

pub fn load_custom_models(path: &Path) -> Result<InMemoryCustomModelStore, ServeError> {
    let raw = std::fs::read_to_string(path).map_err(|err| {
        ServeError::custom_models(format!("cannot read {}: {err}", path.display()))
    })?;
    parse_custom_models(&raw)
}

/// Parses a JSON array of `{id, model?, baseUrl, apiKey}` records.
pub fn parse_custom_models(raw: &str) -> Result<InMemoryCustomModelStore, ServeError> {
    let records: Vec<CustomModelRecord> = serde_json::from_str(raw)
        .map_err(|err| ServeError::custom_models(format!("invalid custom model list: {err}")))?;

    let store = InMemoryCustomModelStore::new();
    for record in records {
        let mut model = CustomModel::new(record.id, record.base_url, record.api_key);
        if let Some(name) = record.model {
            model = model.with_model(name);
        }
        store
            .insert(model)
            .map_err(|err| ServeError::custom_models(err.message))?;
    }

    Ok(store)
}
