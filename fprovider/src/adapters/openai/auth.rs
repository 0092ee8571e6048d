//! OpenAI-specific credential helpers and auth resolution policy.

use crate::{ProviderError, ProviderId, SecureCredentialManager};

use super::types::OpenAiAuth;

impl SecureCredentialManager {
    /// Stores an OpenAI API key for provider-authenticated requests.
    ///
    /// OpenAI keys are expected to start with `sk-`.
    pub fn set_openai_api_key(&self, api_key: impl Into<String>) -> Result<(), ProviderError> {
        let api_key = api_key.into();
        if !api_key.starts_with("sk-") {
            return Err(ProviderError::authentication(
                "OpenAI API key must start with 'sk-'",
            ));
        }

        self.set_api_key(ProviderId::OpenAi, api_key)
    }
}

/// Resolves the API key stored for `provider`.
///
/// The "API Key not found" wording is matched downstream to build a user-facing hint.
pub(crate) fn resolve_openai_auth(
    credentials: &SecureCredentialManager,
    provider: ProviderId,
) -> Result<OpenAiAuth, ProviderError> {
    if let Some(api_key) = credentials.api_key(provider)? {
        return Ok(OpenAiAuth::ApiKey(api_key));
    }

    let label = match provider {
        ProviderId::OpenAi => "OpenAI",
        ProviderId::Custom => "Custom",
    };
    Err(ProviderError::authentication(format!("{label} API Key not found")).with_status(401))
}
