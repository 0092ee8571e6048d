//! In-memory API key storage with redacted debug output.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::{ProviderError, ProviderId};

#[derive(Clone, PartialEq, Eq)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn expose(&self) -> &str {
        self.value.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        // SAFETY: zero bytes are valid UTF-8.
        unsafe {
            self.value.as_mut_vec().fill(0);
        }
    }
}

#[derive(Default)]
pub struct SecureCredentialManager {
    api_keys: Mutex<HashMap<ProviderId, SecretString>>,
}

impl SecureCredentialManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_api_key(
        &self,
        provider: ProviderId,
        api_key: impl Into<String>,
    ) -> Result<(), ProviderError> {
        let api_key = SecretString::new(api_key);
        if api_key.is_empty() {
            return Err(ProviderError::authentication("api key must not be empty"));
        }

        self.api_keys_guard()?.insert(provider, api_key);
        Ok(())
    }

    pub fn has_api_key(&self, provider: ProviderId) -> Result<bool, ProviderError> {
        Ok(self.api_keys_guard()?.contains_key(&provider))
    }

    pub fn api_key(&self, provider: ProviderId) -> Result<Option<SecretString>, ProviderError> {
        Ok(self.api_keys_guard()?.get(&provider).cloned())
    }

    pub fn clear(&self, provider: ProviderId) -> Result<bool, ProviderError> {
        Ok(self.api_keys_guard()?.remove(&provider).is_some())
    }

    fn api_keys_guard(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<ProviderId, SecretString>>, ProviderError> {
        self.api_keys
            .lock()
            .map_err(|_| ProviderError::other("credential manager lock poisoned"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProviderErrorKind;

    #[test]
    fn secret_debug_output_is_redacted() {
        let secret = SecretString::new("sk-very-secret");
        assert_eq!(format!("{secret:?}"), "[REDACTED]");
        assert_eq!(secret.expose(), "sk-very-secret");
    }

    #[test]
    fn manager_stores_and_clears_keys_per_provider() {
        let manager = SecureCredentialManager::new();
        manager
            .set_api_key(ProviderId::Custom, "local-key")
            .expect("key should set");

        assert!(manager.has_api_key(ProviderId::Custom).expect("lookup"));
        assert!(!manager.has_api_key(ProviderId::OpenAi).expect("lookup"));
        assert_eq!(
            manager
                .api_key(ProviderId::Custom)
                .expect("lookup")
                .map(|key| key.expose().to_string()),
            Some("local-key".to_string())
        );

        assert!(manager.clear(ProviderId::Custom).expect("clear"));
        assert!(!manager.has_api_key(ProviderId::Custom).expect("lookup"));
    }

    #[test]
    fn manager_rejects_blank_keys() {
        let manager = SecureCredentialManager::new();
        let error = manager
            .set_api_key(ProviderId::OpenAi, "   ")
            .expect_err("blank key must fail");
        assert_eq!(error.kind, ProviderErrorKind::Authentication);
    }
}
