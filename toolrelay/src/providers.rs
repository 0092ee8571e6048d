//! Completion client construction for facade consumers.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::{
    ChatClientProxy, CustomModelStore, ModelProvider, ProviderError, ProviderRegistry,
    SecretString,
};

pub const DEFAULT_COMPLETION_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Debug, Clone)]
pub struct ProviderBuildConfig {
    /// Without a key the provider still builds; each completion then fails with
    /// "OpenAI API Key not found".
    pub api_key: Option<SecretString>,
    pub organization: Option<String>,
    pub base_url: Option<String>,
    pub timeout: Duration,
}

impl Default for ProviderBuildConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            organization: None,
            base_url: None,
            timeout: DEFAULT_COMPLETION_TIMEOUT,
        }
    }
}

impl ProviderBuildConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::new(api_key));
        self
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

pub fn http_client(timeout: Duration) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| ProviderError::transport(err.to_string()))
}

#[cfg(feature = "provider-openai")]
pub fn build_openai_provider(
    config: &ProviderBuildConfig,
) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    use fprovider::SecureCredentialManager;
    use fprovider::adapters::openai::{OpenAiHttpTransport, OpenAiProvider};

    let credentials = Arc::new(SecureCredentialManager::new());
    if let Some(api_key) = config.api_key.as_ref().filter(|key| !key.is_empty()) {
        credentials.set_openai_api_key(api_key.expose().trim())?;
    }

    let mut transport = OpenAiHttpTransport::new(http_client(config.timeout)?);
    if let Some(base_url) = &config.base_url {
        transport = transport.with_base_url(base_url.clone());
    }
    if let Some(organization) = &config.organization {
        transport = transport.with_organization(organization.clone());
    }

    Ok(Arc::new(OpenAiProvider::new(credentials, Arc::new(transport))))
}

#[cfg(not(feature = "provider-openai"))]
pub fn build_openai_provider(
    _config: &ProviderBuildConfig,
) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    Err(ProviderError::invalid_request(
        "provider-openai feature is not enabled on toolrelay",
    ))
}

/// Finalizing proxy with `planner` registered and, optionally, custom models.
pub fn build_proxy(
    planner: Arc<dyn ModelProvider>,
    custom_models: Option<Arc<dyn CustomModelStore>>,
    timeout: Duration,
) -> Result<ChatClientProxy, ProviderError> {
    let mut providers = ProviderRegistry::new();
    providers.register_shared(planner);

    let proxy = ChatClientProxy::new(providers);
    let proxy = match custom_models {
        Some(store) => proxy.with_custom_models(store),
        None => proxy,
    };

    custom_factory(proxy, timeout)
}

#[cfg(feature = "provider-openai")]
fn custom_factory(proxy: ChatClientProxy, timeout: Duration) -> Result<ChatClientProxy, ProviderError> {
    let client = http_client(timeout)?;
    Ok(proxy.with_custom_factory(fprovider::adapters::openai::custom_model_factory(client)))
}

#[cfg(not(feature = "provider-openai"))]
fn custom_factory(proxy: ChatClientProxy, _timeout: Duration) -> Result<ChatClientProxy, ProviderError> {
    Ok(proxy)
}
