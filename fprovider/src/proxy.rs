//! Provider selection for the finalizing completion.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use fprovider::{ChatClientProxy, ProviderRegistry};
//!
//! let proxy = ChatClientProxy::new(ProviderRegistry::new());
//! assert!(proxy.custom_models().is_none());
//! let _shared = Arc::new(proxy);
//! ```

use std::sync::Arc;

use crate::{
    CustomModel, CustomModelStore, ModelProvider, ProviderError, ProviderFuture, ProviderId,
    ProviderRegistry,
};

/// Builds a provider bound to one custom model's endpoint and key.
pub type CustomProviderFactory =
    dyn Fn(&CustomModel) -> Result<Arc<dyn ModelProvider>, ProviderError> + Send + Sync;

/// A provider chosen for one completion, plus the model it must be asked for.
#[derive(Clone)]
pub struct ResolvedClient {
    pub provider: Arc<dyn ModelProvider>,
    /// Set for custom models that pin an upstream model name.
    pub model_override: Option<String>,
}

impl ResolvedClient {
    pub fn model_for(&self, requested: &str) -> String {
        self.model_override
            .clone()
            .unwrap_or_else(|| requested.to_string())
    }
}

impl std::fmt::Debug for ResolvedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedClient")
            .field("provider", &self.provider.id())
            .field("model_override", &self.model_override)
            .finish()
    }
}

#[derive(Clone)]
pub struct ChatClientProxy {
    providers: ProviderRegistry,
    custom_models: Option<Arc<dyn CustomModelStore>>,
    custom_factory: Option<Arc<CustomProviderFactory>>,
}

impl ChatClientProxy {
    pub fn new(providers: ProviderRegistry) -> Self {
        Self {
            providers,
            custom_models: None,
            custom_factory: default_custom_factory(),
        }
    }

    pub fn with_custom_models(mut self, store: Arc<dyn CustomModelStore>) -> Self {
        self.custom_models = Some(store);
        self
    }

    pub fn with_custom_factory(mut self, factory: Arc<CustomProviderFactory>) -> Self {
        self.custom_factory = Some(factory);
        self
    }

    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }

    pub fn custom_models(&self) -> Option<&Arc<dyn CustomModelStore>> {
        self.custom_models.as_ref()
    }

    /// Resolves the client for `provider`.
    ///
    /// `custom` requires `custom_model_id` and a configured store; every other provider
    /// must already be registered.
    pub fn resolve<'a>(
        &'a self,
        provider: ProviderId,
        custom_model_id: Option<&'a str>,
    ) -> ProviderFuture<'a, Result<ResolvedClient, ProviderError>> {
        Box::pin(async move {
            if provider != ProviderId::Custom {
                let client = self.providers.get(provider).ok_or_else(|| {
                    ProviderError::invalid_request(format!(
                        "provider '{provider}' is not configured"
                    ))
                    .with_status(400)
                })?;
                return Ok(ResolvedClient {
                    provider: client,
                    model_override: None,
                });
            }

            let id = custom_model_id
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .ok_or_else(|| {
                    ProviderError::invalid_request("customModelId is required for custom models")
                        .with_status(400)
                })?;
            let store = self.custom_models.as_ref().ok_or_else(|| {
                ProviderError::unavailable("custom models are not configured").with_status(503)
            })?;
            let model = store.find(id).await?.ok_or_else(|| {
                ProviderError::not_found(format!("custom model '{id}' not found"))
                    .with_status(404)
            })?;
            let factory = self.custom_factory.as_ref().ok_or_else(|| {
                ProviderError::unavailable("no client available for custom models")
                    .with_status(503)
            })?;

            Ok(ResolvedClient {
                provider: factory(&model)?,
                model_override: model.model.clone(),
            })
        })
    }
}

impl std::fmt::Debug for ChatClientProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClientProxy")
            .field("providers", &self.providers.ids())
            .field("custom_models", &self.custom_models.is_some())
            .finish()
    }
}

#[cfg(feature = "provider-openai")]
fn default_custom_factory() -> Option<Arc<CustomProviderFactory>> {
    Some(crate::adapters::openai::custom_model_factory(
        reqwest::Client::new(),
    ))
}

#[cfg(not(feature = "provider-openai"))]
fn default_custom_factory() -> Option<Arc<CustomProviderFactory>> {
    None
}
