//! Lookup of user-registered OpenAI-compatible endpoints.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::{ProviderError, ProviderFuture, SecretString};

/// An OpenAI-compatible endpoint registered under a caller-chosen id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomModel {
    pub id: String,
    /// Upstream model name; the request model is used when absent.
    pub model: Option<String>,
    pub base_url: String,
    pub api_key: SecretString,
}

impl CustomModel {
    pub fn new(
        id: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            model: None,
            base_url: base_url.into(),
            api_key: SecretString::new(api_key),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

pub trait CustomModelStore: Send + Sync {
    fn find<'a>(
        &'a self,
        id: &'a str,
    ) -> ProviderFuture<'a, Result<Option<CustomModel>, ProviderError>>;
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryCustomModelStore {
    models: Arc<RwLock<HashMap<String, CustomModel>>>,
}

impl InMemoryCustomModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, model: CustomModel) -> Result<(), ProviderError> {
        self.models
            .write()
            .map_err(|_| ProviderError::other("custom model store lock poisoned"))?
            .insert(model.id.clone(), model);
        Ok(())
    }

    pub fn with_model(self, model: CustomModel) -> Result<Self, ProviderError> {
        self.insert(model)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.models.read().map(|models| models.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CustomModelStore for InMemoryCustomModelStore {
    fn find<'a>(
        &'a self,
        id: &'a str,
    ) -> ProviderFuture<'a, Result<Option<CustomModel>, ProviderError>> {
        Box::pin(async move {
            let models = self
                .models
                .read()
                .map_err(|_| ProviderError::other("custom model store lock poisoned"))?;
            Ok(models.get(id).cloned())
        })
    }
}
