//! Model catalog of the canonical provider and tool-model selection.
//!
//! Each catalog entry declares whether the model accepts the literal `tool` role for
//! tool-result messages. Models outside the catalog are served by a fallback tool model
//! and receive tool results under the `system` role.
//!
//! ```rust
//! use fprovider::{ModelCatalog, Role};
//!
//! let catalog = ModelCatalog::openai();
//! let native = catalog.select_tool_model("gpt-4o", "gpt-3.5-turbo");
//! assert_eq!(native.model, "gpt-4o");
//! assert_eq!(native.result_role(), Role::Tool);
//!
//! let foreign = catalog.select_tool_model("mistral-large", "gpt-3.5-turbo");
//! assert_eq!(foreign.model, "gpt-3.5-turbo");
//! assert_eq!(foreign.result_role(), Role::System);
//! ```

use fcommon::Registry;

use crate::{ProviderId, Role};

const OPENAI_CHAT_MODELS: &[&str] = &[
    "gpt-4o",
    "gpt-4o-mini",
    "gpt-4-turbo",
    "gpt-4-turbo-preview",
    "gpt-4-vision-preview",
    "gpt-4",
    "gpt-3.5-turbo",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelProfile {
    pub model_id: String,
    pub provider: ProviderId,
    pub supports_tool_role: bool,
}

impl ModelProfile {
    pub fn new(model_id: impl Into<String>, provider: ProviderId) -> Self {
        Self {
            model_id: model_id.into(),
            provider,
            supports_tool_role: true,
        }
    }

    pub fn without_tool_role(mut self) -> Self {
        self.supports_tool_role = false;
        self
    }
}

#[derive(Debug, Clone)]
pub struct ModelCatalog {
    provider: ProviderId,
    models: Registry<String, ModelProfile>,
}

impl ModelCatalog {
    pub fn new(provider: ProviderId) -> Self {
        Self {
            provider,
            models: Registry::new(),
        }
    }

    /// Chat models served by the OpenAI API.
    pub fn openai() -> Self {
        OPENAI_CHAT_MODELS
            .iter()
            .fold(Self::new(ProviderId::OpenAi), |catalog, model| {
                catalog.with_model(*model)
            })
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        let profile = ModelProfile::new(model_id, self.provider);
        self.register(profile);
        self
    }

    pub fn register(&mut self, profile: ModelProfile) {
        self.models.insert(profile.model_id.clone(), profile);
    }

    pub fn provider(&self) -> ProviderId {
        self.provider
    }

    pub fn profile(&self, model_id: &str) -> Option<&ModelProfile> {
        self.models.get(model_id)
    }

    pub fn contains(&self, model_id: &str) -> bool {
        self.models.contains_key(model_id)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Picks the model used for the tool-planning completion.
    pub fn select_tool_model(&self, requested: &str, fallback: &str) -> ToolModelSelection {
        match self.profile(requested) {
            Some(profile) => ToolModelSelection {
                model: profile.model_id.clone(),
                in_catalog: true,
                supports_tool_role: profile.supports_tool_role,
            },
            None => ToolModelSelection {
                model: fallback.to_string(),
                in_catalog: false,
                supports_tool_role: false,
            },
        }
    }

    /// Model for a completion sent to `provider`; foreign model ids are replaced by
    /// `fallback` when the target is this catalog's provider.
    pub fn model_for_provider(&self, provider: ProviderId, requested: &str, fallback: &str) -> String {
        if provider == self.provider && !self.contains(requested) {
            fallback.to_string()
        } else {
            requested.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolModelSelection {
    pub model: String,
    pub in_catalog: bool,
    pub supports_tool_role: bool,
}

impl ToolModelSelection {
    /// Role used for tool-result messages appended during this turn.
    pub fn result_role(&self) -> Role {
        if self.supports_tool_role {
            Role::Tool
        } else {
            Role::System
        }
    }
}
