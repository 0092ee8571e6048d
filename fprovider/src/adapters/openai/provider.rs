//! OpenAI provider implementation over transport and shared models.

use std::sync::Arc;

use reqwest::Client;

use crate::{
    CustomModel, CustomProviderFactory, ModelProvider, ModelRequest, ModelResponse,
    ProviderError, ProviderFuture, ProviderId, SecureCredentialManager,
};

use super::auth::resolve_openai_auth;
use super::transport::{OpenAiHttpTransport, OpenAiTransport};
use super::types::{OpenAiMessage, OpenAiRequest, OpenAiTool};

/// Client for the OpenAI chat-completions wire format.
///
/// The same type serves OpenAI itself and any compatible endpoint; `id` decides which
/// stored credential is used and how responses are labelled.
#[derive(Clone)]
pub struct OpenAiProvider {
    id: ProviderId,
    credentials: Arc<SecureCredentialManager>,
    transport: Arc<dyn OpenAiTransport>,
}

impl OpenAiProvider {
    pub fn new(
        credentials: Arc<SecureCredentialManager>,
        transport: Arc<dyn OpenAiTransport>,
    ) -> Self {
        Self {
            id: ProviderId::OpenAi,
            credentials,
            transport,
        }
    }

    pub fn with_provider_id(mut self, id: ProviderId) -> Self {
        self.id = id;
        self
    }

    /// Builds a provider bound to a custom model's endpoint and key.
    pub fn for_custom_model(client: Client, model: &CustomModel) -> Result<Self, ProviderError> {
        let credentials = SecureCredentialManager::new();
        credentials.set_api_key(ProviderId::Custom, model.api_key.expose())?;
        let transport = OpenAiHttpTransport::new(client).with_base_url(model.base_url.clone());

        Ok(Self::new(Arc::new(credentials), Arc::new(transport))
            .with_provider_id(ProviderId::Custom))
    }

    pub(crate) fn build_openai_request(&self, request: ModelRequest) -> OpenAiRequest {
        let messages = request
            .messages
            .into_iter()
            .map(OpenAiMessage::from)
            .collect::<Vec<_>>();
        let tools = request.tools.into_iter().map(OpenAiTool::from).collect::<Vec<_>>();

        OpenAiRequest {
            model: request.model,
            messages,
            tools,
            temperature: request.options.temperature,
            max_tokens: request.options.max_tokens,
        }
    }
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("id", &self.id)
            .field("transport", &self.transport)
            .finish()
    }
}

impl ModelProvider for OpenAiProvider {
    fn id(&self) -> ProviderId {
        self.id
    }

    fn complete<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<ModelResponse, ProviderError>> {
        Box::pin(async move {
            request.validate()?;
            let auth = resolve_openai_auth(&self.credentials, self.id)?;
            let openai_request = self.build_openai_request(request);
            let response = self.transport.complete(openai_request, auth).await?;
            Ok(response.into_model_response(self.id))
        })
    }
}

/// Factory used by `ChatClientProxy` for custom models.
pub fn custom_model_factory(client: Client) -> Arc<CustomProviderFactory> {
    Arc::new(move |model: &CustomModel| {
        let provider = OpenAiProvider::for_custom_model(client.clone(), model)?;
        Ok(Arc::new(provider) as Arc<dyn ModelProvider>)
    })
}
