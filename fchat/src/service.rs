//! Tool-calling turn orchestration: plan, call, finalize.

use std::sync::Arc;
use std::time::{Duration, Instant};

use fcommon::TraceId;
use fprovider::{
    ChatClientProxy, Message, ModelCatalog, ModelProvider, ModelRequest, ModelResponse,
    NoopOperationHooks, ProviderOperationHooks, ProviderRegistry, RetryPolicy, complete_with_retry,
};
use fschema::load_sources;
use ftooling::{
    DEFAULT_LOCAL_TIMEOUT, DispatchToolRuntime, HttpToolTransport, NoopToolRuntimeHooks,
    RemoteToolTransport, ToolCatalog, ToolExecutionContext, ToolRegistry, ToolRuntime,
    ToolRuntimeHooks,
};
use futures_timer::Delay;

use crate::{
    ChatError, ChatSettings, ChatTurnHooks, ChatTurnRequest, ChatTurnResult, DirectChatRequest,
    NoopChatTurnHooks, TurnOutcome, TurnPhase,
};

pub const DEFAULT_TOOL_MODEL: &str = "gpt-3.5-turbo";

#[derive(Debug, Clone, PartialEq)]
pub struct ChatPolicy {
    /// Planning model used when the caller's model is outside the canonical catalog.
    pub fallback_model: String,
    pub retry: RetryPolicy,
    pub local_timeout: Option<Duration>,
}

impl Default for ChatPolicy {
    fn default() -> Self {
        Self {
            fallback_model: DEFAULT_TOOL_MODEL.to_string(),
            retry: RetryPolicy::default(),
            local_timeout: Some(DEFAULT_LOCAL_TIMEOUT),
        }
    }
}

impl ChatPolicy {
    pub fn with_fallback_model(mut self, model: impl Into<String>) -> Self {
        self.fallback_model = model.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_local_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.local_timeout = timeout;
        self
    }
}

/// Runs one tool-calling turn per request.
///
/// The planner is the canonical completion client: it always receives the tool
/// declarations. The final answer goes through the proxy, which may route to a
/// different registered provider or a stored custom model.
#[derive(Clone)]
pub struct ChatService {
    planner: Arc<dyn ModelProvider>,
    catalog: ModelCatalog,
    proxy: ChatClientProxy,
    local_tools: Arc<ToolRegistry>,
    transport: Arc<dyn RemoteToolTransport>,
    policy: ChatPolicy,
    provider_hooks: Arc<dyn ProviderOperationHooks>,
    tool_hooks: Arc<dyn ToolRuntimeHooks>,
    turn_hooks: Arc<dyn ChatTurnHooks>,
}

impl ChatService {
    pub fn new(planner: Arc<dyn ModelProvider>) -> Self {
        Self::builder(planner).build()
    }

    pub fn builder(planner: Arc<dyn ModelProvider>) -> ChatServiceBuilder {
        ChatServiceBuilder::new(planner)
    }

    pub fn policy(&self) -> &ChatPolicy {
        &self.policy
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    pub fn local_tools(&self) -> &ToolRegistry {
        &self.local_tools
    }

    pub async fn run_turn(&self, request: ChatTurnRequest) -> Result<ChatTurnResult, ChatError> {
        validate_turn(&request.settings, &request.messages)?;

        let trace_id = request.trace_id.clone();
        let load = load_sources(&request.tools);
        for failure in &load.failures {
            tracing::warn!(
                source_index = failure.index,
                source_name = failure.name.as_deref().unwrap_or(""),
                error_kind = ?failure.error.kind,
                "skipping tool source: {}",
                failure.error.message
            );
            self.turn_hooks.on_schema_failure(trace_id.as_ref(), failure);
        }

        let selection = self
            .catalog
            .select_tool_model(&request.settings.model, &self.policy.fallback_model);
        let result_role = selection.result_role();

        let planning = ModelRequest::new(selection.model.clone(), request.messages.clone())
            .with_tools(load.tool_definitions());
        let planned = self
            .complete_phase(TurnPhase::Planning, trace_id.as_ref(), self.planner.as_ref(), planning)
            .await?;
        let mut usage = planned.usage;

        let tool_calls = planned.tool_calls();
        let content = planned.text();
        if tool_calls.is_empty() {
            return Ok(ChatTurnResult {
                outcome: TurnOutcome::Direct { content },
                transcript: request.messages,
                tool_results: Vec::new(),
                tool_model: selection.model,
                usage,
                schema_failures: load.failures,
                shadowed: load.shadowed,
            });
        }

        let mut transcript = request.messages;
        transcript.push(Message::assistant_tool_calls(content, tool_calls.clone()));

        let runtime = DispatchToolRuntime::new(
            Arc::new(ToolCatalog::new(load.sources)),
            Arc::clone(&self.local_tools),
            Arc::clone(&self.transport),
        )
        .with_hooks(Arc::clone(&self.tool_hooks))
        .with_local_timeout(self.policy.local_timeout);

        let mut context = ToolExecutionContext::new();
        context.trace_id = trace_id.clone();

        self.turn_hooks.on_phase_start(TurnPhase::Calling, trace_id.as_ref());
        let started_at = Instant::now();
        let mut tool_results = Vec::with_capacity(tool_calls.len());
        for call in tool_calls {
            let result = match runtime.execute(call, context.clone()).await {
                Ok(result) => result,
                Err(error) => {
                    let error = ChatError::from(error).with_phase(TurnPhase::Calling);
                    self.turn_hooks.on_phase_failure(
                        TurnPhase::Calling,
                        trace_id.as_ref(),
                        &error,
                        started_at.elapsed(),
                    );
                    return Err(error);
                }
            };

            transcript.push(result.clone().into_message(result_role));
            tool_results.push(result);
        }
        self.turn_hooks
            .on_phase_success(TurnPhase::Calling, trace_id.as_ref(), started_at.elapsed());

        let response = self
            .finalize(
                trace_id.as_ref(),
                request.provider,
                request.custom_model_id.as_deref(),
                &request.settings,
                transcript.clone(),
            )
            .await?;
        usage = usage.add(response.usage);

        Ok(ChatTurnResult {
            outcome: TurnOutcome::Final(response),
            transcript,
            tool_results,
            tool_model: selection.model,
            usage,
            schema_failures: load.failures,
            shadowed: load.shadowed,
        })
    }

    /// Sends one completion straight to the requested provider, without tools.
    pub async fn complete_direct(
        &self,
        request: DirectChatRequest,
    ) -> Result<ModelResponse, ChatError> {
        validate_turn(&request.settings, &request.messages)?;

        self.finalize(
            None,
            request.provider,
            request.custom_model_id.as_deref(),
            &request.settings,
            request.messages,
        )
        .await
    }

    async fn finalize(
        &self,
        trace_id: Option<&TraceId>,
        provider: fprovider::ProviderId,
        custom_model_id: Option<&str>,
        settings: &ChatSettings,
        messages: Vec<Message>,
    ) -> Result<ModelResponse, ChatError> {
        let client = match self.proxy.resolve(provider, custom_model_id).await {
            Ok(client) => client,
            Err(error) => {
                let error = ChatError::from(error)
                    .with_provider(provider)
                    .with_phase(TurnPhase::Finalizing);
                self.turn_hooks.on_phase_failure(
                    TurnPhase::Finalizing,
                    trace_id,
                    &error,
                    Duration::ZERO,
                );
                return Err(error);
            }
        };

        let model = self.catalog.model_for_provider(
            client.provider.id(),
            &settings.model,
            &self.policy.fallback_model,
        );
        let mut request = ModelRequest::new(client.model_for(&model), messages);
        if let Some(temperature) = settings.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max_tokens) = settings.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        self.complete_phase(TurnPhase::Finalizing, trace_id, client.provider.as_ref(), request)
            .await
    }

    async fn complete_phase(
        &self,
        phase: TurnPhase,
        trace_id: Option<&TraceId>,
        provider: &dyn ModelProvider,
        request: ModelRequest,
    ) -> Result<ModelResponse, ChatError> {
        self.turn_hooks.on_phase_start(phase, trace_id);
        let started_at = Instant::now();

        let outcome = match request.validate() {
            Ok(()) => {
                complete_with_retry(
                    provider,
                    phase.as_str(),
                    request,
                    &self.policy.retry,
                    self.provider_hooks.as_ref(),
                    Delay::new,
                )
                .await
            }
            Err(error) => Err(error),
        };

        match outcome {
            Ok(response) => {
                self.turn_hooks
                    .on_phase_success(phase, trace_id, started_at.elapsed());
                Ok(response)
            }
            Err(error) => {
                let error = ChatError::from(error)
                    .with_provider(provider.id())
                    .with_phase(phase);
                self.turn_hooks
                    .on_phase_failure(phase, trace_id, &error, started_at.elapsed());
                Err(error)
            }
        }
    }
}

fn validate_turn(settings: &ChatSettings, messages: &[Message]) -> Result<(), ChatError> {
    if settings.model.trim().is_empty() {
        return Err(ChatError::invalid_request("chatSettings.model must not be empty"));
    }

    if messages.is_empty() {
        return Err(ChatError::invalid_request("at least one message is required"));
    }

    if settings.max_tokens == Some(0) {
        return Err(ChatError::invalid_request(
            "chatSettings.maxTokens must be greater than zero",
        ));
    }

    if let Some(temperature) = settings.temperature
        && !(0.0..=2.0).contains(&temperature)
    {
        return Err(ChatError::invalid_request(
            "chatSettings.temperature must be in the inclusive range 0.0..=2.0",
        ));
    }

    Ok(())
}

pub struct ChatServiceBuilder {
    planner: Arc<dyn ModelProvider>,
    catalog: ModelCatalog,
    proxy: Option<ChatClientProxy>,
    local_tools: Arc<ToolRegistry>,
    transport: Arc<dyn RemoteToolTransport>,
    policy: ChatPolicy,
    provider_hooks: Arc<dyn ProviderOperationHooks>,
    tool_hooks: Arc<dyn ToolRuntimeHooks>,
    turn_hooks: Arc<dyn ChatTurnHooks>,
}

impl ChatServiceBuilder {
    pub fn new(planner: Arc<dyn ModelProvider>) -> Self {
        Self {
            planner,
            catalog: ModelCatalog::openai(),
            proxy: None,
            local_tools: Arc::new(ToolRegistry::new()),
            transport: Arc::new(HttpToolTransport::default()),
            policy: ChatPolicy::default(),
            provider_hooks: Arc::new(NoopOperationHooks),
            tool_hooks: Arc::new(NoopToolRuntimeHooks),
            turn_hooks: Arc::new(NoopChatTurnHooks),
        }
    }

    pub fn catalog(mut self, catalog: ModelCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Finalizing clients. Without one, only the planner is registered.
    pub fn proxy(mut self, proxy: ChatClientProxy) -> Self {
        self.proxy = Some(proxy);
        self
    }

    pub fn local_tools(mut self, local_tools: Arc<ToolRegistry>) -> Self {
        self.local_tools = local_tools;
        self
    }

    pub fn transport(mut self, transport: Arc<dyn RemoteToolTransport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn policy(mut self, policy: ChatPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn provider_hooks(mut self, hooks: Arc<dyn ProviderOperationHooks>) -> Self {
        self.provider_hooks = hooks;
        self
    }

    pub fn tool_hooks(mut self, hooks: Arc<dyn ToolRuntimeHooks>) -> Self {
        self.tool_hooks = hooks;
        self
    }

    pub fn turn_hooks(mut self, hooks: Arc<dyn ChatTurnHooks>) -> Self {
        self.turn_hooks = hooks;
        self
    }

    pub fn build(self) -> ChatService {
        let proxy = self.proxy.unwrap_or_else(|| {
            let mut providers = ProviderRegistry::new();
            providers.register_shared(Arc::clone(&self.planner));
            ChatClientProxy::new(providers)
        });

        ChatService {
            planner: self.planner,
            catalog: self.catalog,
            proxy,
            local_tools: self.local_tools,
            transport: self.transport,
            policy: self.policy,
            provider_hooks: self.provider_hooks,
            tool_hooks: self.tool_hooks,
            turn_hooks: self.turn_hooks,
        }
    }
}
