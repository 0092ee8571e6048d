//! Runtime wiring helpers for the dispatcher.

use std::sync::Arc;

use crate::{
    ChatClientProxy, ChatPolicy, ChatService, ChatServiceBuilder, HttpToolTransport,
    ModelProvider, RemoteToolTransport, SafeProviderHooks, SafeToolHooks, SafeTurnHooks,
    ToolRecord, ToolRegistry, TracingObservabilityHooks,
};
use ftooling::platform::{platform_registry, platform_schema};

/// Record selecting the built-in local tools for a turn.
pub fn platform_tool_record() -> ToolRecord {
    ToolRecord::new(platform_schema().to_string()).with_name("platform")
}

pub fn platform_tools() -> Arc<ToolRegistry> {
    Arc::new(platform_registry())
}

/// Attaches panic-safe tracing hooks for completions, tool calls, and turn phases.
pub fn observed(builder: ChatServiceBuilder) -> ChatServiceBuilder {
    builder
        .provider_hooks(Arc::new(SafeProviderHooks::new(TracingObservabilityHooks)))
        .tool_hooks(Arc::new(SafeToolHooks::new(TracingObservabilityHooks)))
        .turn_hooks(Arc::new(SafeTurnHooks::new(TracingObservabilityHooks)))
}

#[derive(Clone)]
pub struct DispatcherParts {
    pub proxy: Option<ChatClientProxy>,
    pub transport: Arc<dyn RemoteToolTransport>,
    pub local_tools: Arc<ToolRegistry>,
    pub policy: ChatPolicy,
    pub observe: bool,
}

impl Default for DispatcherParts {
    fn default() -> Self {
        Self {
            proxy: None,
            transport: Arc::new(HttpToolTransport::default()),
            local_tools: platform_tools(),
            policy: ChatPolicy::default(),
            observe: true,
        }
    }
}

impl DispatcherParts {
    pub fn with_proxy(mut self, proxy: ChatClientProxy) -> Self {
        self.proxy = Some(proxy);
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn RemoteToolTransport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_local_tools(mut self, local_tools: Arc<ToolRegistry>) -> Self {
        self.local_tools = local_tools;
        self
    }

    pub fn with_policy(mut self, policy: ChatPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn without_observability(mut self) -> Self {
        self.observe = false;
        self
    }
}

/// Dispatcher with the platform tools, default HTTP transport, and tracing hooks.
pub fn chat_service(planner: Arc<dyn ModelProvider>) -> ChatService {
    build_dispatcher_with(planner, DispatcherParts::default())
}

pub fn build_dispatcher_with(planner: Arc<dyn ModelProvider>, parts: DispatcherParts) -> ChatService {
    let mut builder = ChatService::builder(planner)
        .transport(parts.transport)
        .local_tools(parts.local_tools)
        .policy(parts.policy);

    if let Some(proxy) = parts.proxy {
        builder = builder.proxy(proxy);
    }

    if parts.observe {
        builder = observed(builder);
    }

    builder.build()
}
