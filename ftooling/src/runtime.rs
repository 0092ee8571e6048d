//! Tool runtime trait and the catalog-backed dispatcher used for one turn.

use std::sync::Arc;
use std::time::{Duration, Instant};

use fprovider::ToolCall;
use futures_timer::Delay;
use futures_util::future::{Either, select};

use crate::{
    CallTarget, NoopToolRuntimeHooks, RemoteToolTransport, ResolvedCall, ToolCatalog, ToolError,
    ToolExecutionContext, ToolExecutionResult, ToolFuture, ToolRegistry, ToolRuntimeHooks, bind,
    parse_arguments,
};

pub const DEFAULT_LOCAL_TIMEOUT: Duration = Duration::from_secs(30);

pub trait ToolRuntime: Send + Sync {
    fn execute<'a>(
        &'a self,
        tool_call: ToolCall,
        context: ToolExecutionContext,
    ) -> ToolFuture<'a, Result<ToolExecutionResult, ToolError>>;
}

/// Resolves each call against the turn's catalog and runs it locally or remotely.
///
/// Returned errors are turn-fatal; remote failures come back as `{"error": ..}` content.
#[derive(Clone)]
pub struct DispatchToolRuntime {
    catalog: Arc<ToolCatalog>,
    local_tools: Arc<ToolRegistry>,
    transport: Arc<dyn RemoteToolTransport>,
    hooks: Arc<dyn ToolRuntimeHooks>,
    local_timeout: Option<Duration>,
}

impl DispatchToolRuntime {
    pub fn new(
        catalog: Arc<ToolCatalog>,
        local_tools: Arc<ToolRegistry>,
        transport: Arc<dyn RemoteToolTransport>,
    ) -> Self {
        Self {
            catalog,
            local_tools,
            transport,
            hooks: Arc::new(NoopToolRuntimeHooks),
            local_timeout: Some(DEFAULT_LOCAL_TIMEOUT),
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ToolRuntimeHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// `None` lets local tools run unbounded.
    pub fn with_local_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.local_timeout = timeout;
        self
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    async fn dispatch(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        started_at: Instant,
    ) -> Result<ToolExecutionResult, ToolError> {
        let resolved = self.catalog.resolve(&tool_call.name)?;
        let args = parse_arguments(&tool_call.arguments)?;

        match resolved {
            ResolvedCall::Local { .. } => {
                self.hooks
                    .on_execution_start(tool_call, context, CallTarget::Local);
                let tool = self.local_tools.get(&tool_call.name).ok_or_else(|| {
                    ToolError::not_found(format!("Function {} not found", tool_call.name))
                })?;

                let invocation = tool.invoke(args, context);
                let payload = match self.local_timeout {
                    Some(timeout) => match select(invocation, Delay::new(timeout)).await {
                        Either::Left((output, _)) => output?,
                        Either::Right(_) => {
                            return Err(ToolError::timeout(format!(
                                "local tool '{}' timed out after {}ms",
                                tool_call.name,
                                timeout.as_millis()
                            )));
                        }
                    },
                    None => invocation.await?,
                };

                let result = ToolExecutionResult::new(tool_call, &payload, CallTarget::Local);
                self.hooks
                    .on_execution_success(tool_call, context, &result, started_at.elapsed());
                Ok(result)
            }
            ResolvedCall::Remote { source, route } => {
                let request = bind(source, route, &args)?;
                self.hooks
                    .on_execution_start(tool_call, context, CallTarget::Remote);
                let response = self.transport.send(request).await;

                let mut result =
                    ToolExecutionResult::new(tool_call, &response.payload, CallTarget::Remote);
                if let Some(status) = response.status {
                    result = result.with_status(status);
                }
                self.hooks
                    .on_execution_success(tool_call, context, &result, started_at.elapsed());
                Ok(result)
            }
        }
    }
}

impl ToolRuntime for DispatchToolRuntime {
    fn execute<'a>(
        &'a self,
        tool_call: ToolCall,
        context: ToolExecutionContext,
    ) -> ToolFuture<'a, Result<ToolExecutionResult, ToolError>> {
        Box::pin(async move {
            let started_at = Instant::now();
            self.dispatch(&tool_call, &context, started_at)
                .await
                .map_err(|error| {
                    let error = error
                        .with_tool_name(tool_call.name.clone())
                        .with_tool_call_id(tool_call.id.clone());
                    self.hooks.on_execution_failure(
                        &tool_call,
                        &context,
                        &error,
                        started_at.elapsed(),
                    );
                    error
                })
        })
    }
}
