use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use fchat::{ChatError, ChatTurnHooks, TurnPhase};
use fcommon::TraceId;
use fprovider::{ProviderError, ProviderId, ProviderOperationHooks, ToolCall};
use fschema::SourceFailure;
use ftooling::{CallTarget, ToolError, ToolExecutionContext, ToolExecutionResult, ToolRuntimeHooks};

/// Swallows panics raised by the wrapped provider hooks.
pub struct SafeProviderHooks<H> {
    inner: H,
}

impl<H> SafeProviderHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ProviderOperationHooks for SafeProviderHooks<H>
where
    H: ProviderOperationHooks,
{
    fn on_attempt_start(&self, provider: ProviderId, operation: &str, attempt: u32) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_attempt_start(provider, operation, attempt)
        }));
    }

    fn on_retry_scheduled(
        &self,
        provider: ProviderId,
        operation: &str,
        attempt: u32,
        delay: Duration,
        error: &ProviderError,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_retry_scheduled(provider, operation, attempt, delay, error)
        }));
    }

    fn on_success(&self, provider: ProviderId, operation: &str, attempts: u32) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_success(provider, operation, attempts)
        }));
    }

    fn on_failure(
        &self,
        provider: ProviderId,
        operation: &str,
        attempts: u32,
        error: &ProviderError,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_failure(provider, operation, attempts, error)
        }));
    }
}

pub struct SafeToolHooks<H> {
    inner: H,
}

impl<H> SafeToolHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ToolRuntimeHooks for SafeToolHooks<H>
where
    H: ToolRuntimeHooks,
{
    fn on_execution_start(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        target: CallTarget,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_execution_start(tool_call, context, target)
        }));
    }

    fn on_execution_success(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        result: &ToolExecutionResult,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_execution_success(tool_call, context, result, elapsed)
        }));
    }

    fn on_execution_failure(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_execution_failure(tool_call, context, error, elapsed)
        }));
    }
}

pub struct SafeTurnHooks<H> {
    inner: H,
}

impl<H> SafeTurnHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ChatTurnHooks for SafeTurnHooks<H>
where
    H: ChatTurnHooks,
{
    fn on_phase_start(&self, phase: TurnPhase, trace_id: Option<&TraceId>) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_phase_start(phase, trace_id)
        }));
    }

    fn on_phase_success(&self, phase: TurnPhase, trace_id: Option<&TraceId>, elapsed: Duration) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_phase_success(phase, trace_id, elapsed)
        }));
    }

    fn on_phase_failure(
        &self,
        phase: TurnPhase,
        trace_id: Option<&TraceId>,
        error: &ChatError,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_phase_failure(phase, trace_id, error, elapsed)
        }));
    }

    fn on_schema_failure(&self, trace_id: Option<&TraceId>, failure: &SourceFailure) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_schema_failure(trace_id, failure)
        }));
    }
}
