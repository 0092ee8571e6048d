//! Tracing events for completion attempts, tool calls, and turn phases.
//!
//! ```rust
//! use fchat::ChatTurnHooks;
//! use fobserve::TracingObservabilityHooks;
//!
//! fn accepts_turn_hooks(_hooks: &dyn ChatTurnHooks) {}
//!
//! let hooks = TracingObservabilityHooks;
//! accepts_turn_hooks(&hooks);
//! ```

use std::time::Duration;

use fchat::{ChatError, ChatTurnHooks, TurnPhase};
use fcommon::TraceId;
use fprovider::{ProviderError, ProviderId, ProviderOperationHooks, ToolCall};
use fschema::SourceFailure;
use ftooling::{CallTarget, ToolError, ToolExecutionContext, ToolExecutionResult, ToolRuntimeHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservabilityHooks;

impl ProviderOperationHooks for TracingObservabilityHooks {
    fn on_attempt_start(&self, provider: ProviderId, operation: &str, attempt: u32) {
        tracing::debug!(
            phase = "provider",
            event = "attempt_start",
            provider = %provider,
            operation,
            attempt
        );
    }

    fn on_retry_scheduled(
        &self,
        provider: ProviderId,
        operation: &str,
        attempt: u32,
        delay: Duration,
        error: &ProviderError,
    ) {
        tracing::warn!(
            phase = "provider",
            event = "retry_scheduled",
            provider = %provider,
            operation,
            attempt,
            delay_ms = delay.as_millis() as u64,
            error_kind = ?error.kind,
            status = error.status,
            error = %error
        );
    }

    fn on_success(&self, provider: ProviderId, operation: &str, attempts: u32) {
        tracing::info!(
            phase = "provider",
            event = "success",
            provider = %provider,
            operation,
            attempts
        );
    }

    fn on_failure(
        &self,
        provider: ProviderId,
        operation: &str,
        attempts: u32,
        error: &ProviderError,
    ) {
        tracing::error!(
            phase = "provider",
            event = "failure",
            provider = %provider,
            operation,
            attempts,
            error_kind = ?error.kind,
            status = error.status,
            error = %error
        );
    }
}

impl ToolRuntimeHooks for TracingObservabilityHooks {
    fn on_execution_start(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        target: CallTarget,
    ) {
        tracing::info!(
            phase = "tool",
            event = "execution_start",
            tool_name = tool_call.name,
            tool_call_id = tool_call.id,
            target = ?target,
            trace_id = context.trace_id.as_ref().map(|id| id.as_str())
        );
    }

    fn on_execution_success(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        result: &ToolExecutionResult,
        elapsed: Duration,
    ) {
        if result.is_folded_error() {
            tracing::warn!(
                phase = "tool",
                event = "remote_error_folded",
                tool_name = tool_call.name,
                tool_call_id = tool_call.id,
                status = result.status,
                trace_id = context.trace_id.as_ref().map(|id| id.as_str()),
                elapsed_ms = elapsed.as_millis() as u64
            );
            return;
        }

        tracing::info!(
            phase = "tool",
            event = "execution_success",
            tool_name = tool_call.name,
            tool_call_id = tool_call.id,
            target = ?result.target,
            status = result.status,
            trace_id = context.trace_id.as_ref().map(|id| id.as_str()),
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_execution_failure(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        tracing::error!(
            phase = "tool",
            event = "execution_failure",
            tool_name = tool_call.name,
            tool_call_id = tool_call.id,
            trace_id = context.trace_id.as_ref().map(|id| id.as_str()),
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = ?error.kind,
            error = %error
        );
    }
}

impl ChatTurnHooks for TracingObservabilityHooks {
    fn on_phase_start(&self, phase: TurnPhase, trace_id: Option<&TraceId>) {
        tracing::info!(
            phase = "turn",
            event = "phase_start",
            turn_phase = phase.as_str(),
            trace_id = trace_id.map(TraceId::as_str)
        );
    }

    fn on_phase_success(&self, phase: TurnPhase, trace_id: Option<&TraceId>, elapsed: Duration) {
        tracing::info!(
            phase = "turn",
            event = "phase_success",
            turn_phase = phase.as_str(),
            trace_id = trace_id.map(TraceId::as_str),
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_phase_failure(
        &self,
        phase: TurnPhase,
        trace_id: Option<&TraceId>,
        error: &ChatError,
        elapsed: Duration,
    ) {
        tracing::error!(
            phase = "turn",
            event = "phase_failure",
            turn_phase = phase.as_str(),
            trace_id = trace_id.map(TraceId::as_str),
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = ?error.kind,
            status = error.status_code(),
            error = %error
        );
    }

    fn on_schema_failure(&self, trace_id: Option<&TraceId>, failure: &SourceFailure) {
        tracing::debug!(
            phase = "turn",
            event = "schema_skipped",
            trace_id = trace_id.map(TraceId::as_str),
            source_index = failure.index,
            error_kind = ?failure.error.kind
        );
    }
}
