//! Counters and histograms for completion attempts, tool calls, and turn phases.
//!
//! ```rust
//! use fobserve::MetricsObservabilityHooks;
//! use ftooling::ToolRuntimeHooks;
//!
//! fn accepts_tool_hooks(_hooks: &dyn ToolRuntimeHooks) {}
//!
//! let hooks = MetricsObservabilityHooks;
//! accepts_tool_hooks(&hooks);
//! ```

use std::time::Duration;

use fchat::{ChatError, ChatTurnHooks, TurnPhase};
use fcommon::TraceId;
use fprovider::{ProviderError, ProviderId, ProviderOperationHooks, ToolCall};
use fschema::SourceFailure;
use ftooling::{CallTarget, ToolError, ToolExecutionContext, ToolExecutionResult, ToolRuntimeHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObservabilityHooks;

fn target_label(target: CallTarget) -> &'static str {
    match target {
        CallTarget::Local => "local",
        CallTarget::Remote => "remote",
    }
}

impl ProviderOperationHooks for MetricsObservabilityHooks {
    fn on_attempt_start(&self, provider: ProviderId, operation: &str, _attempt: u32) {
        metrics::counter!(
            "toolrelay_completion_attempt_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .increment(1);
    }

    fn on_retry_scheduled(
        &self,
        provider: ProviderId,
        operation: &str,
        _attempt: u32,
        delay: Duration,
        error: &ProviderError,
    ) {
        metrics::counter!(
            "toolrelay_completion_retry_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "toolrelay_completion_retry_delay_seconds",
            "provider" => provider.to_string()
        )
        .record(delay.as_secs_f64());
    }

    fn on_success(&self, provider: ProviderId, operation: &str, attempts: u32) {
        metrics::histogram!(
            "toolrelay_completion_attempts",
            "provider" => provider.to_string(),
            "operation" => operation.to_string(),
            "status" => "success"
        )
        .record(attempts as f64);
    }

    fn on_failure(
        &self,
        provider: ProviderId,
        operation: &str,
        attempts: u32,
        error: &ProviderError,
    ) {
        metrics::counter!(
            "toolrelay_completion_failure_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "toolrelay_completion_attempts",
            "provider" => provider.to_string(),
            "operation" => operation.to_string(),
            "status" => "failure"
        )
        .record(attempts as f64);
    }
}

impl ToolRuntimeHooks for MetricsObservabilityHooks {
    fn on_execution_start(
        &self,
        _tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        target: CallTarget,
    ) {
        metrics::counter!("toolrelay_tool_call_total", "target" => target_label(target))
            .increment(1);
    }

    fn on_execution_success(
        &self,
        _tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        result: &ToolExecutionResult,
        elapsed: Duration,
    ) {
        let outcome = if result.is_folded_error() {
            "folded_error"
        } else {
            "success"
        };

        metrics::histogram!(
            "toolrelay_tool_call_duration_seconds",
            "target" => target_label(result.target),
            "status" => outcome
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_execution_failure(
        &self,
        _tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "toolrelay_tool_call_failure_total",
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "toolrelay_tool_call_duration_seconds",
            "target" => "unresolved",
            "status" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }
}

impl ChatTurnHooks for MetricsObservabilityHooks {
    fn on_phase_start(&self, phase: TurnPhase, _trace_id: Option<&TraceId>) {
        metrics::counter!("toolrelay_turn_phase_start_total", "phase" => phase.as_str())
            .increment(1);
    }

    fn on_phase_success(&self, phase: TurnPhase, _trace_id: Option<&TraceId>, elapsed: Duration) {
        metrics::histogram!(
            "toolrelay_turn_phase_duration_seconds",
            "phase" => phase.as_str(),
            "status" => "success"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_phase_failure(
        &self,
        phase: TurnPhase,
        _trace_id: Option<&TraceId>,
        error: &ChatError,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "toolrelay_turn_phase_failure_total",
            "phase" => phase.as_str(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "toolrelay_turn_phase_duration_seconds",
            "phase" => phase.as_str(),
            "status" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_schema_failure(&self, _trace_id: Option<&TraceId>, failure: &SourceFailure) {
        metrics::counter!(
            "toolrelay_schema_skipped_total",
            "error_kind" => format!("{:?}", failure.error.kind)
        )
        .increment(1);
    }
}
