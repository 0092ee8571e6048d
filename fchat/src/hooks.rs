use std::time::Duration;

use fcommon::TraceId;
use fschema::SourceFailure;

use crate::{ChatError, TurnPhase};

/// Observes the phases of a tool-calling turn.
pub trait ChatTurnHooks: Send + Sync {
    fn on_phase_start(&self, _phase: TurnPhase, _trace_id: Option<&TraceId>) {}

    fn on_phase_success(&self, _phase: TurnPhase, _trace_id: Option<&TraceId>, _elapsed: Duration) {
    }

    fn on_phase_failure(
        &self,
        _phase: TurnPhase,
        _trace_id: Option<&TraceId>,
        _error: &ChatError,
        _elapsed: Duration,
    ) {
    }

    /// A tool record that could not be converted; the turn continues without it.
    fn on_schema_failure(&self, _trace_id: Option<&TraceId>, _failure: &SourceFailure) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopChatTurnHooks;

impl ChatTurnHooks for NoopChatTurnHooks {}
