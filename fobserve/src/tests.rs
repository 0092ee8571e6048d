use std::sync::{Arc, Mutex};
use std::time::Duration;

use fchat::{ChatError, ChatTurnHooks, TurnPhase};
use fcommon::TraceId;
use fprovider::{ProviderError, ProviderId, ProviderOperationHooks, ToolCall};
use fschema::{SchemaError, SourceFailure};
use ftooling::{
    CallTarget, ToolError, ToolExecutionContext, ToolExecutionResult, ToolRuntimeHooks,
};
use serde_json::json;

use crate::{
    MetricsObservabilityHooks, SafeProviderHooks, SafeToolHooks, SafeTurnHooks,
    TracingObservabilityHooks,
};

fn sample_tool_call() -> ToolCall {
    ToolCall {
        id: "call-1".to_string(),
        name: "getPet".to_string(),
        arguments: "{}".to_string(),
    }
}

fn sample_tool_context() -> ToolExecutionContext {
    ToolExecutionContext::new().with_trace_id("trace-1")
}

fn remote_result(payload: serde_json::Value) -> ToolExecutionResult {
    ToolExecutionResult::new(&sample_tool_call(), &payload, CallTarget::Remote)
}

fn sample_failure() -> SourceFailure {
    SourceFailure {
        index: 0,
        name: Some("broken".to_string()),
        error: SchemaError::missing_field("info.title"),
    }
}

fn exercise_provider_hooks(hooks: &dyn ProviderOperationHooks) {
    let provider_error = ProviderError::timeout("provider timeout");

    hooks.on_attempt_start(ProviderId::OpenAi, "planning", 1);
    hooks.on_retry_scheduled(
        ProviderId::OpenAi,
        "planning",
        1,
        Duration::from_millis(10),
        &provider_error,
    );
    hooks.on_success(ProviderId::OpenAi, "planning", 2);
    hooks.on_failure(ProviderId::Custom, "finalizing", 2, &provider_error);
}

fn exercise_tool_hooks(hooks: &dyn ToolRuntimeHooks) {
    let tool_error = ToolError::missing_parameter("id", "getPet");

    hooks.on_execution_start(&sample_tool_call(), &sample_tool_context(), CallTarget::Remote);
    hooks.on_execution_success(
        &sample_tool_call(),
        &sample_tool_context(),
        &remote_result(json!({"id": "42"})).with_status(200),
        Duration::from_millis(20),
    );
    hooks.on_execution_success(
        &sample_tool_call(),
        &sample_tool_context(),
        &remote_result(json!({"error": "Not Found"})).with_status(404),
        Duration::from_millis(20),
    );
    hooks.on_execution_failure(
        &sample_tool_call(),
        &sample_tool_context(),
        &tool_error,
        Duration::from_millis(20),
    );
}

fn exercise_turn_hooks(hooks: &dyn ChatTurnHooks) {
    let trace_id = TraceId::new("trace-1");
    let chat_error = ChatError::tooling("Function launch not found in any schema")
        .with_phase(TurnPhase::Calling);

    hooks.on_phase_start(TurnPhase::Planning, Some(&trace_id));
    hooks.on_phase_success(TurnPhase::Planning, Some(&trace_id), Duration::from_millis(30));
    hooks.on_phase_failure(
        TurnPhase::Calling,
        None,
        &chat_error,
        Duration::from_millis(30),
    );
    hooks.on_schema_failure(Some(&trace_id), &sample_failure());
}

#[test]
fn tracing_hooks_smoke_test_all_callbacks() {
    let hooks = TracingObservabilityHooks;

    exercise_provider_hooks(&hooks);
    exercise_tool_hooks(&hooks);
    exercise_turn_hooks(&hooks);
}

#[test]
fn metrics_hooks_smoke_test_all_callbacks() {
    let hooks = MetricsObservabilityHooks;

    exercise_provider_hooks(&hooks);
    exercise_tool_hooks(&hooks);
    exercise_turn_hooks(&hooks);
}

#[derive(Default, Clone)]
struct RecordingHooks {
    events: Arc<Mutex<Vec<String>>>,
}

impl RecordingHooks {
    fn push(&self, event: impl Into<String>) {
        self.events.lock().expect("events lock").push(event.into());
    }

    fn events(&self) -> Vec<String> {
        self.events.lock().expect("events lock").clone()
    }
}

impl ProviderOperationHooks for RecordingHooks {
    fn on_attempt_start(&self, _provider: ProviderId, operation: &str, _attempt: u32) {
        self.push(format!("attempt:{operation}"));
    }

    fn on_retry_scheduled(
        &self,
        _provider: ProviderId,
        _operation: &str,
        _attempt: u32,
        _delay: Duration,
        _error: &ProviderError,
    ) {
        self.push("retry");
    }

    fn on_success(&self, _provider: ProviderId, _operation: &str, _attempts: u32) {
        self.push("success");
    }

    fn on_failure(
        &self,
        provider: ProviderId,
        _operation: &str,
        _attempts: u32,
        _error: &ProviderError,
    ) {
        self.push(format!("failure:{provider}"));
    }
}

impl ToolRuntimeHooks for RecordingHooks {
    fn on_execution_start(
        &self,
        _tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        target: CallTarget,
    ) {
        self.push(format!("start:{target:?}"));
    }

    fn on_execution_success(
        &self,
        _tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        result: &ToolExecutionResult,
        _elapsed: Duration,
    ) {
        self.push(format!("success:{}", result.is_folded_error()));
    }

    fn on_execution_failure(
        &self,
        _tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        error: &ToolError,
        _elapsed: Duration,
    ) {
        self.push(format!("failure:{:?}", error.kind));
    }
}

impl ChatTurnHooks for RecordingHooks {
    fn on_phase_start(&self, phase: TurnPhase, _trace_id: Option<&TraceId>) {
        self.push(format!("start:{}", phase.as_str()));
    }

    fn on_phase_success(&self, phase: TurnPhase, _trace_id: Option<&TraceId>, _elapsed: Duration) {
        self.push(format!("success:{}", phase.as_str()));
    }

    fn on_phase_failure(
        &self,
        phase: TurnPhase,
        _trace_id: Option<&TraceId>,
        _error: &ChatError,
        _elapsed: Duration,
    ) {
        self.push(format!("failure:{}", phase.as_str()));
    }

    fn on_schema_failure(&self, _trace_id: Option<&TraceId>, failure: &SourceFailure) {
        self.push(format!("schema:{}", failure.index));
    }
}

struct PanicHooks;

impl ProviderOperationHooks for PanicHooks {
    fn on_attempt_start(&self, _provider: ProviderId, _operation: &str, _attempt: u32) {
        panic!("attempt_start panic");
    }

    fn on_failure(
        &self,
        _provider: ProviderId,
        _operation: &str,
        _attempts: u32,
        _error: &ProviderError,
    ) {
        panic!("failure panic");
    }
}

impl ToolRuntimeHooks for PanicHooks {
    fn on_execution_start(
        &self,
        _tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        _target: CallTarget,
    ) {
        panic!("start panic");
    }

    fn on_execution_failure(
        &self,
        _tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        _error: &ToolError,
        _elapsed: Duration,
    ) {
        panic!("failure panic");
    }
}

impl ChatTurnHooks for PanicHooks {
    fn on_phase_start(&self, _phase: TurnPhase, _trace_id: Option<&TraceId>) {
        panic!("start panic");
    }

    fn on_schema_failure(&self, _trace_id: Option<&TraceId>, _failure: &SourceFailure) {
        panic!("schema panic");
    }
}

#[test]
fn safe_hooks_delegate_when_inner_succeeds() {
    let inner = RecordingHooks::default();

    exercise_provider_hooks(&SafeProviderHooks::new(inner.clone()));
    assert_eq!(
        inner.events(),
        vec!["attempt:planning", "retry", "success", "failure:custom"]
    );

    let inner = RecordingHooks::default();
    exercise_tool_hooks(&SafeToolHooks::new(inner.clone()));
    assert_eq!(
        inner.events(),
        vec![
            "start:Remote",
            "success:false",
            "success:true",
            "failure:MissingParameter"
        ]
    );

    let inner = RecordingHooks::default();
    exercise_turn_hooks(&SafeTurnHooks::new(inner.clone()));
    assert_eq!(
        inner.events(),
        vec![
            "start:planning",
            "success:planning",
            "failure:calling",
            "schema:0"
        ]
    );
}

#[test]
fn safe_hooks_swallow_panics() {
    exercise_provider_hooks(&SafeProviderHooks::new(PanicHooks));
    exercise_tool_hooks(&SafeToolHooks::new(PanicHooks));
    exercise_turn_hooks(&SafeTurnHooks::new(PanicHooks));
}
