//! Observability hooks for completion attempts, tool calls, and turn phases.
//!
//! ```rust
//! use fobserve::{MetricsObservabilityHooks, SafeProviderHooks, SafeTurnHooks, TracingObservabilityHooks};
//!
//! let _provider_hooks = SafeProviderHooks::new(TracingObservabilityHooks);
//! let _turn_hooks = SafeTurnHooks::new(MetricsObservabilityHooks);
//! ```

mod metrics_hooks;
mod safe_hooks;
mod tracing_hooks;

pub use metrics_hooks::MetricsObservabilityHooks;
pub use safe_hooks::{SafeProviderHooks, SafeToolHooks, SafeTurnHooks};
pub use tracing_hooks::TracingObservabilityHooks;

pub mod prelude {
    pub use crate::{
        MetricsObservabilityHooks, SafeProviderHooks, SafeToolHooks, SafeTurnHooks,
        TracingObservabilityHooks,
    };
}

#[cfg(test)]
mod tests;
