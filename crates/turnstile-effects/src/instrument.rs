//! Tracing-backed instrumentation handler.

use turnstile_core::effects::{AccessEvent, InstrumentationEffects};

/// Instrumentation sink that forwards engine events to `tracing`.
///
/// Embedders with a real analytics pipeline supply their own handler; this
/// one keeps the events observable in logs.
#[derive(Debug, Clone, Default)]
pub struct TracingInstrumentation;

impl TracingInstrumentation {
    /// Create a new tracing instrumentation handler.
    pub fn new() -> Self {
        Self
    }
}

impl InstrumentationEffects for TracingInstrumentation {
    fn access_event(&self, event: AccessEvent) {
        tracing::info!(event = event.name(), "access event");
    }

    fn toggle_error_state(&self, on: bool) {
        if on {
            tracing::warn!("access error indicator set");
        } else {
            tracing::debug!("access error indicator cleared");
        }
    }
}
