//! Recording instrumentation sink.

use parking_lot::Mutex;
use turnstile_core::effects::{AccessEvent, InstrumentationEffects};

/// Instrumentation handler that records everything for assertions.
#[derive(Default)]
pub struct RecordingInstrumentation {
    events: Mutex<Vec<AccessEvent>>,
    error_state: Mutex<Option<bool>>,
}

impl RecordingInstrumentation {
    /// Fresh, empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every event reported so far, in order.
    pub fn events(&self) -> Vec<AccessEvent> {
        self.events.lock().clone()
    }

    /// Stable names of every event reported so far, in order.
    pub fn event_names(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(AccessEvent::name).collect()
    }

    /// Last error-indicator toggle, if any.
    pub fn error_state(&self) -> Option<bool> {
        *self.error_state.lock()
    }
}

impl InstrumentationEffects for RecordingInstrumentation {
    fn access_event(&self, event: AccessEvent) {
        self.events.lock().push(event);
    }

    fn toggle_error_state(&self, on: bool) {
        *self.error_state.lock() = Some(on);
    }
}
