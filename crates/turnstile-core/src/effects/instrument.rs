//! Instrumentation effects.
//!
//! Analytics transport is out of engine scope; the engine only emits typed
//! events at well-defined points and toggles a visible error indicator.

use serde::{Deserialize, Serialize};

/// Instrumentation event emitted by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessEvent {
    /// An authorization response (fetched or fallback) was applied.
    AuthorizationReceived,
    /// An authorization run settled in failure.
    AuthorizationFailed,
    /// The current session qualified as a view.
    Viewed,
    /// A view report was delivered.
    PingbackSent,
    /// A view report failed to deliver.
    PingbackFailed,
    /// A login dialog was launched.
    LoginStarted {
        /// Login variant name
        variant: String,
    },
    /// The login dialog reported success.
    LoginSuccess {
        /// Login variant name
        variant: String,
    },
    /// The login dialog reported explicit rejection.
    LoginRejected {
        /// Login variant name
        variant: String,
    },
    /// The login dialog failed or was dismissed.
    LoginFailed {
        /// Login variant name
        variant: String,
    },
}

impl AccessEvent {
    /// Stable event name for analytics pipelines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AuthorizationReceived => "access-authorization-received",
            Self::AuthorizationFailed => "access-authorization-failed",
            Self::Viewed => "access-viewed",
            Self::PingbackSent => "access-pingback-sent",
            Self::PingbackFailed => "access-pingback-failed",
            Self::LoginStarted { .. } => "access-login-started",
            Self::LoginSuccess { .. } => "access-login-success",
            Self::LoginRejected { .. } => "access-login-rejected",
            Self::LoginFailed { .. } => "access-login-failed",
        }
    }
}

/// Instrumentation sink.
///
/// Both operations are fire-and-forget; handlers must not block.
pub trait InstrumentationEffects: Send + Sync {
    /// Report an engine event.
    fn access_event(&self, event: AccessEvent);

    /// Toggle the document's visible error indicator.
    fn toggle_error_state(&self, on: bool);
}
