//! Reauthorize broadcast wiring.
//!
//! Publishing half of the cross-document re-authorization channel. The
//! consuming half (a listener task that filters on origin and sender and
//! re-runs authorization) is wired up by the service.

use std::sync::Arc;
use turnstile_core::effects::{BroadcastEffects, BroadcastEnvelope, ReauthorizeMessage};
use turnstile_core::DocumentEnv;

/// Publishes reauthorize signals on behalf of one document.
pub struct ReauthorizeBroadcaster {
    bus: Arc<dyn BroadcastEffects>,
    env: DocumentEnv,
}

impl ReauthorizeBroadcaster {
    /// Attach a document to a viewer-session bus.
    pub fn new(bus: Arc<dyn BroadcastEffects>, env: DocumentEnv) -> Self {
        Self { bus, env }
    }

    /// Signal peer documents of this publisher to refresh authorization.
    ///
    /// Failures are logged and swallowed: a broadcast is advisory and must
    /// never fail the operation that triggered it.
    pub fn broadcast_reauthorize(&self) {
        let envelope = BroadcastEnvelope {
            sender: self.env.document_id,
            message: ReauthorizeMessage::new(self.env.origin.clone()),
        };
        if let Err(err) = self.bus.publish(envelope) {
            tracing::warn!(error = %err, "reauthorize broadcast failed");
        } else {
            tracing::debug!(origin = %self.env.origin, "reauthorize broadcast published");
        }
    }

    /// Whether an incoming envelope should trigger re-authorization here:
    /// published by another document, for this publisher origin.
    pub fn should_react_to(&self, envelope: &BroadcastEnvelope) -> bool {
        envelope.sender != self.env.document_id
            && envelope.message.matches_origin(&self.env.origin)
    }
}
