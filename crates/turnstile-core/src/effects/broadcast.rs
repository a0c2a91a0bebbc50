//! Viewer-session broadcast effects.
//!
//! Documents sharing a viewer session propagate re-authorization signals to
//! each other. The wire message is exactly `{"type":
//! "amp-access-reauthorize", "origin": <publisher origin>}`; the in-process
//! envelope additionally carries the sender's document id so a document can
//! ignore its own publications.

use crate::env::DocumentId;
use serde::{Deserialize, Serialize};

/// Wire value of the reauthorize message `type` field.
pub const REAUTHORIZE_MESSAGE_TYPE: &str = "amp-access-reauthorize";

/// Cross-document re-authorization signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReauthorizeMessage {
    /// Message type tag; always [`REAUTHORIZE_MESSAGE_TYPE`].
    #[serde(rename = "type")]
    pub kind: String,
    /// Publisher origin the signal is scoped to.
    pub origin: String,
}

impl ReauthorizeMessage {
    /// Build a reauthorize message for a publisher origin.
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            kind: REAUTHORIZE_MESSAGE_TYPE.to_string(),
            origin: origin.into(),
        }
    }

    /// Whether this is a well-formed reauthorize message for `origin`.
    pub fn matches_origin(&self, origin: &str) -> bool {
        self.kind == REAUTHORIZE_MESSAGE_TYPE && self.origin == origin
    }
}

/// Broadcast envelope as delivered within one viewer session.
#[derive(Debug, Clone)]
pub struct BroadcastEnvelope {
    /// Document that published the signal.
    pub sender: DocumentId,
    /// The wire message.
    pub message: ReauthorizeMessage,
}

/// Broadcast failure.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BroadcastError {
    /// The viewer-session channel is gone.
    #[error("broadcast channel closed")]
    Closed,
}

/// Viewer-session broadcast channel.
pub trait BroadcastEffects: Send + Sync {
    /// Publish a signal to every document in the session.
    fn publish(&self, envelope: BroadcastEnvelope) -> Result<(), BroadcastError>;

    /// Subscribe to signals published by any document in the session.
    fn subscribe(&self) -> tokio::sync::broadcast::Receiver<BroadcastEnvelope>;
}
