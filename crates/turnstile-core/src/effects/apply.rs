//! Authorization application effects.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Application failure.
#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize)]
pub enum ApplyError {
    /// The response could not be applied to the document.
    #[error("failed to apply authorization response: {reason}")]
    Failed {
        /// What went wrong during application
        reason: String,
    },
}

/// Applies an authorization response to the document.
///
/// The attribute contract: each gated region carries a boolean visibility
/// expression evaluated against the response tree (see
/// [`crate::expr`]); regions marked for templating re-render before their
/// hide marker is toggled, then the hide marker is removed when the
/// expression is true and set when it is false. The DOM mutation itself is
/// the handler's concern; the engine awaits completion before a run counts
/// as settled.
#[async_trait]
pub trait ApplyEffects: Send + Sync {
    /// Apply a freshly received authorization response to the document.
    async fn apply(&self, authdata: &Value) -> Result<(), ApplyError>;
}
