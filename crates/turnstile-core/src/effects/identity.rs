//! Reader identity effects.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Reader identity resolution failure.
#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize)]
pub enum IdentityError {
    /// No reader identifier could be issued or recovered.
    #[error("reader identity unavailable: {reason}")]
    Unavailable {
        /// Why identity resolution failed
        reason: String,
    },
}

/// Stable per-reader identifier source.
///
/// Issuing and persisting the identifier (cookies, viewer integration) is
/// the handler's concern. The engine resolves it once and memoizes the
/// result for every URL-building call site.
#[async_trait]
pub trait IdentityEffects: Send + Sync {
    /// Resolve the stable reader identifier for this document's reader.
    async fn reader_id(&self) -> Result<String, IdentityError>;
}
