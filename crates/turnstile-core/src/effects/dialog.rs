//! Login dialog effects.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Login dialog failure.
#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize)]
pub enum DialogError {
    /// The dialog window could not be opened.
    #[error("login dialog could not be opened: {reason}")]
    Launch {
        /// Why the dialog failed to open
        reason: String,
    },
    /// The dialog closed without producing a return payload.
    #[error("login dialog closed without a result")]
    Dismissed,
}

/// Interactive login dialog collaborator.
///
/// Opening the dialog suspends until the dialog closes. The window/popup
/// mechanics are the handler's concern; the engine only consumes the
/// query-string-encoded return payload.
#[async_trait]
pub trait DialogEffects: Send + Sync {
    /// Open the login dialog at an expanded URL and wait for its return
    /// payload (a query string such as `success=true`).
    async fn open_login_dialog(&self, url: &str) -> Result<String, DialogError>;
}
