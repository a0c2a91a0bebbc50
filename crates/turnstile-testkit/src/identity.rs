//! Fixed reader identity handler.

use async_trait::async_trait;
use turnstile_core::effects::{IdentityEffects, IdentityError};

/// Identity handler that always resolves to the same reader id.
#[derive(Debug, Clone)]
pub struct FixedIdentity {
    reader_id: String,
}

impl FixedIdentity {
    /// Identity resolving to `reader_id`.
    pub fn new(reader_id: impl Into<String>) -> Self {
        Self {
            reader_id: reader_id.into(),
        }
    }
}

impl Default for FixedIdentity {
    fn default() -> Self {
        Self::new("reader-0000")
    }
}

#[async_trait]
impl IdentityEffects for FixedIdentity {
    async fn reader_id(&self) -> Result<String, IdentityError> {
        Ok(self.reader_id.clone())
    }
}
