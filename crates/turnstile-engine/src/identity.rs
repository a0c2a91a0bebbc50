//! Memoized reader identity.

use std::sync::Arc;
use tokio::sync::OnceCell;
use turnstile_core::effects::IdentityEffects;
use turnstile_core::{AccessError, Result};

/// Lazily resolved, memoized reader identifier.
///
/// The identity effect is consulted at most once; every URL-building call
/// site shares the same resolution. A failed resolution is not cached, so a
/// later call may retry.
pub struct ReaderIdentity {
    identity: Arc<dyn IdentityEffects>,
    cached: OnceCell<String>,
}

impl ReaderIdentity {
    /// Wrap an identity effect handler.
    pub fn new(identity: Arc<dyn IdentityEffects>) -> Self {
        Self {
            identity,
            cached: OnceCell::new(),
        }
    }

    /// Resolve the reader identifier, memoizing the first success.
    pub async fn resolve(&self) -> Result<String> {
        self.cached
            .get_or_try_init(|| async {
                self.identity
                    .reader_id()
                    .await
                    .map_err(|err| AccessError::authorization(err.to_string()))
            })
            .await
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use turnstile_core::effects::IdentityError;

    struct CountingIdentity {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl IdentityEffects for CountingIdentity {
        async fn reader_id(&self) -> std::result::Result<String, IdentityError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("reader-1".to_string())
        }
    }

    #[tokio::test]
    async fn resolution_is_memoized() {
        let handler = Arc::new(CountingIdentity {
            calls: AtomicUsize::new(0),
        });
        let identity = ReaderIdentity::new(handler.clone());
        assert_eq!(identity.resolve().await.unwrap(), "reader-1");
        assert_eq!(identity.resolve().await.unwrap(), "reader-1");
        assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
    }
}
