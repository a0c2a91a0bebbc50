//! Interactive login coordination.
//!
//! Launches the login dialog, deduplicates concurrent attempts, and on a
//! successful login triggers re-authorization (with fallback disabled) plus
//! an immediate view reschedule. The attempt itself runs on a spawned task,
//! so it completes even if every caller stops polling; callers share the
//! settled result through a cloneable future.

use crate::authorization::AuthorizationEngine;
use crate::broadcast::ReauthorizeBroadcaster;
use crate::service::AccessHandlers;
use crate::view::ViewScheduler;
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;
use turnstile_core::effects::AccessEvent;
use turnstile_core::{AccessError, Result};

/// A second login call within this window of a pending attempt's start
/// joins that attempt instead of opening another dialog.
pub const LOGIN_DEDUP_WINDOW_MS: u64 = 1000;

/// How the login dialog settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The dialog reported success (or reported no status at all).
    Accepted,
    /// The dialog explicitly reported rejection.
    Rejected,
}

type SharedLogin = Shared<BoxFuture<'static, Result<LoginOutcome>>>;

struct PendingLogin {
    attempt: u64,
    started_at_ms: u64,
    future: SharedLogin,
}

/// Runs and deduplicates interactive login attempts.
pub struct LoginCoordinator {
    handlers: Arc<AccessHandlers>,
    engine: Arc<AuthorizationEngine>,
    broadcaster: Arc<ReauthorizeBroadcaster>,
    view: Arc<ViewScheduler>,
    pending: Arc<Mutex<Option<PendingLogin>>>,
    next_attempt: AtomicU64,
}

impl LoginCoordinator {
    /// Build a coordinator for one document.
    pub fn new(
        handlers: Arc<AccessHandlers>,
        engine: Arc<AuthorizationEngine>,
        broadcaster: Arc<ReauthorizeBroadcaster>,
        view: Arc<ViewScheduler>,
    ) -> Self {
        Self {
            handlers,
            engine,
            broadcaster,
            view,
            pending: Arc::new(Mutex::new(None)),
            next_attempt: AtomicU64::new(0),
        }
    }

    /// Run the interactive login flow for a configured variant.
    ///
    /// Fails when the variant has no configured login URL. A call landing
    /// within [`LOGIN_DEDUP_WINDOW_MS`] of a pending attempt's start shares
    /// that attempt's result instead of opening a second dialog.
    pub async fn login(&self, variant: &str) -> Result<LoginOutcome> {
        let now = self.handlers.clock.now_ms().await;
        if let Some(pending) = self.pending_within_window(now) {
            tracing::debug!(variant, "joining pending login attempt");
            return pending.await;
        }

        let url = self.engine.login_url(variant).ok_or_else(|| {
            AccessError::login(format!("no login URL configured for variant `{variant}`"))
        })?;
        self.handlers.instrument.access_event(AccessEvent::LoginStarted {
            variant: variant.to_string(),
        });

        let attempt = self.next_attempt.fetch_add(1, Ordering::Relaxed);
        let future = self.spawn_attempt(attempt, variant.to_string(), url);
        *self.pending.lock() = Some(PendingLogin {
            attempt,
            started_at_ms: now,
            future: future.clone(),
        });
        future.await
    }

    fn pending_within_window(&self, now_ms: u64) -> Option<SharedLogin> {
        let guard = self.pending.lock();
        guard.as_ref().and_then(|pending| {
            (now_ms.saturating_sub(pending.started_at_ms) < LOGIN_DEDUP_WINDOW_MS)
                .then(|| pending.future.clone())
        })
    }

    fn spawn_attempt(&self, attempt: u64, variant: String, url: String) -> SharedLogin {
        let handlers = Arc::clone(&self.handlers);
        let engine = Arc::clone(&self.engine);
        let broadcaster = Arc::clone(&self.broadcaster);
        let view = Arc::clone(&self.view);
        let pending = Arc::clone(&self.pending);
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let result = run_attempt(&handlers, &engine, &broadcaster, &view, &variant, &url).await;
            if result.is_err() {
                // Clear pending state so a retry can start immediately, but
                // only if a newer attempt has not replaced this one.
                let mut guard = pending.lock();
                if guard.as_ref().is_some_and(|p| p.attempt == attempt) {
                    *guard = None;
                }
            }
            let _ = tx.send(result);
        });

        async move {
            rx.await
                .unwrap_or_else(|_| Err(AccessError::login("login attempt task ended unexpectedly")))
        }
        .boxed()
        .shared()
    }
}

async fn run_attempt(
    handlers: &AccessHandlers,
    engine: &AuthorizationEngine,
    broadcaster: &ReauthorizeBroadcaster,
    view: &Arc<ViewScheduler>,
    variant: &str,
    url: &str,
) -> Result<LoginOutcome> {
    tracing::debug!(variant, "opening login dialog");
    let payload = match handlers.dialog.open_login_dialog(url).await {
        Ok(payload) => payload,
        Err(err) => {
            handlers.instrument.access_event(AccessEvent::LoginFailed {
                variant: variant.to_string(),
            });
            return Err(AccessError::login(err.to_string()));
        }
    };

    if payload_accepted(&payload) {
        handlers.instrument.access_event(AccessEvent::LoginSuccess {
            variant: variant.to_string(),
        });
        broadcaster.broadcast_reauthorize();
        // A stale fallback must not mask the fresh entitlement, so fallback
        // substitution is disabled for the post-login run. Its failure does
        // not retract the accepted login.
        if let Err(err) = engine.run(true).await {
            tracing::warn!(error = %err, "post-login authorization failed");
        }
        view.schedule(0);
        Ok(LoginOutcome::Accepted)
    } else {
        tracing::debug!(variant, "login rejected by dialog");
        handlers.instrument.access_event(AccessEvent::LoginRejected {
            variant: variant.to_string(),
        });
        Ok(LoginOutcome::Rejected)
    }
}

/// Whether a dialog return payload counts as an accepted login.
///
/// `success` values `true`, `yes`, and `1` are acceptance; any other
/// non-empty value is rejection. An empty or absent value also counts as
/// acceptance so dialogs that never report status do not read as
/// rejections; that permissive default is worth revisiting.
fn payload_accepted(payload: &str) -> bool {
    let success = url::form_urlencoded::parse(payload.as_bytes())
        .find(|(key, _)| key == "success")
        .map(|(_, value)| value.into_owned());
    match success.as_deref() {
        None | Some("") => true,
        Some("true") | Some("yes") | Some("1") => true,
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_values() {
        assert!(payload_accepted("success=true"));
        assert!(payload_accepted("success=yes"));
        assert!(payload_accepted("success=1"));
        assert!(payload_accepted("success=yes&code=abc"));
    }

    #[test]
    fn explicit_rejection_values() {
        assert!(!payload_accepted("success=no"));
        assert!(!payload_accepted("success=false"));
        assert!(!payload_accepted("success=0"));
    }

    #[test]
    fn absent_status_is_success_equivalent() {
        assert!(payload_accepted(""));
        assert!(payload_accepted("code=abc"));
        assert!(payload_accepted("success="));
    }
}
