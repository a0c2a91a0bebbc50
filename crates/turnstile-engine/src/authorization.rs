//! Authorization engine.
//!
//! Drives the fetch-or-fallback authorization flow and owns the two ordering
//! futures every consumer hangs off:
//!
//! - the **first-authorization gate** resolves exactly once, the first time
//!   any run settles (success, fallback, skip, or failure; the gate never
//!   rejects);
//! - **last authorization** is replaced at the start of every run with the
//!   join of the first gate and that run's completion, so no consumer can
//!   observe a later run's effects before the very first run has settled.
//!
//! A run: `IDLE → FETCHING → {APPLIED, FALLBACK_APPLIED, ERRORED}`, with a
//! skip short-circuit for `type=other` documents that disable server
//! contact. The authorization response is replaced, never mutated, so
//! concurrent readers never observe a torn write.

use crate::identity::ReaderIdentity;
use crate::service::AccessHandlers;
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{oneshot, watch};
use turnstile_core::effects::{AccessEvent, UrlVars};
use turnstile_core::{AccessConfig, AccessError, AccessKind, DocumentEnv, Result};

/// Upper bound on one authorization fetch.
pub const AUTHORIZATION_TIMEOUT_MS: u64 = 3000;

/// How an authorization run settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationOutcome {
    /// A fetched response was applied.
    Applied,
    /// The configured fallback response was applied.
    FallbackApplied,
    /// Server contact is disabled for this document; nothing was applied.
    Skipped,
}

/// Cloneable future settling when all authorization work, up to and
/// including the most recent run, has settled.
pub type LastAuthorization = Shared<BoxFuture<'static, ()>>;

/// Runs authorization and holds the ordering-guaranteed future pair.
pub struct AuthorizationEngine {
    config: Arc<AccessConfig>,
    env: DocumentEnv,
    handlers: Arc<AccessHandlers>,
    identity: Arc<ReaderIdentity>,
    response: RwLock<Option<Arc<Value>>>,
    login_urls: RwLock<HashMap<String, String>>,
    first_tx: watch::Sender<bool>,
    last: Mutex<LastAuthorization>,
}

impl AuthorizationEngine {
    /// Build an engine for one document.
    ///
    /// Login URLs are seeded unexpanded from the configuration and replaced
    /// with resolved versions after each successful run.
    pub fn new(
        config: Arc<AccessConfig>,
        env: DocumentEnv,
        handlers: Arc<AccessHandlers>,
        identity: Arc<ReaderIdentity>,
    ) -> Self {
        let (first_tx, first_rx) = watch::channel(false);
        let seeded = config
            .login()
            .iter()
            .map(|(variant, url)| (variant.to_string(), url.to_string()))
            .collect();
        // Before any run, "last" is just the first gate.
        let last = Mutex::new(first_gate(first_rx).boxed().shared());
        Self {
            config,
            env,
            handlers,
            identity,
            response: RwLock::new(None),
            login_urls: RwLock::new(seeded),
            first_tx,
            last,
        }
    }

    /// Future resolving once the first authorization run has settled.
    pub fn when_first_authorized(&self) -> BoxFuture<'static, ()> {
        first_gate(self.first_tx.subscribe()).boxed()
    }

    /// The current last-authorization future.
    ///
    /// Never settles before the first-authorization gate, for any
    /// interleaving of runs.
    pub fn last_authorization(&self) -> LastAuthorization {
        self.last.lock().clone()
    }

    /// Latest applied authorization response, if any.
    pub fn response(&self) -> Option<Arc<Value>> {
        self.response.read().clone()
    }

    /// Resolved login URL for a variant.
    pub fn login_url(&self, variant: &str) -> Option<String> {
        self.login_urls.read().get(variant).cloned()
    }

    /// Run one authorization cycle.
    ///
    /// `disable_fallback` suppresses fallback substitution on fetch failure,
    /// used after login so a stale "not entitled" fallback cannot mask a
    /// fresh entitlement.
    pub async fn run(&self, disable_fallback: bool) -> Result<AuthorizationOutcome> {
        // Replace the last-authorization future before the first suspension
        // point, so every consumer from here on waits for this run too.
        let (done_tx, done_rx) = oneshot::channel::<()>();
        self.install_last(done_rx);
        let result = self.run_inner(disable_fallback).await;
        let _ = done_tx.send(());
        result
    }

    fn install_last(&self, done_rx: oneshot::Receiver<()>) {
        let first = first_gate(self.first_tx.subscribe());
        let joined = async move {
            first.await;
            // A dropped sender still settles the join: the run is over.
            let _ = done_rx.await;
        }
        .boxed()
        .shared();
        *self.last.lock() = joined;
    }

    /// Resolve the first-authorization gate. Idempotent.
    fn resolve_first(&self) {
        self.first_tx.send_if_modified(|resolved| {
            if *resolved {
                false
            } else {
                *resolved = true;
                true
            }
        });
    }

    /// Server contact is disabled entirely for `type=other` documents with
    /// no fallback response, and for any `type=other` document served from a
    /// restricted proxy origin.
    fn should_skip(&self) -> bool {
        self.config.kind() == AccessKind::Other
            && (self.config.authorization_fallback_response().is_none() || self.env.proxied)
    }

    async fn run_inner(&self, disable_fallback: bool) -> Result<AuthorizationOutcome> {
        if self.should_skip() {
            tracing::debug!("authorization skipped; no server contact for this document");
            self.resolve_first();
            return Ok(AuthorizationOutcome::Skipped);
        }
        match self.fetch_and_apply(disable_fallback).await {
            Ok(outcome) => {
                self.handlers
                    .instrument
                    .access_event(AccessEvent::AuthorizationReceived);
                self.handlers.instrument.toggle_error_state(false);
                Ok(outcome)
            }
            Err(err) => {
                tracing::warn!(error = %err, "authorization run failed");
                self.handlers
                    .instrument
                    .access_event(AccessEvent::AuthorizationFailed);
                self.handlers.instrument.toggle_error_state(true);
                // Consumers of the first gate must still make progress.
                self.resolve_first();
                Err(err)
            }
        }
    }

    async fn fetch_and_apply(&self, disable_fallback: bool) -> Result<AuthorizationOutcome> {
        let (response, outcome) = match self.config.authorization_url() {
            Some(url) => self.fetch_with_fallback(url, disable_fallback).await?,
            None => {
                // Only reachable for type=other: the skip path has already
                // excluded configs without a fallback response.
                let fallback = self
                    .config
                    .authorization_fallback_response()
                    .cloned()
                    .ok_or_else(|| {
                        AccessError::internal(
                            "no authorization URL and no fallback response configured",
                        )
                    })?;
                (fallback, AuthorizationOutcome::FallbackApplied)
            }
        };

        let response = Arc::new(response);
        *self.response.write() = Some(response.clone());
        self.resolve_first();
        self.rebuild_login_urls(&response).await?;
        self.handlers
            .applier
            .apply(&response)
            .await
            .map_err(|err| AccessError::authorization(err.to_string()))?;
        Ok(outcome)
    }

    async fn fetch_with_fallback(
        &self,
        url: &str,
        disable_fallback: bool,
    ) -> Result<(Value, AuthorizationOutcome)> {
        let expanded = self.expand_outbound(url).await?;
        tracing::debug!(url = %expanded, "fetching authorization");
        match self.fetch_bounded(&expanded).await {
            Ok(response) => Ok((response, AuthorizationOutcome::Applied)),
            Err(err) => match self.config.authorization_fallback_response() {
                Some(fallback) if !disable_fallback => {
                    tracing::debug!(error = %err, "authorization fetch failed; applying fallback response");
                    Ok((fallback.clone(), AuthorizationOutcome::FallbackApplied))
                }
                _ => Err(err),
            },
        }
    }

    async fn fetch_bounded(&self, url: &str) -> Result<Value> {
        tokio::select! {
            result = self.handlers.fetch.fetch_authorization(url) => {
                result.map_err(|err| AccessError::authorization(err.to_string()))
            }
            _ = self.handlers.clock.sleep_ms(AUTHORIZATION_TIMEOUT_MS) => {
                Err(AccessError::authorization(format!(
                    "authorization request timed out after {AUTHORIZATION_TIMEOUT_MS}ms"
                )))
            }
        }
    }

    async fn expand_outbound(&self, url: &str) -> Result<String> {
        let reader_id = self.identity.resolve().await?;
        let vars = UrlVars {
            reader_id: Some(reader_id),
            authdata: self.response(),
            return_url: None,
        };
        self.handlers
            .urls
            .expand(url, &vars)
            .await
            .map_err(|err| AccessError::authorization(err.to_string()))
    }

    async fn rebuild_login_urls(&self, response: &Arc<Value>) -> Result<()> {
        if self.config.login().is_empty() {
            return Ok(());
        }
        let reader_id = self.identity.resolve().await?;
        let mut resolved = HashMap::new();
        for (variant, url) in self.config.login().iter() {
            let vars = UrlVars {
                reader_id: Some(reader_id.clone()),
                authdata: Some(response.clone()),
                return_url: None,
            };
            let expanded = self
                .handlers
                .urls
                .expand(url, &vars)
                .await
                .map_err(|err| AccessError::authorization(err.to_string()))?;
            resolved.insert(variant.to_string(), expanded);
        }
        *self.login_urls.write() = resolved;
        Ok(())
    }
}

/// Future resolving once the watch-channel gate reads true.
fn first_gate(mut rx: watch::Receiver<bool>) -> impl std::future::Future<Output = ()> + Send + 'static {
    async move {
        if *rx.borrow() {
            return;
        }
        while rx.changed().await.is_ok() {
            if *rx.borrow() {
                return;
            }
        }
        // Sender dropped without resolving: the engine is gone, unblock.
    }
}
