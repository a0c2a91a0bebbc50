//! Access service: the engine's public surface.
//!
//! One service instance per document, built explicitly from the parsed
//! configuration, the document environment, and the full set of effect
//! handlers; there is no hidden global. A document without an access
//! configuration gets a disabled service whose operations are cheap no-ops
//! or `NotConfigured` failures.

use crate::authorization::{AuthorizationEngine, AuthorizationOutcome, LastAuthorization};
use crate::broadcast::ReauthorizeBroadcaster;
use crate::identity::ReaderIdentity;
use crate::login::{LoginCoordinator, LoginOutcome};
use crate::pingback::PingbackReporter;
use crate::view::{ViewDetector, ViewScheduler, DEFAULT_TIME_TO_VIEW_MS};
use futures::FutureExt;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use turnstile_core::effects::{
    ApplyEffects, BroadcastEffects, ClockEffects, DialogEffects, FetchEffects, IdentityEffects,
    InstrumentationEffects, PageEffects, UrlVarsEffects,
};
use turnstile_core::{authdata, AccessConfig, AccessError, DocumentEnv, Result};

/// The complete set of effect handlers a document supplies to the engine.
pub struct AccessHandlers {
    /// Network fetch (authorization + pingback).
    pub fetch: Arc<dyn FetchEffects>,
    /// Clock for timeouts, dwell timers, and the login dedup window.
    pub clock: Arc<dyn ClockEffects>,
    /// Document visibility and engagement signals.
    pub page: Arc<dyn PageEffects>,
    /// Login dialog collaborator.
    pub dialog: Arc<dyn DialogEffects>,
    /// Reader identity source.
    pub identity: Arc<dyn IdentityEffects>,
    /// URL variable expansion.
    pub urls: Arc<dyn UrlVarsEffects>,
    /// Authorization response applier (DOM effects).
    pub applier: Arc<dyn ApplyEffects>,
    /// Analytics events and the error indicator.
    pub instrument: Arc<dyn InstrumentationEffects>,
    /// Viewer-session broadcast channel.
    pub bus: Arc<dyn BroadcastEffects>,
}

/// Per-document access engine facade.
pub struct AccessService {
    inner: Option<Arc<ServiceInner>>,
}

struct ServiceInner {
    handlers: Arc<AccessHandlers>,
    identity: Arc<ReaderIdentity>,
    engine: Arc<AuthorizationEngine>,
    view: Arc<ViewScheduler>,
    login: LoginCoordinator,
    broadcaster: Arc<ReauthorizeBroadcaster>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl AccessService {
    /// Build a service from an already parsed configuration.
    ///
    /// `config: None` produces a disabled service for documents without an
    /// access configuration.
    pub fn new(config: Option<AccessConfig>, env: DocumentEnv, handlers: AccessHandlers) -> Self {
        let Some(config) = config else {
            return Self { inner: None };
        };
        let config = Arc::new(config);
        let handlers = Arc::new(handlers);
        let identity = Arc::new(ReaderIdentity::new(Arc::clone(&handlers.identity)));
        let broadcaster = Arc::new(ReauthorizeBroadcaster::new(
            Arc::clone(&handlers.bus),
            env.clone(),
        ));
        let engine = Arc::new(AuthorizationEngine::new(
            Arc::clone(&config),
            env,
            Arc::clone(&handlers),
            Arc::clone(&identity),
        ));
        let pingback = Arc::new(PingbackReporter::new(
            Arc::clone(&config),
            Arc::clone(&handlers),
            Arc::clone(&identity),
            Arc::clone(&broadcaster),
        ));
        let view = Arc::new(ViewScheduler::new(
            ViewDetector::new(Arc::clone(&handlers)),
            Arc::clone(&engine),
            pingback,
            Arc::clone(&handlers),
        ));
        let login = LoginCoordinator::new(
            Arc::clone(&handlers),
            Arc::clone(&engine),
            Arc::clone(&broadcaster),
            Arc::clone(&view),
        );
        Self {
            inner: Some(Arc::new(ServiceInner {
                handlers,
                identity,
                engine,
                view,
                login,
                broadcaster,
                listener: Mutex::new(None),
            })),
        }
    }

    /// Parse the host document's configuration tree and build a service.
    pub fn from_document(
        config: Option<&Value>,
        env: DocumentEnv,
        handlers: AccessHandlers,
    ) -> Result<Self> {
        let parsed = config.map(AccessConfig::parse).transpose()?;
        Ok(Self::new(parsed, env, handlers))
    }

    /// Whether an access configuration was found for this document.
    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Bring the engine up: start the reauthorize listener, run the initial
    /// authorization, and arm the first view cycle.
    ///
    /// An initial authorization failure is surfaced through instrumentation
    /// (and the resolved first gate) rather than failing startup.
    pub async fn start(&self) {
        let Some(inner) = &self.inner else {
            return;
        };
        inner.spawn_reauthorize_listener();
        if let Err(err) = inner.engine.run(false).await {
            tracing::warn!(error = %err, "initial authorization failed");
        }
        inner.view.schedule(DEFAULT_TIME_TO_VIEW_MS);
    }

    /// Run one authorization cycle now.
    pub async fn run_authorization(&self, disable_fallback: bool) -> Result<AuthorizationOutcome> {
        self.enabled()?.engine.run(disable_fallback).await
    }

    /// Start a fresh view cycle with the given dwell requirement.
    pub fn schedule_view(&self, time_to_view_ms: u64) {
        if let Some(inner) = &self.inner {
            inner.view.schedule(time_to_view_ms);
        }
    }

    /// Wait for the first authorization run to settle.
    ///
    /// Resolves immediately on a disabled service.
    pub async fn when_first_authorized(&self) {
        if let Some(inner) = &self.inner {
            inner.engine.when_first_authorized().await;
        }
    }

    /// Future settling when all authorization work, up to and including the
    /// most recent run, has settled. Never settles before
    /// [`Self::when_first_authorized`].
    pub fn when_last_authorized(&self) -> LastAuthorization {
        match &self.inner {
            Some(inner) => inner.engine.last_authorization(),
            None => futures::future::ready(()).boxed().shared(),
        }
    }

    /// Read a dotted field path from the authorization response, waiting for
    /// the first authorization first.
    pub async fn authdata_field(&self, path: &str) -> Result<Option<Value>> {
        let inner = self.enabled()?;
        inner.engine.when_first_authorized().await;
        Ok(inner
            .engine
            .response()
            .and_then(|response| authdata::field(&response, path).cloned()))
    }

    /// The stable reader identifier for this document's reader.
    pub async fn reader_id(&self) -> Result<String> {
        self.enabled()?.identity.resolve().await
    }

    /// Run the interactive login flow for a configured variant.
    pub async fn login(&self, variant: &str) -> Result<LoginOutcome> {
        self.enabled()?.login.login(variant).await
    }

    fn enabled(&self) -> Result<&Arc<ServiceInner>> {
        self.inner.as_ref().ok_or(AccessError::NotConfigured)
    }
}

impl ServiceInner {
    fn spawn_reauthorize_listener(self: &Arc<Self>) {
        let mut guard = self.listener.lock();
        if guard.is_some() {
            return;
        }
        let this = Arc::clone(self);
        let mut rx = self.handlers.bus.subscribe();
        *guard = Some(tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(envelope) => {
                        if !this.broadcaster.should_react_to(&envelope) {
                            continue;
                        }
                        tracing::debug!(
                            origin = %envelope.message.origin,
                            "reauthorize signal received; refreshing authorization"
                        );
                        if let Err(err) = this.engine.run(false).await {
                            tracing::warn!(error = %err, "broadcast-triggered authorization failed");
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "reauthorize listener lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }));
    }
}
