//! View report delivery.

use crate::broadcast::ReauthorizeBroadcaster;
use crate::identity::ReaderIdentity;
use crate::service::AccessHandlers;
use serde_json::Value;
use std::sync::Arc;
use turnstile_core::effects::{AccessEvent, UrlVars};
use turnstile_core::{AccessConfig, AccessError, Result};

/// Reports a confirmed view to the pingback endpoint.
///
/// Fire-and-forget from the session's point of view: a failure is
/// instrumented and returned to the caller, but never retried.
pub struct PingbackReporter {
    config: Arc<AccessConfig>,
    handlers: Arc<AccessHandlers>,
    identity: Arc<ReaderIdentity>,
    broadcaster: Arc<ReauthorizeBroadcaster>,
}

impl PingbackReporter {
    /// Build a reporter for one document.
    pub fn new(
        config: Arc<AccessConfig>,
        handlers: Arc<AccessHandlers>,
        identity: Arc<ReaderIdentity>,
        broadcaster: Arc<ReauthorizeBroadcaster>,
    ) -> Self {
        Self {
            config,
            handlers,
            identity,
            broadcaster,
        }
    }

    /// Deliver one view report, parameterized by the current authorization
    /// response.
    ///
    /// No configured pingback URL is a successful no-op. On delivery the
    /// peer documents are signaled to re-authorize, since the report may
    /// have consumed entitlement (e.g. a metered view).
    pub async fn report_view(&self, authdata: Option<Arc<Value>>) -> Result<()> {
        let Some(url) = self.config.pingback_url() else {
            tracing::debug!("no pingback configured; view report skipped");
            return Ok(());
        };

        let reader_id = self
            .identity
            .resolve()
            .await
            .map_err(|err| AccessError::pingback(err.to_string()))?;
        let vars = UrlVars {
            reader_id: Some(reader_id),
            authdata,
            return_url: None,
        };
        let expanded = self
            .handlers
            .urls
            .expand(url, &vars)
            .await
            .map_err(|err| AccessError::pingback(err.to_string()))?;

        tracing::debug!(url = %expanded, "reporting view");
        match self.handlers.fetch.send_pingback(&expanded).await {
            Ok(()) => {
                self.handlers.instrument.access_event(AccessEvent::PingbackSent);
                self.broadcaster.broadcast_reauthorize();
                Ok(())
            }
            Err(err) => {
                self.handlers
                    .instrument
                    .access_event(AccessEvent::PingbackFailed);
                Err(AccessError::pingback(err.to_string()))
            }
        }
    }
}
