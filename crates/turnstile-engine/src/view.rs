//! View detection and the view report cycle.
//!
//! A "view" is a qualifying engagement signal while the document is visible:
//! the dwell timer elapsing, a scroll, or a tap. Detection is a single
//! select-style race over the competing triggers; whichever fires first
//! structurally disarms the rest, so no trigger can fire twice or after
//! cancellation.

use crate::authorization::AuthorizationEngine;
use crate::pingback::PingbackReporter;
use crate::service::AccessHandlers;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use turnstile_core::effects::AccessEvent;

/// Dwell time before an undisturbed visible document counts as viewed.
pub const DEFAULT_TIME_TO_VIEW_MS: u64 = 2000;

/// Terminal state of one view wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewOutcome {
    /// The session qualified as a view.
    Viewed,
    /// The document was hidden before any qualifying trigger fired. The
    /// cycle is abandoned but may be rescheduled later.
    Canceled,
}

/// Detects when the current document session counts as a view.
pub struct ViewDetector {
    handlers: Arc<AccessHandlers>,
}

impl ViewDetector {
    /// Build a detector over the document's page and clock effects.
    pub fn new(handlers: Arc<AccessHandlers>) -> Self {
        Self { handlers }
    }

    /// Wait until the session qualifies as a view or is canceled.
    ///
    /// If the document is not visible the wait first defers until it
    /// becomes visible. `time_to_view_ms == 0` qualifies immediately once
    /// visible, used when the view follows a direct user action such as a
    /// completed login.
    pub async fn wait_for_view(&self, time_to_view_ms: u64) -> ViewOutcome {
        let page = &self.handlers.page;
        while !page.is_visible() {
            page.wait_visibility_change().await;
        }

        if time_to_view_ms == 0 {
            tracing::debug!("view qualified immediately");
            return ViewOutcome::Viewed;
        }

        let hidden = async {
            loop {
                if !page.wait_visibility_change().await {
                    return;
                }
            }
        };

        // Four triggers armed at once; the select drops the losers, which
        // releases their listeners and the timer in one step.
        tokio::select! {
            _ = hidden => {
                tracing::debug!("view canceled; document hidden");
                ViewOutcome::Canceled
            }
            _ = self.handlers.clock.sleep_ms(time_to_view_ms) => {
                tracing::debug!(dwell_ms = time_to_view_ms, "view qualified by dwell time");
                ViewOutcome::Viewed
            }
            _ = page.wait_scroll() => {
                tracing::debug!("view qualified by scroll");
                ViewOutcome::Viewed
            }
            _ = page.wait_tap() => {
                tracing::debug!("view qualified by tap");
                ViewOutcome::Viewed
            }
        }
    }
}

/// Owns the per-cycle view task: schedule, cancel, reschedule.
///
/// Each schedule call tears the previous cycle down (aborting releases its
/// armed listeners and timer) and starts a fresh one, so at most one cycle
/// is ever armed.
pub struct ViewScheduler {
    detector: ViewDetector,
    engine: Arc<AuthorizationEngine>,
    pingback: Arc<PingbackReporter>,
    handlers: Arc<AccessHandlers>,
    current: Mutex<Option<JoinHandle<()>>>,
}

impl ViewScheduler {
    /// Build a scheduler wiring detection to the report pipeline.
    pub fn new(
        detector: ViewDetector,
        engine: Arc<AuthorizationEngine>,
        pingback: Arc<PingbackReporter>,
        handlers: Arc<AccessHandlers>,
    ) -> Self {
        Self {
            detector,
            engine,
            pingback,
            handlers,
            current: Mutex::new(None),
        }
    }

    /// Start a fresh view cycle, replacing any cycle in flight.
    pub fn schedule(self: &Arc<Self>, time_to_view_ms: u64) {
        let mut current = self.current.lock();
        if let Some(previous) = current.take() {
            previous.abort();
        }
        let this = Arc::clone(self);
        *current = Some(tokio::spawn(async move {
            this.run_cycle(time_to_view_ms).await;
        }));
    }

    async fn run_cycle(&self, time_to_view_ms: u64) {
        match self.detector.wait_for_view(time_to_view_ms).await {
            ViewOutcome::Canceled => {}
            ViewOutcome::Viewed => {
                self.handlers.instrument.access_event(AccessEvent::Viewed);
                // The report must reflect the most recent entitlement data.
                self.engine.last_authorization().await;
                let authdata = self.engine.response();
                if let Err(err) = self.pingback.report_view(authdata).await {
                    tracing::warn!(error = %err, "view report failed");
                }
            }
        }
    }
}
