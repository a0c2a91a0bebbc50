//! Tokio-backed clock handler.

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;
use turnstile_core::effects::ClockEffects;

/// Production clock delegating to tokio time.
///
/// `now_ms` is measured from handler construction on the tokio clock, so it
/// follows virtual time under a paused test runtime.
#[derive(Debug, Clone)]
pub struct TokioClock {
    start: Instant,
}

impl TokioClock {
    /// Create a clock anchored at the current instant.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClockEffects for TokioClock {
    async fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    async fn sleep_ms(&self, ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}
