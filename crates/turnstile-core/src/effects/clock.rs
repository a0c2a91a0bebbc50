//! Clock effects.

use async_trait::async_trait;

/// Time operations used by the engine.
///
/// Kept behind a trait so timeouts, the view dwell timer, and the login
/// dedup window all run against the same clock, real or simulated.
#[async_trait]
pub trait ClockEffects: Send + Sync {
    /// Milliseconds since an arbitrary fixed epoch. Only differences are
    /// meaningful.
    async fn now_ms(&self) -> u64;

    /// Suspend for the given number of milliseconds.
    async fn sleep_ms(&self, ms: u64);
}
