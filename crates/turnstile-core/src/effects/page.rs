//! Page signal effects.
//!
//! The host document reports visibility changes and user engagement signals
//! (scroll, tap) through this trait. The DOM listeners themselves are the
//! embedder's concern.

use async_trait::async_trait;

/// Document visibility and engagement signals.
#[async_trait]
pub trait PageEffects: Send + Sync {
    /// Whether the document is currently visible.
    fn is_visible(&self) -> bool;

    /// Wait for the next visibility change and return the new state.
    async fn wait_visibility_change(&self) -> bool;

    /// Wait for the next scroll signal.
    async fn wait_scroll(&self);

    /// Wait for the next tap or click signal.
    async fn wait_tap(&self);
}
