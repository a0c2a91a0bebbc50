//! Page signal hub.
//!
//! The embedder owns the DOM listeners and pushes visibility changes and
//! engagement signals into this hub; the engine consumes them through the
//! `PageEffects` trait. Visibility is a watch channel (only state changes
//! wake waiters), scroll and tap are broadcast channels so every armed
//! trigger observes each signal at most once.

use async_trait::async_trait;
use tokio::sync::{broadcast, watch};
use turnstile_core::effects::PageEffects;

const SIGNAL_CHANNEL_CAPACITY: usize = 16;

/// Embedder-driven source of page signals.
#[derive(Debug)]
pub struct PageSignalHub {
    visibility: watch::Sender<bool>,
    scroll: broadcast::Sender<()>,
    tap: broadcast::Sender<()>,
}

impl PageSignalHub {
    /// Create a hub with the given initial visibility state.
    pub fn new(initially_visible: bool) -> Self {
        let (visibility, _) = watch::channel(initially_visible);
        let (scroll, _) = broadcast::channel(SIGNAL_CHANNEL_CAPACITY);
        let (tap, _) = broadcast::channel(SIGNAL_CHANNEL_CAPACITY);
        Self {
            visibility,
            scroll,
            tap,
        }
    }

    /// Report a document visibility change. No-op when the state is
    /// unchanged, so waiters only wake on real transitions.
    pub fn set_visible(&self, visible: bool) {
        self.visibility.send_if_modified(|current| {
            let changed = *current != visible;
            *current = visible;
            changed
        });
    }

    /// Report a scroll signal.
    pub fn scroll(&self) {
        let _ = self.scroll.send(());
    }

    /// Report a tap or click signal.
    pub fn tap(&self) {
        let _ = self.tap.send(());
    }
}

#[async_trait]
impl PageEffects for PageSignalHub {
    fn is_visible(&self) -> bool {
        *self.visibility.borrow()
    }

    async fn wait_visibility_change(&self) -> bool {
        let mut rx = self.visibility.subscribe();
        match rx.changed().await {
            Ok(()) => *rx.borrow(),
            // Unreachable while the hub is alive; report current state.
            Err(_) => *self.visibility.borrow(),
        }
    }

    async fn wait_scroll(&self) {
        let mut rx = self.scroll.subscribe();
        let _ = rx.recv().await;
    }

    async fn wait_tap(&self) {
        let mut rx = self.tap.subscribe();
        let _ = rx.recv().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn visibility_change_wakes_waiter() {
        let hub = PageSignalHub::new(true);
        assert!(hub.is_visible());

        let wait = hub.wait_visibility_change();
        tokio::pin!(wait);

        // Same-state report must not wake the waiter.
        hub.set_visible(true);
        tokio::select! {
            biased;
            _ = &mut wait => panic!("woke without a state change"),
            _ = tokio::task::yield_now() => {}
        }

        hub.set_visible(false);
        assert!(!wait.await);
    }

    #[tokio::test]
    async fn scroll_signal_is_observed_by_armed_waiter() {
        let hub = PageSignalHub::new(true);
        let wait = hub.wait_scroll();
        tokio::pin!(wait);
        // Arm the waiter before the signal fires.
        tokio::select! {
            biased;
            _ = &mut wait => panic!("no signal yet"),
            _ = tokio::task::yield_now() => {}
        }
        hub.scroll();
        wait.await;
    }
}
