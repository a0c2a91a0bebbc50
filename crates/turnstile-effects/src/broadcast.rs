//! In-process viewer-session broadcast bus.
//!
//! All documents sharing one viewer session hold clones of the same bus.
//! Delivery is fan-out over a tokio broadcast channel; every subscriber,
//! including the publisher, receives each envelope, and receivers filter on
//! origin and sender id.

use tokio::sync::broadcast;
use turnstile_core::effects::{BroadcastEffects, BroadcastEnvelope, BroadcastError};

const BUS_CAPACITY: usize = 32;

/// Viewer-session bus shared by co-resident documents.
#[derive(Debug, Clone)]
pub struct ProcessBroadcastBus {
    tx: broadcast::Sender<BroadcastEnvelope>,
}

impl ProcessBroadcastBus {
    /// Create a fresh viewer-session bus.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BUS_CAPACITY);
        Self { tx }
    }
}

impl Default for ProcessBroadcastBus {
    fn default() -> Self {
        Self::new()
    }
}

impl BroadcastEffects for ProcessBroadcastBus {
    fn publish(&self, envelope: BroadcastEnvelope) -> Result<(), BroadcastError> {
        // A session with no other documents has no subscribers; publishing
        // into the void is not a failure.
        let _ = self.tx.send(envelope);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<BroadcastEnvelope> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use turnstile_core::effects::ReauthorizeMessage;
    use turnstile_core::DocumentId;

    #[tokio::test]
    async fn envelopes_fan_out_to_all_subscribers() {
        let bus = ProcessBroadcastBus::new();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        let sender = DocumentId::new();
        bus.publish(BroadcastEnvelope {
            sender,
            message: ReauthorizeMessage::new("https://pub.example.com"),
        })
        .unwrap();

        assert_eq!(a.recv().await.unwrap().sender, sender);
        assert_eq!(b.recv().await.unwrap().sender, sender);
    }

    #[test]
    fn publish_without_subscribers_is_ok() {
        let bus = ProcessBroadcastBus::new();
        let result = bus.publish(BroadcastEnvelope {
            sender: DocumentId::new(),
            message: ReauthorizeMessage::new("https://pub.example.com"),
        });
        assert!(result.is_ok());
    }
}
