//! Live event fan-out
//!
//! Every audited event is also published on a broadcast channel so daemons
//! and tests can observe the lifecycle stream without polling the audit log.

use tokio::sync::broadcast;
use vslm_types::LifecycleEvent;

/// Channel capacity for the event stream
const EVENT_CHANNEL_CAPACITY: usize = 16384;

/// Broadcasts lifecycle events to any number of subscribers
pub struct EventBroadcaster {
    tx: broadcast::Sender<LifecycleEvent>,
}

impl EventBroadcaster {
    /// Create a new broadcaster
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Subscribe to the event stream
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.tx.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Publish an event; no subscribers is fine
    pub fn emit(&self, event: LifecycleEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBroadcaster {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{timeout, Duration};
    use vslm_types::{ServerId, ServerStatus};

    #[tokio::test]
    async fn test_event_emission() {
        let broadcaster = EventBroadcaster::new();
        let mut rx = broadcaster.subscribe();

        broadcaster.emit(LifecycleEvent::created(
            ServerId::generate(),
            ServerStatus::Running,
        ));

        let received = timeout(Duration::from_millis(100), rx.recv())
            .await
            .expect("timeout")
            .expect("receive error");

        assert_eq!(received.new_status, Some(ServerStatus::Running));
    }

    #[test]
    fn test_subscriber_count() {
        let broadcaster = EventBroadcaster::new();

        assert_eq!(broadcaster.subscriber_count(), 0);

        let _rx1 = broadcaster.subscribe();
        assert_eq!(broadcaster.subscriber_count(), 1);

        let _rx2 = broadcaster.subscribe();
        assert_eq!(broadcaster.subscriber_count(), 2);
    }

    #[test]
    fn test_emit_without_subscribers_does_not_panic() {
        let broadcaster = EventBroadcaster::new();
        broadcaster.emit(LifecycleEvent::created(
            ServerId::generate(),
            ServerStatus::Running,
        ));
    }
}
