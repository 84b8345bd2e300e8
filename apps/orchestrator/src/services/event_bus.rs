//! In-process event bus for the admin WebSocket stream.
//!
//! Every device-visible state change (online/offline, service up/down,
//! command result, install progress) is broadcast here; `/ws/admin`
//! subscribers each get their own lagging receiver rather than sharing one
//! cursor, so one slow client never blocks another.

use mdm_domain::event::DeviceEvent;
use tokio::sync::broadcast;
use tracing::trace;

const CHANNEL_CAPACITY: usize = 4096;

pub struct EventBus {
    sender: broadcast::Sender<DeviceEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: DeviceEvent) {
        if self.sender.receiver_count() == 0 {
            trace!("dropping event, no admin subscribers connected");
            return;
        }
        // A closed channel only happens if every receiver has been dropped
        // between the count check above and this send; safe to ignore.
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mdm_domain::event::DeviceEvent;

    #[tokio::test]
    async fn subscriber_receives_published_event() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        bus.publish(DeviceEvent::DeviceOnline {
            device_id: "dev-1".into(),
            at: Utc::now(),
        });
        let event = rx.recv().await.unwrap();
        assert!(matches!(event, DeviceEvent::DeviceOnline { device_id, .. } if device_id == "dev-1"));
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::new();
        bus.publish(DeviceEvent::DeviceOffline {
            device_id: "dev-1".into(),
            at: Utc::now(),
        });
    }
}
