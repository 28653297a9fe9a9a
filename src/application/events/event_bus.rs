//! Event bus broadcasting lifecycle events to in-process subscribers

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::application::ports::{DispatchError, EventPublisher};
use crate::domain::events::{Event, EventMessage};

const DEFAULT_CAPACITY: usize = 1024;

/// Event bus for broadcasting events to all subscribers
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventMessage>,
    subscriber_count: Arc<AtomicUsize>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            subscriber_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Wrap and broadcast a bare event
    pub fn emit(&self, event: Event) {
        self.send(EventMessage::new(event));
    }

    fn send(&self, message: EventMessage) {
        let topic = message.topic();
        let booking_id = message.event.booking_id();

        match self.sender.send(message) {
            Ok(count) => {
                debug!(topic, ?booking_id, subscribers = count, "Event published");
            }
            Err(_) => {
                debug!(topic, ?booking_id, "Event published (no subscribers)");
            }
        }
    }

    pub fn subscribe(&self) -> EventSubscriber {
        let receiver = self.sender.subscribe();
        let count = self.subscriber_count.fetch_add(1, Ordering::SeqCst) + 1;
        info!(total = count, "New event subscriber");

        EventSubscriber {
            receiver,
            subscriber_count: self.subscriber_count.clone(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriber_count.load(Ordering::SeqCst)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for EventBus {
    async fn publish(&self, message: EventMessage) -> Result<(), DispatchError> {
        self.send(message);
        Ok(())
    }
}

/// Event subscriber that receives events from the bus
pub struct EventSubscriber {
    receiver: broadcast::Receiver<EventMessage>,
    subscriber_count: Arc<AtomicUsize>,
}

impl EventSubscriber {
    /// Next message, or `None` once the bus is gone. Lagged messages are skipped.
    pub async fn recv(&mut self) -> Option<EventMessage> {
        loop {
            match self.receiver.recv().await {
                Ok(msg) => return Some(msg),
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!(missed = count, "Subscriber lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => {
                    return None;
                }
            }
        }
    }
}

impl Drop for EventSubscriber {
    fn drop(&mut self) {
        let prev = self.subscriber_count.fetch_sub(1, Ordering::SeqCst);
        info!(remaining = prev.saturating_sub(1), "Event subscriber disconnected");
    }
}

/// Shared event bus type
pub type SharedEventBus = Arc<EventBus>;

pub fn create_event_bus(capacity: usize) -> SharedEventBus {
    Arc::new(EventBus::with_capacity(capacity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::RoomStatusChangedEvent;
    use crate::domain::RoomStatus;

    fn room_event() -> Event {
        Event::RoomStatusChanged(RoomStatusChangedEvent {
            room_id: 1,
            hotel_id: 1,
            old_status: RoomStatus::Available,
            new_status: RoomStatus::Maintenance,
        })
    }

    #[tokio::test]
    async fn subscribers_receive_published_messages() {
        let bus = EventBus::new();
        let mut sub = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        bus.publish(EventMessage::new(room_event())).await.unwrap();
        let msg = sub.recv().await.unwrap();
        assert_eq!(msg.topic(), "room.status_changed");

        drop(sub);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn publishing_without_subscribers_is_ok() {
        let bus = EventBus::new();
        assert!(bus.publish(EventMessage::new(room_event())).await.is_ok());
    }
}
