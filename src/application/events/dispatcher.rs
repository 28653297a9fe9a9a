//! Best-effort publication through the `EventPublisher` port

use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::EventPublisher;
use crate::domain::events::{Event, EventMessage};
use crate::shared::best_effort;

/// Publishes after commit. Errors and timeouts are logged, never returned,
/// and never retried.
#[derive(Clone)]
pub struct EventDispatcher {
    publisher: Arc<dyn EventPublisher>,
    timeout: Duration,
}

impl EventDispatcher {
    pub fn new(publisher: Arc<dyn EventPublisher>, timeout: Duration) -> Self {
        Self { publisher, timeout }
    }

    pub async fn publish(&self, event: Event) {
        let message = EventMessage::new(event);
        let topic = message.topic();
        best_effort(self.timeout, topic, self.publisher.publish(message)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::DispatchError;
    use crate::domain::events::RoomStatusChangedEvent;
    use crate::domain::RoomStatus;
    use async_trait::async_trait;

    struct Stuck;

    #[async_trait]
    impl EventPublisher for Stuck {
        async fn publish(&self, _message: EventMessage) -> Result<(), DispatchError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn slow_publisher_is_cut_off() {
        let dispatcher = EventDispatcher::new(Arc::new(Stuck), Duration::from_millis(20));
        let started = std::time::Instant::now();
        dispatcher
            .publish(Event::RoomStatusChanged(RoomStatusChangedEvent {
                room_id: 1,
                hotel_id: 1,
                old_status: RoomStatus::Available,
                new_status: RoomStatus::Inactive,
            }))
            .await;
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
