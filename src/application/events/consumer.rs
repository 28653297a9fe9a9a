//! Background consumer that records every published event

use tokio::task::JoinHandle;
use tracing::{info, info_span, Instrument};

use super::event_bus::EventBus;
use crate::shared::ShutdownSignal;

/// Subscribe to `bus` and log each message until shutdown or until the bus closes.
pub fn spawn_event_logger(bus: &EventBus, shutdown: ShutdownSignal) -> JoinHandle<()> {
    let mut subscriber = bus.subscribe();

    tokio::spawn(
        async move {
            loop {
                tokio::select! {
                    _ = shutdown.wait() => {
                        info!("Event consumer stopping (shutdown)");
                        break;
                    }
                    msg = subscriber.recv() => match msg {
                        Some(msg) => {
                            info!(
                                event_id = %msg.id,
                                topic = msg.topic(),
                                booking_id = ?msg.event.booking_id(),
                                room_id = ?msg.event.room_id(),
                                "Event received"
                            );
                        }
                        None => {
                            info!("Event consumer stopping (bus closed)");
                            break;
                        }
                    }
                }
            }
        }
        .instrument(info_span!("event_consumer")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn stops_on_shutdown() {
        let bus = EventBus::new();
        let shutdown = ShutdownSignal::new();
        let handle = spawn_event_logger(&bus, shutdown.clone());
        assert_eq!(bus.subscriber_count(), 1);

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("consumer did not stop")
            .unwrap();
        assert_eq!(bus.subscriber_count(), 0);
    }
}
