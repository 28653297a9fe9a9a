//! Application events (pub/sub)
//!
//! Event types are defined in `domain::events`. The broadcast `EventBus`,
//! which implements the `EventPublisher` port, lives here together with the
//! background consumer.

pub mod consumer;
pub mod dispatcher;
pub mod event_bus;

pub use crate::domain::events::*;

pub use consumer::spawn_event_logger;
pub use dispatcher::EventDispatcher;
pub use event_bus::{create_event_bus, EventBus, EventSubscriber, SharedEventBus};
