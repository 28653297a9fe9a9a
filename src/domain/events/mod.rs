//! Domain events
//!
//! Facts about booking and room lifecycle changes. The publisher port and
//! the broadcast bus live in `application`.

pub mod types;

pub use types::{
    BookingEvent, EmailNotificationEvent, Event, EventMessage, NotificationKind,
    RoomStatusChangedEvent,
};
