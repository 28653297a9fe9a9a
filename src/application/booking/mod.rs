//! Booking use cases
//!
//! - `availability`: overlap checks and the available-room search
//! - `room_locks`: per-room serialization of check-and-write
//! - `service`: the booking state machine driven against the store

pub mod availability;
pub mod room_locks;
pub mod service;


pub use availability::{AvailabilityChecker, RoomMatch, RoomSearch};
pub use room_locks::RoomLocks;
pub use service::{BookingRequest, BookingService};
