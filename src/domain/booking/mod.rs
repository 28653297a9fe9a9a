//! Booking aggregate
//!
//! Contains the Booking entity, the stay period value object, the status
//! state machine and the repository interface.

pub mod model;
pub mod period;
pub mod repository;
pub mod state;

pub use model::{Booking, BookingDetails, BookingPatch, NewBooking};
pub use period::StayPeriod;
pub use repository::{BookingChange, BookingRepository, RoomBookingQuery};
pub use state::{BookingAction, BookingStatus, Transition};
