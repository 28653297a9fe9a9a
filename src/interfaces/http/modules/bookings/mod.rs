//! Bookings module: reservation creation, lookups and lifecycle transitions

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
