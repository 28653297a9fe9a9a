//! Booking counters kept in the cache

pub mod handlers;

pub use handlers::*;
