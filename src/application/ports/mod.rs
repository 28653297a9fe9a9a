//! Application ports
//!
//! Outbound interfaces the booking core consumes but does not own.

pub mod outbound;

pub use outbound::{CacheError, CacheStore, DispatchError, EventPublisher};
