//! Read-through cache over the `CacheStore` port
//!
//! The cache is never authoritative: every read falls back to the store and
//! every write or invalidation is best-effort.

pub mod keys;
pub mod service;

pub use keys::QueryShape;
pub use service::{CacheService, SharedCacheService};
