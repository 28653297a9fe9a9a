//! Outbound ports: key-value cache and event dispatch
//!
//! Both are best-effort collaborators. Callers bound every call with a
//! timeout and log failures instead of surfacing them.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::events::EventMessage;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),

    #[error("cached value for '{key}' is not valid: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("cache serialization failed: {0}")]
    Serialization(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("event dispatcher is closed")]
    Closed,

    #[error("event dispatch failed: {0}")]
    Failed(String),
}

/// Key-value store holding opaque JSON blobs.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// `ttl = None` keeps the entry until deleted
    async fn set(&self, key: &str, value: String, ttl: Option<Duration>)
        -> Result<(), CacheError>;

    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Returns the number of entries removed
    async fn delete_by_prefix(&self, prefix: &str) -> Result<u64, CacheError>;

    /// Atomically add one to a counter, creating it at zero
    async fn increment(&self, key: &str) -> Result<i64, CacheError>;
}

/// Fire-and-forget publication of lifecycle events.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, message: EventMessage) -> Result<(), DispatchError>;
}
