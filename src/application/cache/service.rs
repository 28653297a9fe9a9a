//! Typed, time-bounded cache access

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::keys;
use crate::application::ports::{CacheError, CacheStore};
use crate::config::CacheConfig;
use crate::shared::best_effort;

/// Wraps a [`CacheStore`] with JSON (de)serialization and per-call timeouts.
///
/// No method returns an error: a failing or slow backend degrades to a cache
/// miss, and the failure is logged.
pub struct CacheService {
    store: Arc<dyn CacheStore>,
    config: CacheConfig,
}

pub type SharedCacheService = Arc<CacheService>;

impl CacheService {
    pub fn new(store: Arc<dyn CacheStore>, config: CacheConfig) -> Self {
        Self { store, config }
    }

    pub fn booking_ttl(&self) -> Duration {
        Duration::from_secs(self.config.booking_ttl_secs)
    }

    pub fn user_bookings_ttl(&self) -> Duration {
        Duration::from_secs(self.config.user_bookings_ttl_secs)
    }

    pub fn hotel_ttl(&self) -> Duration {
        Duration::from_secs(self.config.hotel_ttl_secs)
    }

    pub fn hotel_list_ttl(&self) -> Duration {
        Duration::from_secs(self.config.hotel_list_ttl_secs)
    }

    pub fn room_search_ttl(&self) -> Duration {
        Duration::from_secs(self.config.room_search_ttl_secs)
    }

    fn timeout(&self) -> Duration {
        self.config.operation_timeout()
    }

    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if !self.config.enabled {
            return None;
        }
        let raw = best_effort(self.timeout(), "cache.get", self.store.get(key)).await??;
        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!(key, "Cache hit");
                Some(value)
            }
            Err(e) => {
                let err = CacheError::Corrupt {
                    key: key.to_string(),
                    reason: e.to_string(),
                };
                warn!(error = %err, "Dropping unreadable cache entry");
                self.delete(key).await;
                None
            }
        }
    }

    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        if !self.config.enabled {
            return;
        }
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, error = %CacheError::Serialization(e.to_string()), "Not caching value");
                return;
            }
        };
        best_effort(self.timeout(), "cache.set", self.store.set(key, raw, Some(ttl))).await;
    }

    pub async fn delete(&self, key: &str) {
        best_effort(self.timeout(), "cache.delete", self.store.delete(key)).await;
    }

    /// Number of entries removed; zero when the backend failed.
    pub async fn delete_by_prefix(&self, prefix: &str) -> u64 {
        match best_effort(
            self.timeout(),
            "cache.delete_by_prefix",
            self.store.delete_by_prefix(prefix),
        )
        .await
        {
            Some(removed) => {
                debug!(prefix, removed, "Cache prefix invalidated");
                removed
            }
            None => 0,
        }
    }

    pub async fn increment(&self, key: &str) -> Option<i64> {
        best_effort(self.timeout(), "cache.increment", self.store.increment(key)).await
    }

    /// Current value of a counter; missing or unreadable counters read as zero.
    pub async fn counter(&self, key: &str) -> i64 {
        best_effort(self.timeout(), "cache.get", self.store.get(key))
            .await
            .flatten()
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(0)
    }

    // ── Invalidation ───────────────────────────────────────────

    pub async fn invalidate_booking(&self, booking_id: i32) {
        self.delete(&keys::booking(booking_id)).await;
    }

    pub async fn invalidate_user(&self, user_id: i32) {
        self.delete(&keys::user_bookings(user_id)).await;
    }

    /// Drops the hotel entry, its room searches and every cached hotel listing.
    pub async fn invalidate_hotel(&self, hotel_id: i32) {
        self.delete(&keys::hotel(hotel_id)).await;
        self.delete_by_prefix(&keys::room_search_prefix(hotel_id))
            .await;
        self.delete_by_prefix(keys::HOTEL_LIST_PREFIX).await;
    }

    pub async fn track_booking_created(&self, hotel_id: i32, room_id: i32) {
        self.increment(keys::TOTAL_BOOKINGS).await;
        self.increment(&keys::hotel_bookings_counter(hotel_id)).await;
        self.increment(&keys::room_bookings_counter(room_id)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::cache::MemoryCacheStore;
    use async_trait::async_trait;

    fn service() -> CacheService {
        CacheService::new(Arc::new(MemoryCacheStore::new()), CacheConfig::default())
    }

    struct BrokenStore;

    #[async_trait]
    impl CacheStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            Err(CacheError::Unavailable("connection refused".into()))
        }
        async fn set(&self, _: &str, _: String, _: Option<Duration>) -> Result<(), CacheError> {
            Err(CacheError::Unavailable("connection refused".into()))
        }
        async fn delete(&self, _key: &str) -> Result<(), CacheError> {
            Err(CacheError::Unavailable("connection refused".into()))
        }
        async fn delete_by_prefix(&self, _prefix: &str) -> Result<u64, CacheError> {
            Err(CacheError::Unavailable("connection refused".into()))
        }
        async fn increment(&self, _key: &str) -> Result<i64, CacheError> {
            Err(CacheError::Unavailable("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn json_roundtrip() {
        let cache = service();
        cache
            .set_json("k", &vec![1, 2, 3], Duration::from_secs(60))
            .await;
        assert_eq!(cache.get_json::<Vec<i32>>("k").await, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn corrupt_entries_are_dropped() {
        let store = Arc::new(MemoryCacheStore::new());
        store.set("k", "not json".into(), None).await.unwrap();
        let cache = CacheService::new(store.clone(), CacheConfig::default());

        assert_eq!(cache.get_json::<Vec<i32>>("k").await, None);
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn broken_backend_degrades_to_miss() {
        let cache = CacheService::new(Arc::new(BrokenStore), CacheConfig::default());
        cache.set_json("k", &1, Duration::from_secs(1)).await;
        assert_eq!(cache.get_json::<i32>("k").await, None);
        assert_eq!(cache.increment("c").await, None);
        assert_eq!(cache.counter("c").await, 0);
        cache.invalidate_hotel(1).await;
    }

    #[tokio::test]
    async fn disabled_cache_never_hits() {
        let config = CacheConfig {
            enabled: false,
            ..Default::default()
        };
        let cache = CacheService::new(Arc::new(MemoryCacheStore::new()), config);
        cache.set_json("k", &1, Duration::from_secs(60)).await;
        assert_eq!(cache.get_json::<i32>("k").await, None);
    }

    #[tokio::test]
    async fn hotel_invalidation_clears_searches_and_listings() {
        let cache = service();
        let ttl = Duration::from_secs(60);
        let search = keys::room_search(1, &keys::QueryShape::new().with("guests", 2));
        let other_search = keys::room_search(2, &keys::QueryShape::new().with("guests", 2));
        let listing = keys::hotel_list(&keys::QueryShape::new().with("page", 1));

        cache.set_json(&keys::hotel(1), &"h", ttl).await;
        cache.set_json(&search, &"s", ttl).await;
        cache.set_json(&other_search, &"s", ttl).await;
        cache.set_json(&listing, &"l", ttl).await;

        cache.invalidate_hotel(1).await;

        assert_eq!(cache.get_json::<String>(&keys::hotel(1)).await, None);
        assert_eq!(cache.get_json::<String>(&search).await, None);
        assert_eq!(cache.get_json::<String>(&listing).await, None);
        assert_eq!(
            cache.get_json::<String>(&other_search).await,
            Some("s".to_string())
        );
    }

    #[tokio::test]
    async fn booking_counters() {
        let cache = service();
        cache.track_booking_created(1, 10).await;
        cache.track_booking_created(1, 11).await;
        assert_eq!(cache.counter(keys::TOTAL_BOOKINGS).await, 2);
        assert_eq!(cache.counter(&keys::hotel_bookings_counter(1)).await, 2);
        assert_eq!(cache.counter(&keys::room_bookings_counter(10)).await, 1);
    }
}
