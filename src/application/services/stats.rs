//! Booking counters kept in the cache store, and cache maintenance

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::application::cache::{keys, SharedCacheService};

/// Snapshot of the booking counters. Counters are ephemeral and restart
/// from zero with the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingStats {
    pub total_bookings: i64,
    pub hotel_id: Option<i32>,
    pub hotel_bookings: Option<i64>,
    pub room_id: Option<i32>,
    pub room_bookings: Option<i64>,
}

pub struct StatsService {
    cache: SharedCacheService,
}

impl StatsService {
    pub fn new(cache: SharedCacheService) -> Self {
        Self { cache }
    }

    pub async fn booking_stats(
        &self,
        hotel_id: Option<i32>,
        room_id: Option<i32>,
    ) -> BookingStats {
        let total_bookings = self.cache.counter(keys::TOTAL_BOOKINGS).await;
        let hotel_bookings = match hotel_id {
            Some(id) => Some(self.cache.counter(&keys::hotel_bookings_counter(id)).await),
            None => None,
        };
        let room_bookings = match room_id {
            Some(id) => Some(self.cache.counter(&keys::room_bookings_counter(id)).await),
            None => None,
        };
        BookingStats {
            total_bookings,
            hotel_id,
            hotel_bookings,
            room_id,
            room_bookings,
        }
    }

    /// Drop every cache entry whose key starts with `prefix`; an empty prefix
    /// empties the cache, counters included.
    pub async fn clear_cache(&self, prefix: &str) -> u64 {
        let removed = self.cache.delete_by_prefix(prefix).await;
        info!(prefix, removed, "Cache cleared");
        removed
    }
}
