//! Room repository interface

use async_trait::async_trait;

use super::model::{NewRoom, Room, RoomFilter, RoomStatus};
use crate::shared::{DomainResult, PaginatedResult, PaginationParams};

#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Insert a room; a duplicate number within the hotel is a `Conflict`.
    async fn create(&self, room: NewRoom) -> DomainResult<Room>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Room>>;

    async fn find_by_number(&self, hotel_id: i32, room_number: &str)
        -> DomainResult<Option<Room>>;

    async fn list(
        &self,
        filter: &RoomFilter,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<Room>>;

    /// All rooms matching the filter, ordered by id
    async fn find_all(&self, filter: &RoomFilter) -> DomainResult<Vec<Room>>;

    /// Persist the descriptive fields of an existing room and return it as
    /// stored. `status` is written only when `write_status` is set, so a
    /// stale copy cannot undo a concurrent booking's status change.
    async fn update(&self, room: Room, write_status: bool) -> DomainResult<Room>;

    /// Operational status change, not booking-aware
    async fn set_status(&self, id: i32, status: RoomStatus) -> DomainResult<()>;

    /// Delete the room and its bookings; returns the number of bookings removed
    async fn delete(&self, id: i32) -> DomainResult<u64>;
}
