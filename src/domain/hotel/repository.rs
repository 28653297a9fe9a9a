//! Hotel repository interface

use async_trait::async_trait;

use super::model::{Hotel, HotelDeletion, HotelFilter, NewHotel};
use crate::shared::{DomainResult, PaginatedResult, PaginationParams};

#[async_trait]
pub trait HotelRepository: Send + Sync {
    async fn create(&self, hotel: NewHotel) -> DomainResult<Hotel>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Hotel>>;

    async fn list(
        &self,
        filter: &HotelFilter,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<Hotel>>;

    /// Persist all fields of an existing hotel
    async fn update(&self, hotel: Hotel) -> DomainResult<Hotel>;

    /// Delete the hotel with its rooms and bookings in one transaction
    async fn delete(&self, id: i32) -> DomainResult<HotelDeletion>;
}
