//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod booking_repository;
pub mod hotel_repository;
pub mod repository_provider;
pub mod room_repository;
pub mod user_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

use crate::shared::{PaginatedResult, PaginationParams};

pub(crate) fn page_of<T>(items: Vec<T>, total: u64, page: PaginationParams) -> PaginatedResult<T> {
    PaginatedResult::new(items, total, page.page, page.limit)
}
