//! User repository interface

use async_trait::async_trait;

use super::model::{NewUser, User};
use crate::shared::{DomainResult, PaginatedResult, PaginationParams};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user; a duplicate email is a `Conflict`.
    async fn create(&self, user: NewUser) -> DomainResult<User>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    async fn list(&self, page: PaginationParams) -> DomainResult<PaginatedResult<User>>;

    /// Persist all fields of an existing user
    async fn update(&self, user: User) -> DomainResult<User>;

    /// Delete the user and their booking history; returns bookings removed
    async fn delete(&self, id: i32) -> DomainResult<u64>;
}
