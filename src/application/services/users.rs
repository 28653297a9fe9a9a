//! Guest accounts

use std::sync::Arc;

use tracing::info;

use crate::application::cache::SharedCacheService;
use crate::domain::{DomainError, DomainResult, NewUser, RepositoryProvider, User, UserPatch};
use crate::shared::{PaginatedResult, PaginationParams};

pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    cache: SharedCacheService,
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, cache: SharedCacheService) -> Self {
        Self { repos, cache }
    }

    pub async fn create(&self, user: NewUser) -> DomainResult<User> {
        if self.repos.users().find_by_email(&user.email).await?.is_some() {
            return Err(DomainError::Conflict(format!(
                "User with email {} already exists",
                user.email
            )));
        }
        let user = self.repos.users().create(user).await?;
        info!(user_id = user.id, role = %user.role, "User created");
        Ok(user)
    }

    pub async fn get(&self, id: i32) -> DomainResult<User> {
        self.repos
            .users()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    pub async fn list(&self, page: PaginationParams) -> DomainResult<PaginatedResult<User>> {
        self.repos.users().list(page).await
    }

    pub async fn update(&self, id: i32, patch: UserPatch) -> DomainResult<User> {
        let mut user = self.get(id).await?;
        if let Some(email) = patch.email.as_deref() {
            if let Some(other) = self.repos.users().find_by_email(email).await? {
                if other.id != id {
                    return Err(DomainError::Conflict(format!(
                        "User with email {} already exists",
                        email
                    )));
                }
            }
        }
        user.apply(patch);
        let user = self.repos.users().update(user).await?;
        self.cache.invalidate_user(id).await;
        Ok(user)
    }

    /// Delete a user without active bookings, together with their booking history.
    pub async fn delete(&self, id: i32) -> DomainResult<u64> {
        self.get(id).await?;
        let active = self.repos.bookings().count_active_for_user(id).await?;
        if active > 0 {
            return Err(DomainError::HasActiveBookings {
                entity: "User",
                id,
                count: active,
            });
        }

        let history = self.repos.bookings().list_for_user(id).await?;
        let removed = self.repos.users().delete(id).await?;
        info!(user_id = id, bookings_deleted = removed, "User deleted");

        self.cache.invalidate_user(id).await;
        for booking in &history {
            self.cache.invalidate_booking(booking.id).await;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::cache::CacheService;
    use crate::config::CacheConfig;
    use crate::domain::{
        BookingChange, BookingStatus, NewBooking, NewHotel, NewRoom, RoomStatus, StayPeriod,
        UserRole,
    };
    use crate::infrastructure::cache::MemoryCacheStore;
    use crate::infrastructure::storage::InMemoryRepositoryProvider;
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.into(),
            first_name: "Ada".into(),
            last_name: "Lind".into(),
            phone: Some("+3725550000".into()),
            role: UserRole::User,
        }
    }

    fn service(repos: Arc<InMemoryRepositoryProvider>) -> UserService {
        UserService::new(
            repos,
            Arc::new(CacheService::new(
                Arc::new(MemoryCacheStore::new()),
                CacheConfig::default(),
            )),
        )
    }

    #[tokio::test]
    async fn email_is_unique_on_create_and_update() {
        let svc = service(Arc::new(InMemoryRepositoryProvider::new()));
        svc.create(new_user("a@example.com")).await.unwrap();
        let b = svc.create(new_user("b@example.com")).await.unwrap();

        assert_eq!(
            svc.create(new_user("a@example.com")).await.unwrap_err().code(),
            "ALREADY_EXISTS"
        );
        let err = svc
            .update(
                b.id,
                UserPatch {
                    email: Some("a@example.com".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "ALREADY_EXISTS");
    }

    #[tokio::test]
    async fn delete_is_blocked_by_active_bookings() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let svc = service(repos.clone());
        let user = svc.create(new_user("c@example.com")).await.unwrap();
        let hotel = repos
            .hotels()
            .create(NewHotel {
                name: "H".into(),
                description: None,
                address: "A".into(),
                city: "C".into(),
                country: "K".into(),
                rating: 1.0,
            })
            .await
            .unwrap();
        let room = repos
            .rooms()
            .create(NewRoom {
                hotel_id: hotel.id,
                room_number: "1".into(),
                floor: 0,
                room_type: "single".into(),
                description: None,
                price_per_night: Decimal::from(50),
                capacity: 1,
                amenities: None,
                status: RoomStatus::Available,
            })
            .await
            .unwrap();
        let start = Utc::now();
        let stay = StayPeriod::new(start, start + Duration::days(2)).unwrap();
        let booking = repos
            .bookings()
            .create_occupying_room(NewBooking::new(
                user.id,
                hotel.id,
                room.id,
                stay,
                1,
                room.price_per_night,
                None,
            ))
            .await
            .unwrap();

        let err = svc.delete(user.id).await.unwrap_err();
        assert_eq!(
            err,
            DomainError::HasActiveBookings {
                entity: "User",
                id: user.id,
                count: 1
            }
        );

        let mut cancelled = booking.clone();
        cancelled.status = BookingStatus::Cancelled;
        repos
            .bookings()
            .commit(BookingChange {
                booking: cancelled,
                expected_status: BookingStatus::Confirmed,
                room_status: Some(RoomStatus::Available),
                revalidate_period: false,
            })
            .await
            .unwrap();

        assert_eq!(svc.delete(user.id).await.unwrap(), 1);
        assert!(svc.get(user.id).await.unwrap_err().is_not_found());
    }
}
