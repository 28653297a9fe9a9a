//! Booking repository interface

use async_trait::async_trait;

use super::model::{Booking, NewBooking};
use super::period::StayPeriod;
use super::state::BookingStatus;
use crate::domain::room::RoomStatus;
use crate::shared::{DomainError, DomainResult, PaginatedResult, PaginationParams};

/// Narrowing for a room's booking history
#[derive(Debug, Clone, Default)]
pub struct RoomBookingQuery {
    /// Keep bookings overlapping this stay
    pub period: Option<StayPeriod>,
    /// Keep bookings in one of these statuses; empty means any
    pub statuses: Vec<BookingStatus>,
}

impl RoomBookingQuery {
    pub fn matches(&self, booking: &Booking) -> bool {
        let in_period = self.period.map_or(true, |p| {
            super::period::overlaps(
                booking.check_in_date,
                booking.check_out_date,
                p.check_in(),
                p.check_out(),
            )
        });
        in_period && (self.statuses.is_empty() || self.statuses.contains(&booking.status))
    }
}

/// A booking write plus the room status it implies, committed together.
#[derive(Debug, Clone)]
pub struct BookingChange {
    pub booking: Booking,
    /// Status the change was computed from; the write is refused if the
    /// stored row has moved on
    pub expected_status: BookingStatus,
    pub room_status: Option<RoomStatus>,
    /// Re-run the overlap check (excluding this booking) under the room lock
    pub revalidate_period: bool,
}

impl BookingChange {
    /// Reject the write when the stored status differs from `expected_status`.
    pub fn check_stored(&self, stored: BookingStatus) -> DomainResult<()> {
        if stored == self.expected_status {
            Ok(())
        } else if stored.is_terminal() {
            Err(DomainError::BookingImmutable { status: stored })
        } else {
            Err(DomainError::InvalidTransition {
                from: stored,
                action: "update",
            })
        }
    }
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Booking>>;

    async fn find_by_reference(&self, reference: &str) -> DomainResult<Option<Booking>>;

    /// All bookings, newest first
    async fn list(&self, page: PaginationParams) -> DomainResult<PaginatedResult<Booking>>;

    /// A user's bookings, newest first
    async fn list_for_user(&self, user_id: i32) -> DomainResult<Vec<Booking>>;

    /// A room's bookings ordered by check-in
    async fn list_for_room(
        &self,
        room_id: i32,
        query: &RoomBookingQuery,
    ) -> DomainResult<Vec<Booking>>;

    /// First active booking on the room overlapping `stay`
    async fn find_conflicting(
        &self,
        room_id: i32,
        stay: &StayPeriod,
        excluding: Option<i32>,
    ) -> DomainResult<Option<Booking>>;

    async fn count_active_for_user(&self, user_id: i32) -> DomainResult<u64>;

    /// Insert a Confirmed booking and mark its room Occupied atomically.
    ///
    /// Fails with `RoomUnavailable` if the room left Available, or with
    /// `DateConflict` if an overlapping active booking appeared, between the
    /// caller's checks and the write.
    async fn create_occupying_room(&self, booking: NewBooking) -> DomainResult<Booking>;

    /// Persist a booking change and the optional room status atomically.
    ///
    /// Refused via [`BookingChange::check_stored`] when another writer changed
    /// the booking's status first.
    async fn commit(&self, change: BookingChange) -> DomainResult<Booking>;
}
