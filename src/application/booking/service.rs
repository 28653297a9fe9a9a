//! Booking workflow: creation, lookups, updates and status transitions
//!
//! Every mutation follows the same shape: validate against the store, write
//! the booking and its room atomically, then run side effects (cache
//! invalidation, counters, events) best-effort after the commit.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use super::availability::AvailabilityChecker;
use super::room_locks::RoomLocks;
use crate::application::cache::{keys, SharedCacheService};
use crate::application::events::EventDispatcher;
use crate::domain::events::{
    BookingEvent, EmailNotificationEvent, Event, NotificationKind, RoomStatusChangedEvent,
};
use crate::domain::{
    Booking, BookingAction, BookingChange, BookingDetails, BookingPatch, BookingStatus,
    DomainError, DomainResult, NewBooking, RepositoryProvider, Room, RoomStatus, StayPeriod,
    Transition,
};
use crate::shared::{PaginatedResult, PaginationParams};

/// Input for [`BookingService::create`]
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub user_id: i32,
    pub hotel_id: i32,
    pub room_id: i32,
    pub check_in_date: DateTime<Utc>,
    pub check_out_date: DateTime<Utc>,
    pub number_of_guests: i32,
    pub special_requests: Option<String>,
}

pub struct BookingService {
    repos: Arc<dyn RepositoryProvider>,
    availability: AvailabilityChecker,
    locks: Arc<RoomLocks>,
    cache: SharedCacheService,
    events: EventDispatcher,
}

impl BookingService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        locks: Arc<RoomLocks>,
        cache: SharedCacheService,
        events: EventDispatcher,
    ) -> Self {
        Self {
            availability: AvailabilityChecker::new(repos.clone()),
            repos,
            locks,
            cache,
            events,
        }
    }

    // ── Create ─────────────────────────────────────────────────

    #[instrument(skip(self, request), fields(user_id = request.user_id, room_id = request.room_id))]
    pub async fn create(&self, request: BookingRequest) -> DomainResult<Booking> {
        let user = self
            .repos
            .users()
            .find_by_id(request.user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", request.user_id))?;

        self.repos
            .hotels()
            .find_by_id(request.hotel_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Hotel", request.hotel_id))?;

        let room = self.load_room(request.room_id).await?;

        if room.hotel_id != request.hotel_id {
            return Err(DomainError::RoomHotelMismatch {
                room_id: room.id,
                hotel_id: request.hotel_id,
            });
        }
        if !room.is_available() {
            return Err(DomainError::RoomUnavailable {
                room_id: room.id,
                status: room.status,
            });
        }
        check_guests(request.number_of_guests, &room)?;

        let stay = StayPeriod::new(request.check_in_date, request.check_out_date)?;

        let booking = {
            let _guard = self.locks.lock(room.id).await;
            let room = self.load_room(room.id).await?;
            if !room.is_available() {
                return Err(DomainError::RoomUnavailable {
                    room_id: room.id,
                    status: room.status,
                });
            }
            self.availability.ensure_free(room.id, &stay, None).await?;

            let new_booking = NewBooking::new(
                user.id,
                request.hotel_id,
                room.id,
                stay,
                request.number_of_guests,
                room.price_per_night,
                request.special_requests,
            );
            self.repos
                .bookings()
                .create_occupying_room(new_booking)
                .await
                .inspect_err(count_conflict)?
        };

        info!(
            booking_id = booking.id,
            reference = %booking.booking_reference,
            nights = stay.nights(),
            total_price = %booking.total_price,
            "Booking created"
        );
        metrics::counter!("bookings_created_total").increment(1);

        self.cache
            .track_booking_created(booking.hotel_id, booking.room_id)
            .await;
        self.cache.invalidate_user(booking.user_id).await;
        self.cache.invalidate_hotel(booking.hotel_id).await;

        self.events
            .publish(Event::BookingCreated(BookingEvent::from(&booking)))
            .await;
        self.publish_room_change(&room, RoomStatus::Occupied).await;
        self.events
            .publish(Event::EmailNotification(EmailNotificationEvent::new(
                NotificationKind::BookingConfirmation,
                &booking,
                &user,
            )))
            .await;

        Ok(booking)
    }

    // ── Reads ──────────────────────────────────────────────────

    /// Booking with its user, hotel and room; served from cache when present.
    pub async fn get(&self, id: i32) -> DomainResult<BookingDetails> {
        let key = keys::booking(id);
        if let Some(details) = self.cache.get_json::<BookingDetails>(&key).await {
            return Ok(details);
        }

        let booking = self.load_booking(id).await?;
        let details = self.details(booking).await?;

        self.cache
            .set_json(&key, &details, self.cache.booking_ttl())
            .await;
        Ok(details)
    }

    pub async fn find_by_reference(&self, reference: &str) -> DomainResult<Booking> {
        self.repos
            .bookings()
            .find_by_reference(reference)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "Booking",
                field: "booking_reference",
                value: reference.to_string(),
            })
    }

    pub async fn list(&self, page: PaginationParams) -> DomainResult<PaginatedResult<Booking>> {
        self.repos.bookings().list(page).await
    }

    pub async fn list_for_user(&self, user_id: i32) -> DomainResult<Vec<Booking>> {
        let key = keys::user_bookings(user_id);
        if let Some(bookings) = self.cache.get_json::<Vec<Booking>>(&key).await {
            return Ok(bookings);
        }

        if self.repos.users().find_by_id(user_id).await?.is_none() {
            return Err(DomainError::not_found("User", user_id));
        }
        let bookings = self.repos.bookings().list_for_user(user_id).await?;

        self.cache
            .set_json(&key, &bookings, self.cache.user_bookings_ttl())
            .await;
        Ok(bookings)
    }

    // ── Update ─────────────────────────────────────────────────

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: i32, patch: BookingPatch) -> DomainResult<Booking> {
        let room_id = self.load_booking(id).await?.room_id;
        let guard = self.locks.lock(room_id).await;
        let mut booking = self.load_booking(id).await?;
        let expected_status = booking.status;
        if booking.status.is_terminal() {
            return Err(DomainError::BookingImmutable {
                status: booking.status,
            });
        }

        let transition = match patch.status {
            Some(target) if target != booking.status => {
                let action = BookingStatus::action_towards(target).ok_or(
                    DomainError::InvalidTransition {
                        from: booking.status,
                        action: "revert",
                    },
                )?;
                Some((action, booking.status.apply(action)?))
            }
            _ => None,
        };

        let changes_dates = patch.changes_dates();
        let room = self.load_room(booking.room_id).await?;

        if let Some(guests) = patch.number_of_guests {
            check_guests(guests, &room)?;
            booking.number_of_guests = guests;
        }
        if let Some(requests) = patch.special_requests {
            booking.special_requests = Some(requests);
        }

        let mut new_stay = None;
        if changes_dates {
            let stay = StayPeriod::new(
                patch.check_in_date.unwrap_or(booking.check_in_date),
                patch.check_out_date.unwrap_or(booking.check_out_date),
            )?;
            booking.check_in_date = stay.check_in();
            booking.check_out_date = stay.check_out();
            booking.total_price = stay.total_price(room.price_per_night);
            new_stay = Some(stay);
        }

        let room_status = transition.and_then(|(_, t)| t.room_status);
        if let Some((_, t)) = transition {
            booking.status = t.to;
        }

        let revalidate = match new_stay {
            Some(stay) if booking.status.is_active() => {
                self.availability
                    .ensure_free(booking.room_id, &stay, Some(booking.id))
                    .await?;
                true
            }
            _ => false,
        };
        let saved = self
            .commit(booking, expected_status, room_status, revalidate)
            .await?;
        drop(guard);

        info!(booking_id = saved.id, status = %saved.status, "Booking updated");

        self.cache.invalidate_booking(saved.id).await;
        self.cache.invalidate_user(saved.user_id).await;
        if room_status.is_some() || new_stay.is_some() {
            self.cache.invalidate_hotel(saved.hotel_id).await;
        }

        self.events
            .publish(Event::BookingUpdated(BookingEvent::from(&saved)))
            .await;
        if let Some((action, t)) = transition {
            self.after_transition(action, t, &saved, &room).await;
        }

        Ok(saved)
    }

    // ── Transitions ────────────────────────────────────────────

    pub async fn cancel(&self, id: i32) -> DomainResult<Booking> {
        self.transition(id, BookingAction::Cancel).await
    }

    pub async fn check_in(&self, id: i32) -> DomainResult<Booking> {
        self.transition(id, BookingAction::CheckIn).await
    }

    pub async fn check_out(&self, id: i32) -> DomainResult<Booking> {
        self.transition(id, BookingAction::CheckOut).await
    }

    #[instrument(skip(self), fields(action = action.as_str()))]
    async fn transition(&self, id: i32, action: BookingAction) -> DomainResult<Booking> {
        let room_id = self.load_booking(id).await?.room_id;
        let (t, saved, room) = {
            let _guard = self.locks.lock(room_id).await;
            let mut booking = self.load_booking(id).await?;
            let expected_status = booking.status;
            let t = booking.status.apply(action)?;
            let room = self.load_room(booking.room_id).await?;

            booking.status = t.to;
            let saved = self
                .commit(booking, expected_status, t.room_status, false)
                .await?;
            (t, saved, room)
        };

        info!(booking_id = saved.id, status = %saved.status, "Booking status changed");

        self.cache.invalidate_booking(saved.id).await;
        self.cache.invalidate_user(saved.user_id).await;
        if t.room_status.is_some() {
            self.cache.invalidate_hotel(saved.hotel_id).await;
        }

        self.after_transition(action, t, &saved, &room).await;
        Ok(saved)
    }

    async fn after_transition(
        &self,
        action: BookingAction,
        t: Transition,
        booking: &Booking,
        room: &Room,
    ) {
        metrics::counter!("booking_transitions_total", "action" => action.as_str()).increment(1);

        let payload = BookingEvent::from(booking);
        let event = match action {
            BookingAction::CheckIn => Event::BookingCheckedIn(payload),
            BookingAction::CheckOut => Event::BookingCheckedOut(payload),
            BookingAction::Cancel => Event::BookingCancelled(payload),
        };
        self.events.publish(event).await;

        if let Some(status) = t.room_status {
            self.publish_room_change(room, status).await;
        }

        if action == BookingAction::Cancel {
            match self.repos.users().find_by_id(booking.user_id).await {
                Ok(Some(user)) => {
                    self.events
                        .publish(Event::EmailNotification(EmailNotificationEvent::new(
                            NotificationKind::BookingCancellation,
                            booking,
                            &user,
                        )))
                        .await
                }
                Ok(None) => {}
                Err(e) => warn!(error = %e, "Skipping cancellation notification"),
            }
        }
    }

    // ── Helpers ────────────────────────────────────────────────

    async fn commit(
        &self,
        booking: Booking,
        expected_status: BookingStatus,
        room_status: Option<RoomStatus>,
        revalidate_period: bool,
    ) -> DomainResult<Booking> {
        self.repos
            .bookings()
            .commit(BookingChange {
                booking,
                expected_status,
                room_status,
                revalidate_period,
            })
            .await
            .inspect_err(count_conflict)
    }

    async fn load_booking(&self, id: i32) -> DomainResult<Booking> {
        self.repos
            .bookings()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", id))
    }

    async fn load_room(&self, id: i32) -> DomainResult<Room> {
        self.repos
            .rooms()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Room", id))
    }

    async fn details(&self, booking: Booking) -> DomainResult<BookingDetails> {
        let user = self
            .repos
            .users()
            .find_by_id(booking.user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", booking.user_id))?;
        let hotel = self
            .repos
            .hotels()
            .find_by_id(booking.hotel_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Hotel", booking.hotel_id))?;
        let room = self.load_room(booking.room_id).await?;
        Ok(BookingDetails {
            booking,
            user,
            hotel,
            room,
        })
    }

    async fn publish_room_change(&self, room: &Room, new_status: RoomStatus) {
        if room.status == new_status {
            return;
        }
        self.events
            .publish(Event::RoomStatusChanged(RoomStatusChangedEvent {
                room_id: room.id,
                hotel_id: room.hotel_id,
                old_status: room.status,
                new_status,
            }))
            .await;
    }
}

fn check_guests(requested: i32, room: &Room) -> DomainResult<()> {
    if requested < 1 {
        return Err(DomainError::Validation(
            "number_of_guests must be at least 1".into(),
        ));
    }
    if requested > room.capacity {
        return Err(DomainError::CapacityExceeded {
            capacity: room.capacity,
            requested,
        });
    }
    Ok(())
}

fn count_conflict(e: &DomainError) {
    if matches!(e, DomainError::DateConflict { .. }) {
        metrics::counter!("booking_conflicts_total").increment(1);
    }
}
