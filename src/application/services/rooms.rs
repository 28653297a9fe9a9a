//! Room inventory and operational status

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::application::booking::{AvailabilityChecker, RoomLocks, RoomMatch, RoomSearch};
use crate::application::cache::{keys, QueryShape, SharedCacheService};
use crate::application::events::EventDispatcher;
use crate::domain::events::{BookingEvent, Event, RoomStatusChangedEvent};
use crate::domain::{
    Booking, BookingStatus, DomainError, DomainResult, NewRoom, RepositoryProvider, Room,
    RoomBookingQuery, RoomFilter, RoomPatch, RoomStatus, StayPeriod,
};
use crate::shared::{PaginatedResult, PaginationParams};

pub struct RoomService {
    repos: Arc<dyn RepositoryProvider>,
    availability: AvailabilityChecker,
    locks: Arc<RoomLocks>,
    cache: SharedCacheService,
    events: EventDispatcher,
}

impl RoomService {
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

    pub async fn create(&self, room: NewRoom) -> DomainResult<Room> {
        check_room_terms(room.price_per_night, room.capacity)?;
        if self.repos.hotels().find_by_id(room.hotel_id).await?.is_none() {
            return Err(DomainError::not_found("Hotel", room.hotel_id));
        }
        if self
            .repos
            .rooms()
            .find_by_number(room.hotel_id, &room.room_number)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(format!(
                "Room {} already exists in hotel {}",
                room.room_number, room.hotel_id
            )));
        }

        let room = self.repos.rooms().create(room).await?;
        info!(
            room_id = room.id,
            hotel_id = room.hotel_id,
            number = %room.room_number,
            "Room created"
        );
        self.cache.invalidate_hotel(room.hotel_id).await;
        Ok(room)
    }

    pub async fn get(&self, id: i32) -> DomainResult<Room> {
        self.load(id).await
    }

    pub async fn list(
        &self,
        filter: RoomFilter,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<Room>> {
        self.repos.rooms().list(&filter, page).await
    }

    pub async fn update(&self, id: i32, patch: RoomPatch) -> DomainResult<Room> {
        let mut room = self.load(id).await?;
        let old_status = room.status;
        let write_status = patch.status.is_some();
        room.apply(patch);
        check_room_terms(room.price_per_night, room.capacity)?;

        let room = self.repos.rooms().update(room, write_status).await?;
        self.cache.invalidate_hotel(room.hotel_id).await;
        if write_status {
            self.publish_status_change(&room, old_status).await;
        }
        Ok(room)
    }

    /// Set the operational status directly.
    ///
    /// Not booking-aware: marking a room with an active booking Available
    /// lets the next creation pass the status gate; the interval check still
    /// prevents overlaps.
    pub async fn set_status(&self, id: i32, status: RoomStatus) -> DomainResult<Room> {
        let mut room = self.load(id).await?;
        let old_status = room.status;
        self.repos.rooms().set_status(id, status).await?;
        room.status = status;

        info!(room_id = id, from = %old_status, to = %status, "Room status set");
        self.cache.invalidate_hotel(room.hotel_id).await;
        self.publish_status_change(&room, old_status).await;
        Ok(room)
    }

    /// Housekeeping done: Cleaning -> Available.
    pub async fn mark_clean(&self, id: i32) -> DomainResult<Room> {
        let room = self.load(id).await?;
        if room.status != RoomStatus::Cleaning {
            return Err(DomainError::InvalidRoomStatus {
                room_id: id,
                status: room.status,
                expected: RoomStatus::Cleaning,
            });
        }
        self.set_status(id, RoomStatus::Available).await
    }

    /// Delete the room and its bookings; active bookings are announced as cancelled.
    pub async fn delete(&self, id: i32) -> DomainResult<u64> {
        let room = self.load(id).await?;
        let bookings = self
            .repos
            .bookings()
            .list_for_room(id, &RoomBookingQuery::default())
            .await?;

        let removed = self.repos.rooms().delete(id).await?;
        self.locks.remove(id);
        info!(room_id = id, bookings_deleted = removed, "Room deleted");

        self.cache.invalidate_hotel(room.hotel_id).await;
        for booking in &bookings {
            self.cache.invalidate_booking(booking.id).await;
            self.cache.invalidate_user(booking.user_id).await;
        }
        for booking in bookings.iter().filter(|b| b.is_active()) {
            let mut cancelled: Booking = booking.clone();
            cancelled.status = BookingStatus::Cancelled;
            self.events
                .publish(Event::BookingCancelled(BookingEvent::from(&cancelled)))
                .await;
        }
        Ok(removed)
    }

    /// Available rooms of a hotel free for the whole stay. Cached per query shape.
    pub async fn search_available(
        &self,
        hotel_id: i32,
        stay: StayPeriod,
        filter: RoomFilter,
    ) -> DomainResult<Vec<Room>> {
        if self.repos.hotels().find_by_id(hotel_id).await?.is_none() {
            return Err(DomainError::not_found("Hotel", hotel_id));
        }

        let key = keys::room_search(
            hotel_id,
            &QueryShape::new()
                .with("check_in", stay.check_in().to_rfc3339())
                .with("check_out", stay.check_out().to_rfc3339())
                .with_opt("room_type", filter.room_type.as_deref())
                .with_opt("min_price", filter.min_price)
                .with_opt("max_price", filter.max_price)
                .with_opt("min_capacity", filter.min_capacity),
        );
        if let Some(rooms) = self.cache.get_json::<Vec<Room>>(&key).await {
            return Ok(rooms);
        }

        let rooms = self
            .availability
            .available_rooms(hotel_id, &stay, filter)
            .await?;
        self.cache
            .set_json(&key, &rooms, self.cache.room_search_ttl())
            .await;
        Ok(rooms)
    }

    /// Available rooms across hotels with their hotel. Not cached.
    pub async fn search_all(&self, search: RoomSearch) -> DomainResult<Vec<RoomMatch>> {
        self.availability.search(&search).await
    }

    pub async fn bookings(
        &self,
        room_id: i32,
        query: RoomBookingQuery,
    ) -> DomainResult<Vec<Booking>> {
        self.load(room_id).await?;
        self.repos.bookings().list_for_room(room_id, &query).await
    }

    async fn load(&self, id: i32) -> DomainResult<Room> {
        self.repos
            .rooms()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Room", id))
    }

    async fn publish_status_change(&self, room: &Room, old_status: RoomStatus) {
        if room.status == old_status {
            return;
        }
        if room.status == RoomStatus::Available {
            if let Ok(active) = self
                .repos
                .bookings()
                .list_for_room(
                    room.id,
                    &RoomBookingQuery {
                        period: None,
                        statuses: BookingStatus::ACTIVE.to_vec(),
                    },
                )
                .await
            {
                if !active.is_empty() {
                    warn!(
                        room_id = room.id,
                        active_bookings = active.len(),
                        "Room marked available while holding active bookings"
                    );
                }
            }
        }
        self.events
            .publish(Event::RoomStatusChanged(RoomStatusChangedEvent {
                room_id: room.id,
                hotel_id: room.hotel_id,
                old_status,
                new_status: room.status,
            }))
            .await;
    }
}

fn check_room_terms(price: Decimal, capacity: i32) -> DomainResult<()> {
    if price <= Decimal::ZERO {
        return Err(DomainError::Validation(
            "price_per_night must be positive".into(),
        ));
    }
    if capacity < 1 {
        return Err(DomainError::Validation("capacity must be at least 1".into()));
    }
    Ok(())
}
