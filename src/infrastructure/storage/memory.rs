//! In-memory repositories for development and testing
//!
//! All four aggregates live behind one mutex so that multi-table writes
//! (booking plus room status, cascading deletes) are atomic exactly like the
//! database transactions they stand in for.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    Booking, BookingChange, BookingRepository, BookingStatus, DomainError, DomainResult, Hotel,
    HotelDeletion, HotelFilter, HotelRepository, NewBooking, NewHotel, NewRoom, NewUser,
    RepositoryProvider, Room, RoomBookingQuery, RoomFilter, RoomRepository, RoomStatus,
    StayPeriod, User, UserRepository,
};
use crate::shared::{PaginatedResult, PaginationParams};

#[derive(Default)]
struct Tables {
    hotels: BTreeMap<i32, Hotel>,
    rooms: BTreeMap<i32, Room>,
    users: BTreeMap<i32, User>,
    bookings: BTreeMap<i32, Booking>,
    last_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }

    fn first_conflict(
        &self,
        room_id: i32,
        stay: &StayPeriod,
        excluding: Option<i32>,
    ) -> Option<&Booking> {
        self.bookings
            .values()
            .filter(|b| Some(b.id) != excluding)
            .find(|b| b.blocks(room_id, stay))
    }

    fn remove_bookings_where(&mut self, pred: impl Fn(&Booking) -> bool) -> u64 {
        let before = self.bookings.len();
        self.bookings.retain(|_, b| !pred(b));
        (before - self.bookings.len()) as u64
    }
}

fn paginate<T: Clone>(items: Vec<T>, page: PaginationParams) -> PaginatedResult<T> {
    let total = items.len() as u64;
    let slice = items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit as usize)
        .collect();
    PaginatedResult::new(slice, total, page.page, page.limit)
}

/// Repository provider keeping every table in process memory
#[derive(Default)]
pub struct InMemoryRepositoryProvider {
    tables: Mutex<Tables>,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> DomainResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| DomainError::Storage("in-memory store poisoned".into()))
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn hotels(&self) -> &dyn HotelRepository {
        self
    }

    fn rooms(&self) -> &dyn RoomRepository {
        self
    }

    fn users(&self) -> &dyn UserRepository {
        self
    }

    fn bookings(&self) -> &dyn BookingRepository {
        self
    }
}

// ── Hotels ─────────────────────────────────────────────────────

#[async_trait]
impl HotelRepository for InMemoryRepositoryProvider {
    async fn create(&self, hotel: NewHotel) -> DomainResult<Hotel> {
        let mut t = self.tables()?;
        let hotel = Hotel {
            id: t.next_id(),
            name: hotel.name,
            description: hotel.description,
            address: hotel.address,
            city: hotel.city,
            country: hotel.country,
            rating: hotel.rating,
            created_at: Utc::now(),
        };
        t.hotels.insert(hotel.id, hotel.clone());
        Ok(hotel)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Hotel>> {
        Ok(self.tables()?.hotels.get(&id).cloned())
    }

    async fn list(
        &self,
        filter: &HotelFilter,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<Hotel>> {
        let t = self.tables()?;
        let items = t
            .hotels
            .values()
            .filter(|h| filter.city.as_ref().map_or(true, |c| &h.city == c))
            .filter(|h| filter.country.as_ref().map_or(true, |c| &h.country == c))
            .cloned()
            .collect();
        Ok(paginate(items, page))
    }

    async fn update(&self, hotel: Hotel) -> DomainResult<Hotel> {
        let mut t = self.tables()?;
        match t.hotels.get_mut(&hotel.id) {
            Some(slot) => {
                *slot = hotel.clone();
                Ok(hotel)
            }
            None => Err(DomainError::not_found("Hotel", hotel.id)),
        }
    }

    async fn delete(&self, id: i32) -> DomainResult<HotelDeletion> {
        let mut t = self.tables()?;
        if t.hotels.remove(&id).is_none() {
            return Err(DomainError::not_found("Hotel", id));
        }
        let bookings_deleted = t.remove_bookings_where(|b| b.hotel_id == id);
        let before = t.rooms.len();
        t.rooms.retain(|_, r| r.hotel_id != id);
        Ok(HotelDeletion {
            hotel_id: id,
            rooms_deleted: (before - t.rooms.len()) as u64,
            bookings_deleted,
        })
    }
}

// ── Rooms ──────────────────────────────────────────────────────

#[async_trait]
impl RoomRepository for InMemoryRepositoryProvider {
    async fn create(&self, room: NewRoom) -> DomainResult<Room> {
        let mut t = self.tables()?;
        if !t.hotels.contains_key(&room.hotel_id) {
            return Err(DomainError::Validation(format!(
                "Referenced entity does not exist: hotel {}",
                room.hotel_id
            )));
        }
        if t
            .rooms
            .values()
            .any(|r| r.hotel_id == room.hotel_id && r.room_number == room.room_number)
        {
            return Err(DomainError::Conflict(format!(
                "room number {} in hotel {}",
                room.room_number, room.hotel_id
            )));
        }
        let room = Room {
            id: t.next_id(),
            hotel_id: room.hotel_id,
            room_number: room.room_number,
            floor: room.floor,
            room_type: room.room_type,
            description: room.description,
            price_per_night: room.price_per_night,
            capacity: room.capacity,
            amenities: room.amenities,
            status: room.status,
            created_at: Utc::now(),
        };
        t.rooms.insert(room.id, room.clone());
        Ok(room)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Room>> {
        Ok(self.tables()?.rooms.get(&id).cloned())
    }

    async fn find_by_number(
        &self,
        hotel_id: i32,
        room_number: &str,
    ) -> DomainResult<Option<Room>> {
        Ok(self
            .tables()?
            .rooms
            .values()
            .find(|r| r.hotel_id == hotel_id && r.room_number == room_number)
            .cloned())
    }

    async fn list(
        &self,
        filter: &RoomFilter,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<Room>> {
        let items = self.find_all(filter).await?;
        Ok(paginate(items, page))
    }

    async fn find_all(&self, filter: &RoomFilter) -> DomainResult<Vec<Room>> {
        Ok(self
            .tables()?
            .rooms
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    async fn update(&self, mut room: Room, write_status: bool) -> DomainResult<Room> {
        let mut t = self.tables()?;
        if t.rooms.values().any(|r| {
            r.id != room.id && r.hotel_id == room.hotel_id && r.room_number == room.room_number
        }) {
            return Err(DomainError::Conflict(format!(
                "room number {} in hotel {}",
                room.room_number, room.hotel_id
            )));
        }
        match t.rooms.get_mut(&room.id) {
            Some(slot) => {
                if !write_status {
                    room.status = slot.status;
                }
                *slot = room.clone();
                Ok(room)
            }
            None => Err(DomainError::not_found("Room", room.id)),
        }
    }

    async fn set_status(&self, id: i32, status: RoomStatus) -> DomainResult<()> {
        let mut t = self.tables()?;
        let room = t
            .rooms
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("Room", id))?;
        room.status = status;
        Ok(())
    }

    async fn delete(&self, id: i32) -> DomainResult<u64> {
        let mut t = self.tables()?;
        if t.rooms.remove(&id).is_none() {
            return Err(DomainError::not_found("Room", id));
        }
        Ok(t.remove_bookings_where(|b| b.room_id == id))
    }
}

// ── Users ──────────────────────────────────────────────────────

#[async_trait]
impl UserRepository for InMemoryRepositoryProvider {
    async fn create(&self, user: NewUser) -> DomainResult<User> {
        let mut t = self.tables()?;
        if t.users.values().any(|u| u.email == user.email) {
            return Err(DomainError::Conflict(format!("email {}", user.email)));
        }
        let user = User {
            id: t.next_id(),
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            role: user.role,
            created_at: Utc::now(),
        };
        t.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        Ok(self.tables()?.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        Ok(self
            .tables()?
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list(&self, page: PaginationParams) -> DomainResult<PaginatedResult<User>> {
        let items = self.tables()?.users.values().cloned().collect();
        Ok(paginate(items, page))
    }

    async fn update(&self, user: User) -> DomainResult<User> {
        let mut t = self.tables()?;
        if t
            .users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(DomainError::Conflict(format!("email {}", user.email)));
        }
        match t.users.get_mut(&user.id) {
            Some(slot) => {
                *slot = user.clone();
                Ok(user)
            }
            None => Err(DomainError::not_found("User", user.id)),
        }
    }

    async fn delete(&self, id: i32) -> DomainResult<u64> {
        let mut t = self.tables()?;
        if t.users.remove(&id).is_none() {
            return Err(DomainError::not_found("User", id));
        }
        Ok(t.remove_bookings_where(|b| b.user_id == id))
    }
}

// ── Bookings ───────────────────────────────────────────────────

#[async_trait]
impl BookingRepository for InMemoryRepositoryProvider {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Booking>> {
        Ok(self.tables()?.bookings.get(&id).cloned())
    }

    async fn find_by_reference(&self, reference: &str) -> DomainResult<Option<Booking>> {
        Ok(self
            .tables()?
            .bookings
            .values()
            .find(|b| b.booking_reference == reference)
            .cloned())
    }

    async fn list(&self, page: PaginationParams) -> DomainResult<PaginatedResult<Booking>> {
        let items = self.tables()?.bookings.values().rev().cloned().collect();
        Ok(paginate(items, page))
    }

    async fn list_for_user(&self, user_id: i32) -> DomainResult<Vec<Booking>> {
        Ok(self
            .tables()?
            .bookings
            .values()
            .rev()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_for_room(
        &self,
        room_id: i32,
        query: &RoomBookingQuery,
    ) -> DomainResult<Vec<Booking>> {
        let mut items: Vec<Booking> = self
            .tables()?
            .bookings
            .values()
            .filter(|b| b.room_id == room_id && query.matches(b))
            .cloned()
            .collect();
        items.sort_by_key(|b| (b.check_in_date, b.id));
        Ok(items)
    }

    async fn find_conflicting(
        &self,
        room_id: i32,
        stay: &StayPeriod,
        excluding: Option<i32>,
    ) -> DomainResult<Option<Booking>> {
        Ok(self
            .tables()?
            .first_conflict(room_id, stay, excluding)
            .cloned())
    }

    async fn count_active_for_user(&self, user_id: i32) -> DomainResult<u64> {
        Ok(self
            .tables()?
            .bookings
            .values()
            .filter(|b| b.user_id == user_id && b.is_active())
            .count() as u64)
    }

    async fn create_occupying_room(&self, booking: NewBooking) -> DomainResult<Booking> {
        let mut t = self.tables()?;
        if !t.users.contains_key(&booking.user_id) || !t.hotels.contains_key(&booking.hotel_id) {
            return Err(DomainError::Validation(
                "Referenced entity does not exist".into(),
            ));
        }
        let room = t
            .rooms
            .get(&booking.room_id)
            .ok_or_else(|| DomainError::not_found("Room", booking.room_id))?;
        if !room.is_available() {
            return Err(DomainError::RoomUnavailable {
                room_id: room.id,
                status: room.status,
            });
        }
        if t.first_conflict(booking.room_id, &booking.stay, None).is_some() {
            return Err(DomainError::DateConflict {
                room_id: booking.room_id,
            });
        }

        let created = Booking {
            id: t.next_id(),
            booking_reference: booking.booking_reference,
            user_id: booking.user_id,
            hotel_id: booking.hotel_id,
            room_id: booking.room_id,
            check_in_date: booking.stay.check_in(),
            check_out_date: booking.stay.check_out(),
            number_of_guests: booking.number_of_guests,
            total_price: booking.total_price,
            status: BookingStatus::Confirmed,
            special_requests: booking.special_requests,
            created_at: Utc::now(),
        };
        t.bookings.insert(created.id, created.clone());
        if let Some(room) = t.rooms.get_mut(&created.room_id) {
            room.status = RoomStatus::Occupied;
        }
        Ok(created)
    }

    async fn commit(&self, change: BookingChange) -> DomainResult<Booking> {
        let mut t = self.tables()?;
        let stored = t
            .bookings
            .get(&change.booking.id)
            .ok_or_else(|| DomainError::not_found("Booking", change.booking.id))?;
        change.check_stored(stored.status)?;
        let booking = change.booking;
        if change.revalidate_period {
            let stay = booking.stay()?;
            if t.first_conflict(booking.room_id, &stay, Some(booking.id)).is_some() {
                return Err(DomainError::DateConflict {
                    room_id: booking.room_id,
                });
            }
        }
        if let Some(status) = change.room_status {
            let room = t
                .rooms
                .get_mut(&booking.room_id)
                .ok_or_else(|| DomainError::not_found("Room", booking.room_id))?;
            room.status = status;
        }
        t.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }
}
