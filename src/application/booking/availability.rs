//! Date-range availability of rooms

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{
    DomainError, DomainResult, Hotel, RepositoryProvider, Room, RoomFilter, RoomStatus,
    StayPeriod,
};

/// Search across hotels. Text fields match case-insensitive substrings;
/// without a stay only the room status is checked.
#[derive(Debug, Clone, Default)]
pub struct RoomSearch {
    pub city: Option<String>,
    pub country: Option<String>,
    pub room_type: Option<String>,
    pub guests: Option<i32>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub stay: Option<StayPeriod>,
}

/// A search hit with the hotel it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomMatch {
    pub room: Room,
    pub hotel: Hotel,
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    needle.map_or(true, |n| {
        haystack.to_lowercase().contains(&n.to_lowercase())
    })
}

/// Answers "is this room free for these dates" against active bookings.
#[derive(Clone)]
pub struct AvailabilityChecker {
    repos: Arc<dyn RepositoryProvider>,
}

impl AvailabilityChecker {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn has_conflict(
        &self,
        room_id: i32,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
        excluding: Option<i32>,
    ) -> DomainResult<bool> {
        let stay = StayPeriod::new(check_in, check_out)?;
        Ok(self
            .repos
            .bookings()
            .find_conflicting(room_id, &stay, excluding)
            .await?
            .is_some())
    }

    /// `DateConflict` if an active booking other than `excluding` overlaps `stay`.
    pub async fn ensure_free(
        &self,
        room_id: i32,
        stay: &StayPeriod,
        excluding: Option<i32>,
    ) -> DomainResult<()> {
        match self
            .repos
            .bookings()
            .find_conflicting(room_id, stay, excluding)
            .await?
        {
            Some(existing) => {
                debug!(
                    room_id,
                    conflicting_booking = existing.id,
                    "Requested stay overlaps an active booking"
                );
                metrics::counter!("booking_conflicts_total").increment(1);
                Err(DomainError::DateConflict { room_id })
            }
            None => Ok(()),
        }
    }

    /// Available rooms of `hotel_id` with no active booking overlapping `stay`.
    ///
    /// `filter.hotel_id` and `filter.status` are overridden.
    pub async fn available_rooms(
        &self,
        hotel_id: i32,
        stay: &StayPeriod,
        mut filter: RoomFilter,
    ) -> DomainResult<Vec<Room>> {
        filter.hotel_id = Some(hotel_id);
        filter.status = Some(RoomStatus::Available);

        let candidates = self.repos.rooms().find_all(&filter).await?;
        let mut free = Vec::with_capacity(candidates.len());
        for room in candidates {
            if self
                .repos
                .bookings()
                .find_conflicting(room.id, stay, None)
                .await?
                .is_none()
            {
                free.push(room);
            }
        }
        Ok(free)
    }

    /// Available rooms in any hotel matching `search`, ordered by room id.
    pub async fn search(&self, search: &RoomSearch) -> DomainResult<Vec<RoomMatch>> {
        let filter = RoomFilter {
            status: Some(RoomStatus::Available),
            min_price: search.min_price,
            max_price: search.max_price,
            min_capacity: search.guests,
            ..Default::default()
        };
        let candidates = self.repos.rooms().find_all(&filter).await?;

        let mut hotels: HashMap<i32, Option<Hotel>> = HashMap::new();
        let mut found = Vec::new();
        for room in candidates {
            if !contains_ignore_case(&room.room_type, search.room_type.as_deref()) {
                continue;
            }
            if !hotels.contains_key(&room.hotel_id) {
                let hotel = self.repos.hotels().find_by_id(room.hotel_id).await?;
                hotels.insert(room.hotel_id, hotel);
            }
            let Some(Some(hotel)) = hotels.get(&room.hotel_id) else {
                continue;
            };
            if !contains_ignore_case(&hotel.city, search.city.as_deref())
                || !contains_ignore_case(&hotel.country, search.country.as_deref())
            {
                continue;
            }
            if let Some(stay) = &search.stay {
                if self
                    .has_conflict(room.id, stay.check_in(), stay.check_out(), None)
                    .await?
                {
                    continue;
                }
            }
            let hotel = hotel.clone();
            found.push(RoomMatch { room, hotel });
        }
        debug!(matches = found.len(), "Cross-hotel room search");
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        BookingChange, BookingStatus, NewBooking, NewHotel, NewRoom, NewUser, UserRole,
    };
    use crate::infrastructure::storage::InMemoryRepositoryProvider;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, d, 12, 0, 0).unwrap()
    }

    fn stay(a: u32, b: u32) -> StayPeriod {
        StayPeriod::new(day(a), day(b)).unwrap()
    }

    struct World {
        repos: Arc<InMemoryRepositoryProvider>,
        checker: AvailabilityChecker,
        user_id: i32,
    }

    async fn world() -> World {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let user = repos
            .users()
            .create(NewUser {
                email: "kaja@example.com".into(),
                first_name: "Kaja".into(),
                last_name: "Nowak".into(),
                phone: None,
                role: UserRole::User,
            })
            .await
            .unwrap();
        World {
            checker: AvailabilityChecker::new(repos.clone()),
            repos,
            user_id: user.id,
        }
    }

    async fn hotel(w: &World, city: &str, country: &str) -> Hotel {
        w.repos
            .hotels()
            .create(NewHotel {
                name: format!("{} Grand", city),
                description: None,
                address: "Rynek 1".into(),
                city: city.into(),
                country: country.into(),
                rating: 4.0,
            })
            .await
            .unwrap()
    }

    async fn room(w: &World, hotel_id: i32, number: &str, room_type: &str, capacity: i32) -> Room {
        w.repos
            .rooms()
            .create(NewRoom {
                hotel_id,
                room_number: number.into(),
                floor: 1,
                room_type: room_type.into(),
                description: None,
                price_per_night: Decimal::from(120),
                capacity,
                amenities: None,
                status: RoomStatus::Available,
            })
            .await
            .unwrap()
    }

    async fn book(w: &World, room: &Room, period: StayPeriod) -> crate::domain::Booking {
        w.repos
            .bookings()
            .create_occupying_room(NewBooking::new(
                w.user_id,
                room.hotel_id,
                room.id,
                period,
                1,
                room.price_per_night,
                None,
            ))
            .await
            .unwrap()
    }

    async fn settle(
        w: &World,
        booking: crate::domain::Booking,
        status: BookingStatus,
        room_status: RoomStatus,
    ) {
        let mut booking = booking;
        booking.status = status;
        w.repos
            .bookings()
            .commit(BookingChange {
                booking,
                expected_status: BookingStatus::Confirmed,
                room_status: Some(room_status),
                revalidate_period: false,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn touching_stays_do_not_conflict() {
        let w = world().await;
        let h = hotel(&w, "Krakow", "Poland").await;
        let r = room(&w, h.id, "1", "double", 2).await;
        book(&w, &r, stay(5, 8)).await;

        assert!(!w.checker.has_conflict(r.id, day(8), day(10), None).await.unwrap());
        assert!(!w.checker.has_conflict(r.id, day(2), day(5), None).await.unwrap());
        assert!(w.checker.has_conflict(r.id, day(7), day(9), None).await.unwrap());
        assert!(w.checker.has_conflict(r.id, day(4), day(6), None).await.unwrap());
    }

    #[tokio::test]
    async fn own_booking_is_excluded() {
        let w = world().await;
        let h = hotel(&w, "Krakow", "Poland").await;
        let r = room(&w, h.id, "1", "double", 2).await;
        let b = book(&w, &r, stay(5, 8)).await;

        assert!(!w
            .checker
            .has_conflict(r.id, day(6), day(9), Some(b.id))
            .await
            .unwrap());
        assert!(matches!(
            w.checker.ensure_free(r.id, &stay(6, 9), None).await,
            Err(DomainError::DateConflict { .. })
        ));
    }

    #[tokio::test]
    async fn finished_bookings_never_conflict() {
        let w = world().await;
        let h = hotel(&w, "Krakow", "Poland").await;
        let r = room(&w, h.id, "1", "double", 2).await;

        let cancelled = book(&w, &r, stay(1, 4)).await;
        settle(&w, cancelled, BookingStatus::Cancelled, RoomStatus::Available).await;
        let completed = book(&w, &r, stay(10, 12)).await;
        settle(&w, completed, BookingStatus::Completed, RoomStatus::Available).await;

        assert!(!w.checker.has_conflict(r.id, day(2), day(3), None).await.unwrap());
        assert!(!w.checker.has_conflict(r.id, day(10), day(12), None).await.unwrap());
    }

    #[tokio::test]
    async fn inverted_range_is_rejected() {
        let w = world().await;
        assert!(matches!(
            w.checker.has_conflict(1, day(5), day(5), None).await,
            Err(DomainError::InvalidDateRange(_))
        ));
    }

    #[tokio::test]
    async fn search_spans_hotels_and_skips_booked_rooms() {
        let w = world().await;
        let krakow = hotel(&w, "Krakow", "Poland").await;
        let gdansk = hotel(&w, "Gdansk", "Poland").await;
        let prague = hotel(&w, "Prague", "Czechia").await;

        let suite = room(&w, krakow.id, "1", "Junior Suite", 3).await;
        let booked = room(&w, krakow.id, "2", "Suite", 3).await;
        let small = room(&w, gdansk.id, "1", "suite", 1).await;
        let sea = room(&w, gdansk.id, "2", "Sea Suite", 4).await;
        room(&w, prague.id, "1", "suite", 4).await;

        // Free again after the check-out of an earlier stay
        let early = book(&w, &booked, stay(1, 3)).await;
        settle(&w, early, BookingStatus::Completed, RoomStatus::Available).await;
        book(&w, &booked, stay(10, 14)).await;
        w.repos
            .rooms()
            .set_status(booked.id, RoomStatus::Available)
            .await
            .unwrap();

        let found = w
            .checker
            .search(&RoomSearch {
                country: Some("pol".into()),
                room_type: Some("SUITE".into()),
                guests: Some(2),
                stay: Some(stay(11, 13)),
                ..Default::default()
            })
            .await
            .unwrap();
        let ids: Vec<i32> = found.iter().map(|m| m.room.id).collect();
        assert_eq!(ids, vec![suite.id, sea.id]);
        assert!(!ids.contains(&small.id));
        assert_eq!(found[1].hotel.city, "Gdansk");

        let by_city = w
            .checker
            .search(&RoomSearch {
                city: Some("prag".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_city.len(), 1);
        assert_eq!(by_city[0].hotel.id, prague.id);
    }
}
