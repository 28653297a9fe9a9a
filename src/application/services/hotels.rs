//! Hotel inventory operations

use std::sync::Arc;

use tracing::info;

use crate::application::booking::RoomLocks;
use crate::application::cache::{keys, QueryShape, SharedCacheService};
use crate::application::events::EventDispatcher;
use crate::domain::events::{BookingEvent, Event};
use crate::domain::{
    BookingStatus, DomainError, DomainResult, Hotel, HotelDeletion, HotelFilter, HotelPatch,
    NewHotel, RepositoryProvider, RoomBookingQuery, RoomFilter,
};
use crate::shared::{PaginatedResult, PaginationParams};

pub struct HotelService {
    repos: Arc<dyn RepositoryProvider>,
    locks: Arc<RoomLocks>,
    cache: SharedCacheService,
    events: EventDispatcher,
}

impl HotelService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        locks: Arc<RoomLocks>,
        cache: SharedCacheService,
        events: EventDispatcher,
    ) -> Self {
        Self {
            repos,
            locks,
            cache,
            events,
        }
    }

    pub async fn create(&self, hotel: NewHotel) -> DomainResult<Hotel> {
        check_rating(hotel.rating)?;
        let hotel = self.repos.hotels().create(hotel).await?;
        info!(hotel_id = hotel.id, name = %hotel.name, "Hotel created");
        self.cache.delete_by_prefix(keys::HOTEL_LIST_PREFIX).await;
        Ok(hotel)
    }

    pub async fn get(&self, id: i32) -> DomainResult<Hotel> {
        let key = keys::hotel(id);
        if let Some(hotel) = self.cache.get_json::<Hotel>(&key).await {
            return Ok(hotel);
        }
        let hotel = self
            .repos
            .hotels()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Hotel", id))?;
        self.cache.set_json(&key, &hotel, self.cache.hotel_ttl()).await;
        Ok(hotel)
    }

    pub async fn list(
        &self,
        filter: HotelFilter,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<Hotel>> {
        let key = keys::hotel_list(
            &QueryShape::new()
                .with("page", page.page)
                .with("limit", page.limit)
                .with_opt("city", filter.city.as_deref())
                .with_opt("country", filter.country.as_deref()),
        );
        if let Some(cached) = self.cache.get_json(&key).await {
            return Ok(cached);
        }
        let result = self.repos.hotels().list(&filter, page).await?;
        self.cache
            .set_json(&key, &result, self.cache.hotel_list_ttl())
            .await;
        Ok(result)
    }

    pub async fn update(&self, id: i32, patch: HotelPatch) -> DomainResult<Hotel> {
        if let Some(rating) = patch.rating {
            check_rating(rating)?;
        }
        let mut hotel = self
            .repos
            .hotels()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Hotel", id))?;
        hotel.apply(patch);
        let hotel = self.repos.hotels().update(hotel).await?;
        self.cache.invalidate_hotel(id).await;
        Ok(hotel)
    }

    /// Cascading delete of the hotel, its rooms and their bookings.
    ///
    /// Bookings that were still active are announced as cancelled.
    pub async fn delete(&self, id: i32) -> DomainResult<HotelDeletion> {
        let rooms = self
            .repos
            .rooms()
            .find_all(&RoomFilter {
                hotel_id: Some(id),
                ..Default::default()
            })
            .await?;
        let active_query = RoomBookingQuery {
            period: None,
            statuses: BookingStatus::ACTIVE.to_vec(),
        };
        let mut active = Vec::new();
        for room in &rooms {
            active.extend(
                self.repos
                    .bookings()
                    .list_for_room(room.id, &active_query)
                    .await?,
            );
        }

        let deletion = self.repos.hotels().delete(id).await?;
        for room in &rooms {
            self.locks.remove(room.id);
        }
        info!(
            hotel_id = id,
            rooms_deleted = deletion.rooms_deleted,
            bookings_deleted = deletion.bookings_deleted,
            active_cancelled = active.len(),
            "Hotel deleted"
        );

        self.cache.invalidate_hotel(id).await;
        if deletion.bookings_deleted > 0 {
            self.cache.delete_by_prefix("booking:").await;
            self.cache.delete_by_prefix("user_bookings:").await;
        }
        for mut booking in active {
            booking.status = BookingStatus::Cancelled;
            self.events
                .publish(Event::BookingCancelled(BookingEvent::from(&booking)))
                .await;
        }
        Ok(deletion)
    }
}

fn check_rating(rating: f64) -> DomainResult<()> {
    if !(0.0..=5.0).contains(&rating) {
        return Err(DomainError::Validation(format!(
            "rating must be between 0.0 and 5.0, got {}",
            rating
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::booking::{BookingRequest, BookingService};
    use crate::application::cache::CacheService;
    use crate::application::events::EventBus;
    use crate::config::CacheConfig;
    use crate::domain::{NewRoom, NewUser, RoomStatus, UserRole};
    use crate::infrastructure::cache::MemoryCacheStore;
    use crate::infrastructure::storage::InMemoryRepositoryProvider;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use std::time::Duration;

    struct Parts {
        hotels: HotelService,
        bookings: BookingService,
        repos: Arc<InMemoryRepositoryProvider>,
        locks: Arc<RoomLocks>,
        bus: Arc<EventBus>,
    }

    fn parts() -> Parts {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let cache = Arc::new(CacheService::new(
            Arc::new(MemoryCacheStore::new()),
            CacheConfig::default(),
        ));
        let bus = Arc::new(EventBus::new());
        let events = EventDispatcher::new(bus.clone(), Duration::from_secs(1));
        let locks = Arc::new(RoomLocks::new());
        Parts {
            hotels: HotelService::new(repos.clone(), locks.clone(), cache.clone(), events.clone()),
            bookings: BookingService::new(repos.clone(), locks.clone(), cache, events),
            repos,
            locks,
            bus,
        }
    }

    fn service() -> HotelService {
        parts().hotels
    }

    fn new_hotel(city: &str) -> NewHotel {
        NewHotel {
            name: format!("{} Inn", city),
            description: None,
            address: "Main 1".into(),
            city: city.into(),
            country: "Latvia".into(),
            rating: 4.0,
        }
    }

    #[tokio::test]
    async fn listing_sees_new_hotels_despite_cache() {
        let svc = service();
        svc.create(new_hotel("Riga")).await.unwrap();
        let first = svc
            .list(HotelFilter::default(), PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(first.total, 1);

        svc.create(new_hotel("Jurmala")).await.unwrap();
        let second = svc
            .list(HotelFilter::default(), PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(second.total, 2);

        let filtered = svc
            .list(
                HotelFilter {
                    city: Some("Riga".into()),
                    ..Default::default()
                },
                PaginationParams::default(),
            )
            .await
            .unwrap();
        assert_eq!(filtered.total, 1);
    }

    #[tokio::test]
    async fn update_refreshes_cached_hotel() {
        let svc = service();
        let hotel = svc.create(new_hotel("Riga")).await.unwrap();
        svc.get(hotel.id).await.unwrap();

        svc.update(
            hotel.id,
            HotelPatch {
                name: Some("Old Town Inn".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(svc.get(hotel.id).await.unwrap().name, "Old Town Inn");
    }

    #[tokio::test]
    async fn rating_out_of_range_is_rejected() {
        let svc = service();
        let mut hotel = new_hotel("Riga");
        hotel.rating = 5.5;
        assert!(matches!(
            svc.create(hotel).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn delete_missing_hotel_is_not_found() {
        assert_eq!(
            service().delete(77).await.unwrap_err().code(),
            "HOTEL_NOT_FOUND"
        );
    }

    #[tokio::test]
    async fn delete_announces_active_bookings_and_drops_room_locks() {
        let p = parts();
        let hotel = p.hotels.create(new_hotel("Cesis")).await.unwrap();
        let room = p
            .repos
            .rooms()
            .create(NewRoom {
                hotel_id: hotel.id,
                room_number: "12".into(),
                floor: 1,
                room_type: "double".into(),
                description: None,
                price_per_night: Decimal::from(70),
                capacity: 2,
                amenities: None,
                status: RoomStatus::Available,
            })
            .await
            .unwrap();
        let user = p
            .repos
            .users()
            .create(NewUser {
                email: "ilze@example.com".into(),
                first_name: "Ilze".into(),
                last_name: "Berzina".into(),
                phone: None,
                role: UserRole::User,
            })
            .await
            .unwrap();
        let booking = p
            .bookings
            .create(BookingRequest {
                user_id: user.id,
                hotel_id: hotel.id,
                room_id: room.id,
                check_in_date: Utc.with_ymd_and_hms(2025, 10, 1, 14, 0, 0).unwrap(),
                check_out_date: Utc.with_ymd_and_hms(2025, 10, 4, 11, 0, 0).unwrap(),
                number_of_guests: 2,
                special_requests: None,
            })
            .await
            .unwrap();
        assert!(p.locks.is_tracked(room.id));

        let mut sub = p.bus.subscribe();
        let deletion = p.hotels.delete(hotel.id).await.unwrap();
        assert_eq!(deletion.rooms_deleted, 1);
        assert_eq!(deletion.bookings_deleted, 1);
        assert!(!p.locks.is_tracked(room.id));

        let msg = tokio::time::timeout(Duration::from_millis(200), sub.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(msg.topic(), "booking.cancelled");
        match &msg.event {
            Event::BookingCancelled(e) => {
                assert_eq!(e.booking_id, booking.id);
                assert_eq!(e.status, BookingStatus::Cancelled);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }
}
