//! Shared handler state

use std::sync::Arc;
use std::time::Instant;

use sea_orm::DatabaseConnection;

use crate::application::{
    BookingService, EventDispatcher, HotelService, RoomLocks, RoomService, SharedCacheService,
    StatsService, UserService,
};
use crate::domain::RepositoryProvider;

/// Services behind every route. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub bookings: Arc<BookingService>,
    pub hotels: Arc<HotelService>,
    pub rooms: Arc<RoomService>,
    pub users: Arc<UserService>,
    pub stats: Arc<StatsService>,
    /// Pinged by `/health`; absent for in-memory storage
    pub db: Option<DatabaseConnection>,
    pub started_at: Instant,
}

impl AppState {
    /// Wire every service around one repository provider, cache and
    /// dispatcher. Booking and room services share the per-room locks.
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        cache: SharedCacheService,
        events: EventDispatcher,
    ) -> Self {
        let locks = Arc::new(RoomLocks::new());
        Self {
            bookings: Arc::new(BookingService::new(
                repos.clone(),
                locks.clone(),
                cache.clone(),
                events.clone(),
            )),
            hotels: Arc::new(HotelService::new(
                repos.clone(),
                locks.clone(),
                cache.clone(),
                events.clone(),
            )),
            rooms: Arc::new(RoomService::new(
                repos.clone(),
                locks,
                cache.clone(),
                events,
            )),
            users: Arc::new(UserService::new(repos, cache.clone())),
            stats: Arc::new(StatsService::new(cache)),
            db: None,
            started_at: Instant::now(),
        }
    }

    pub fn with_database(mut self, db: DatabaseConnection) -> Self {
        self.db = Some(db);
        self
    }
}
