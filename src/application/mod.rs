//! Application layer: use cases over the domain and the outbound ports.

pub mod booking;
pub mod cache;
pub mod events;
pub mod ports;
pub mod services;

pub use booking::{
    AvailabilityChecker, BookingRequest, BookingService, RoomLocks, RoomMatch, RoomSearch,
};
pub use cache::{CacheService, SharedCacheService};
pub use events::{create_event_bus, EventBus, EventDispatcher, SharedEventBus};
pub use ports::{CacheStore, EventPublisher};
pub use services::{BookingStats, HotelService, RoomService, StatsService, UserService};
