//! Inventory and reporting services around the booking core

pub mod hotels;
pub mod rooms;
pub mod stats;
pub mod users;

pub use hotels::HotelService;
pub use rooms::RoomService;
pub use stats::{BookingStats, StatsService};
pub use users::UserService;
