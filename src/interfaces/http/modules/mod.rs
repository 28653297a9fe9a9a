pub mod bookings;
pub mod cache;
pub mod health;
pub mod hotels;
pub mod metrics;
pub mod request_id;
pub mod rooms;
pub mod stats;
pub mod users;
