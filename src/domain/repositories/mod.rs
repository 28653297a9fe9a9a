//! Repository access for the domain layer
//!
//! `RepositoryProvider` hands out one repository per aggregate. Services take
//! an `Arc<dyn RepositoryProvider>` and ask only for what they need:
//!
//! ```ignore
//! async fn guests(repos: &dyn RepositoryProvider, room_id: i32) -> DomainResult<u64> {
//!     let room = repos.rooms().find_by_id(room_id).await?;
//!     let bookings = repos.bookings().list_for_room(room_id, &Default::default()).await?;
//!     Ok(bookings.len() as u64)
//! }
//! ```

use super::booking::BookingRepository;
use super::hotel::HotelRepository;
use super::room::RoomRepository;
use super::user::UserRepository;

pub trait RepositoryProvider: Send + Sync {
    fn hotels(&self) -> &dyn HotelRepository;
    fn rooms(&self) -> &dyn RoomRepository;
    fn users(&self) -> &dyn UserRepository;
    fn bookings(&self) -> &dyn BookingRepository;
}
