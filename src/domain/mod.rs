//! Domain layer: aggregates, their invariants and repository interfaces.

pub mod booking;
pub mod events;
pub mod hotel;
pub mod repositories;
pub mod room;
pub mod user;

pub use booking::{
    Booking, BookingAction, BookingChange, BookingDetails, BookingPatch, BookingRepository,
    BookingStatus, NewBooking, RoomBookingQuery, StayPeriod, Transition,
};
pub use hotel::{Hotel, HotelDeletion, HotelFilter, HotelPatch, HotelRepository, NewHotel};
pub use repositories::RepositoryProvider;
pub use room::{NewRoom, Room, RoomFilter, RoomPatch, RoomRepository, RoomStatus};
pub use user::{NewUser, User, UserPatch, UserRepository, UserRole};

pub use crate::shared::{DomainError, DomainResult};
