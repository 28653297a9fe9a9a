//! Hotel aggregate
//!
//! Contains the Hotel entity, its partial-update type and repository interface.

pub mod model;
pub mod repository;

pub use model::{Hotel, HotelDeletion, HotelFilter, HotelPatch, NewHotel};
pub use repository::HotelRepository;
