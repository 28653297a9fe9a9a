//! Room aggregate
//!
//! Contains the Room entity, the operational RoomStatus flag and the
//! repository interface.

pub mod model;
pub mod repository;

pub use model::{NewRoom, Room, RoomFilter, RoomPatch, RoomStatus};
pub use repository::RoomRepository;
