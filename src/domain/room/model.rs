//! Room domain entity

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Operational room status.
///
/// Moved by the booking state machine (Occupied on create, Available on
/// cancel, Cleaning on check-out) and settable directly by staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Available,
    Occupied,
    Maintenance,
    Cleaning,
    Inactive,
}

impl RoomStatus {
    pub const ALL: [RoomStatus; 5] = [
        Self::Available,
        Self::Occupied,
        Self::Maintenance,
        Self::Cleaning,
        Self::Inactive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Maintenance => "maintenance",
            Self::Cleaning => "cleaning",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown room status '{}'", s))
    }
}

/// A bookable room inside a hotel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: i32,
    pub hotel_id: i32,
    /// Unique within the hotel
    pub room_number: String,
    pub floor: i32,
    pub room_type: String,
    pub description: Option<String>,
    pub price_per_night: Decimal,
    pub capacity: i32,
    pub amenities: Option<String>,
    pub status: RoomStatus,
    pub created_at: DateTime<Utc>,
}

impl Room {
    pub fn is_available(&self) -> bool {
        self.status == RoomStatus::Available
    }

    pub fn apply(&mut self, patch: RoomPatch) {
        if let Some(room_number) = patch.room_number {
            self.room_number = room_number;
        }
        if let Some(floor) = patch.floor {
            self.floor = floor;
        }
        if let Some(room_type) = patch.room_type {
            self.room_type = room_type;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(price) = patch.price_per_night {
            self.price_per_night = price;
        }
        if let Some(capacity) = patch.capacity {
            self.capacity = capacity;
        }
        if let Some(amenities) = patch.amenities {
            self.amenities = Some(amenities);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

/// Data for inserting a room
#[derive(Debug, Clone)]
pub struct NewRoom {
    pub hotel_id: i32,
    pub room_number: String,
    pub floor: i32,
    pub room_type: String,
    pub description: Option<String>,
    pub price_per_night: Decimal,
    pub capacity: i32,
    pub amenities: Option<String>,
    pub status: RoomStatus,
}

/// Partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct RoomPatch {
    pub room_number: Option<String>,
    pub floor: Option<i32>,
    pub room_type: Option<String>,
    pub description: Option<String>,
    pub price_per_night: Option<Decimal>,
    pub capacity: Option<i32>,
    pub amenities: Option<String>,
    pub status: Option<RoomStatus>,
}

/// Room list filter; every set field narrows the result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomFilter {
    pub hotel_id: Option<i32>,
    pub status: Option<RoomStatus>,
    pub room_type: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_capacity: Option<i32>,
}

impl RoomFilter {
    pub fn matches(&self, room: &Room) -> bool {
        self.hotel_id.map_or(true, |id| room.hotel_id == id)
            && self.status.map_or(true, |s| room.status == s)
            && self
                .room_type
                .as_deref()
                .map_or(true, |t| room.room_type.eq_ignore_ascii_case(t))
            && self.min_price.map_or(true, |p| room.price_per_night >= p)
            && self.max_price.map_or(true, |p| room.price_per_night <= p)
            && self.min_capacity.map_or(true, |c| room.capacity >= c)
    }
}
