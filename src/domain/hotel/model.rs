//! Hotel domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A hotel owning rooms and bookings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotel {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub city: String,
    pub country: String,
    /// Guest rating, 0.0 - 5.0
    pub rating: f64,
    pub created_at: DateTime<Utc>,
}

/// Data for inserting a hotel
#[derive(Debug, Clone)]
pub struct NewHotel {
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub city: String,
    pub country: String,
    pub rating: f64,
}

/// Partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct HotelPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub rating: Option<f64>,
}

impl Hotel {
    pub fn apply(&mut self, patch: HotelPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(city) = patch.city {
            self.city = city;
        }
        if let Some(country) = patch.country {
            self.country = country;
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
    }
}

/// Hotel list filter (exact match)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HotelFilter {
    pub city: Option<String>,
    pub country: Option<String>,
}

/// Outcome of a cascading hotel delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelDeletion {
    pub hotel_id: i32,
    pub rooms_deleted: u64,
    pub bookings_deleted: u64,
}
