//! Hotel DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{Hotel, HotelDeletion, HotelFilter, HotelPatch, NewHotel};
use crate::interfaces::http::common::{default_limit, default_page};
use crate::shared::PaginationParams;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HotelDto {
    pub id: i32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub address: String,
    pub city: String,
    pub country: String,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
}

impl From<Hotel> for HotelDto {
    fn from(h: Hotel) -> Self {
        Self {
            id: h.id,
            name: h.name,
            description: h.description,
            address: h.address,
            city: h.city,
            country: h.country,
            rating: h.rating,
            created_at: h.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateHotelRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub address: String,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(min = 1, max = 100))]
    pub country: String,
    #[validate(range(min = 0.0, max = 5.0))]
    #[serde(default)]
    pub rating: f64,
}

impl From<CreateHotelRequest> for NewHotel {
    fn from(r: CreateHotelRequest) -> Self {
        Self {
            name: r.name,
            description: r.description,
            address: r.address,
            city: r.city,
            country: r.country,
            rating: r.rating,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateHotelRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub address: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub country: Option<String>,
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: Option<f64>,
}

impl From<UpdateHotelRequest> for HotelPatch {
    fn from(r: UpdateHotelRequest) -> Self {
        Self {
            name: r.name,
            description: r.description,
            address: r.address,
            city: r.city,
            country: r.country,
            rating: r.rating,
        }
    }
}

/// Hotel list query: exact-match filters plus pagination
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListHotelsQuery {
    pub city: Option<String>,
    pub country: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl ListHotelsQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.limit)
    }

    pub fn filter(&self) -> HotelFilter {
        HotelFilter {
            city: self.city.clone(),
            country: self.country.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HotelDeletionDto {
    pub hotel_id: i32,
    pub rooms_deleted: u64,
    pub bookings_deleted: u64,
}

impl From<HotelDeletion> for HotelDeletionDto {
    fn from(d: HotelDeletion) -> Self {
        Self {
            hotel_id: d.hotel_id,
            rooms_deleted: d.rooms_deleted,
            bookings_deleted: d.bookings_deleted,
        }
    }
}
