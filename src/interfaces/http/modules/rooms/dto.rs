//! Room DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::{RoomMatch, RoomSearch};
use crate::domain::{
    BookingStatus, NewRoom, Room, RoomBookingQuery, RoomFilter, RoomPatch, RoomStatus, StayPeriod,
};
use crate::interfaces::http::common::{default_limit, default_page, ApiError};
use crate::interfaces::http::modules::hotels::HotelDto;
use crate::shared::PaginationParams;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoomDto {
    pub id: i32,
    pub hotel_id: i32,
    pub room_number: String,
    pub floor: i32,
    pub room_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price_per_night: Decimal,
    pub capacity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amenities: Option<String>,
    /// available, occupied, maintenance, cleaning or inactive
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<Room> for RoomDto {
    fn from(r: Room) -> Self {
        Self {
            id: r.id,
            hotel_id: r.hotel_id,
            room_number: r.room_number,
            floor: r.floor,
            room_type: r.room_type,
            description: r.description,
            price_per_night: r.price_per_night,
            capacity: r.capacity,
            amenities: r.amenities,
            status: r.status.to_string(),
            created_at: r.created_at,
        }
    }
}

pub(crate) fn parse_room_status(raw: &str) -> Result<RoomStatus, ApiError> {
    raw.parse::<RoomStatus>().map_err(ApiError::validation)
}

fn to_price(value: Option<f64>, field: &str) -> Result<Option<Decimal>, ApiError> {
    value
        .map(|v| {
            Decimal::try_from(v)
                .map_err(|_| ApiError::validation(format!("{} is not a valid amount", field)))
        })
        .transpose()
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRoomRequest {
    pub hotel_id: i32,
    #[validate(length(min = 1, max = 20))]
    pub room_number: String,
    #[serde(default)]
    pub floor: i32,
    #[validate(length(min = 1, max = 50))]
    pub room_type: String,
    pub description: Option<String>,
    pub price_per_night: Decimal,
    #[validate(range(min = 1, max = 20))]
    pub capacity: i32,
    pub amenities: Option<String>,
    /// Initial status, `available` when omitted
    pub status: Option<String>,
}

impl CreateRoomRequest {
    pub fn into_new_room(self) -> Result<NewRoom, ApiError> {
        let status = match self.status.as_deref() {
            Some(raw) => parse_room_status(raw)?,
            None => RoomStatus::Available,
        };
        Ok(NewRoom {
            hotel_id: self.hotel_id,
            room_number: self.room_number,
            floor: self.floor,
            room_type: self.room_type,
            description: self.description,
            price_per_night: self.price_per_night,
            capacity: self.capacity,
            amenities: self.amenities,
            status,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRoomRequest {
    #[validate(length(min = 1, max = 20))]
    pub room_number: Option<String>,
    pub floor: Option<i32>,
    #[validate(length(min = 1, max = 50))]
    pub room_type: Option<String>,
    pub description: Option<String>,
    pub price_per_night: Option<Decimal>,
    #[validate(range(min = 1, max = 20))]
    pub capacity: Option<i32>,
    pub amenities: Option<String>,
    pub status: Option<String>,
}

impl UpdateRoomRequest {
    pub fn into_patch(self) -> Result<RoomPatch, ApiError> {
        Ok(RoomPatch {
            room_number: self.room_number,
            floor: self.floor,
            room_type: self.room_type,
            description: self.description,
            price_per_night: self.price_per_night,
            capacity: self.capacity,
            amenities: self.amenities,
            status: self.status.as_deref().map(parse_room_status).transpose()?,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SetRoomStatusRequest {
    #[validate(length(min = 1))]
    pub status: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListRoomsQuery {
    pub hotel_id: Option<i32>,
    pub status: Option<String>,
    pub room_type: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_capacity: Option<i32>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl ListRoomsQuery {
    pub fn filter(&self) -> Result<RoomFilter, ApiError> {
        Ok(RoomFilter {
            hotel_id: self.hotel_id,
            status: self.status.as_deref().map(parse_room_status).transpose()?,
            room_type: self.room_type.clone(),
            min_price: to_price(self.min_price, "min_price")?,
            max_price: to_price(self.max_price, "max_price")?,
            min_capacity: self.min_capacity,
        })
    }

    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.limit)
    }
}

/// Free-room search for one hotel and stay
#[derive(Debug, Deserialize, IntoParams)]
pub struct AvailableRoomsQuery {
    pub hotel_id: i32,
    /// RFC 3339 timestamp
    pub check_in_date: DateTime<Utc>,
    /// RFC 3339 timestamp, after `check_in_date`
    pub check_out_date: DateTime<Utc>,
    pub room_type: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Minimum capacity, e.g. the party size
    pub guests: Option<i32>,
}

impl AvailableRoomsQuery {
    pub fn stay(&self) -> Result<StayPeriod, ApiError> {
        Ok(StayPeriod::new(self.check_in_date, self.check_out_date)?)
    }

    pub fn filter(&self) -> Result<RoomFilter, ApiError> {
        Ok(RoomFilter {
            hotel_id: Some(self.hotel_id),
            status: None,
            room_type: self.room_type.clone(),
            min_price: to_price(self.min_price, "min_price")?,
            max_price: to_price(self.max_price, "max_price")?,
            min_capacity: self.guests,
        })
    }
}

/// Room search across hotels
#[derive(Debug, Deserialize, IntoParams)]
pub struct RoomSearchQuery {
    /// Substring of the hotel city, case-insensitive
    pub city: Option<String>,
    /// Substring of the hotel country, case-insensitive
    pub country: Option<String>,
    /// Substring of the room type, case-insensitive
    pub room_type: Option<String>,
    /// RFC 3339 timestamp; give both dates or neither
    pub check_in_date: Option<DateTime<Utc>>,
    pub check_out_date: Option<DateTime<Utc>>,
    pub guests: Option<i32>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl RoomSearchQuery {
    pub fn to_search(&self) -> Result<RoomSearch, ApiError> {
        let stay = match (self.check_in_date, self.check_out_date) {
            (Some(check_in), Some(check_out)) => Some(StayPeriod::new(check_in, check_out)?),
            (None, None) => None,
            _ => {
                return Err(ApiError::validation(
                    "check_in_date and check_out_date must be given together",
                ))
            }
        };
        Ok(RoomSearch {
            city: self.city.clone(),
            country: self.country.clone(),
            room_type: self.room_type.clone(),
            guests: self.guests,
            min_price: to_price(self.min_price, "min_price")?,
            max_price: to_price(self.max_price, "max_price")?,
            stay,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoomWithHotelDto {
    #[serde(flatten)]
    pub room: RoomDto,
    pub hotel: HotelDto,
}

impl From<RoomMatch> for RoomWithHotelDto {
    fn from(m: RoomMatch) -> Self {
        Self {
            room: m.room.into(),
            hotel: m.hotel.into(),
        }
    }
}

/// Booking history of a room
#[derive(Debug, Deserialize, IntoParams)]
pub struct RoomBookingsQuery {
    /// Keep bookings overlapping [check_in_date, check_out_date)
    pub check_in_date: Option<DateTime<Utc>>,
    pub check_out_date: Option<DateTime<Utc>>,
    /// Comma-separated statuses, e.g. `confirmed,checked_in`
    pub status: Option<String>,
}

impl RoomBookingsQuery {
    pub fn to_query(&self) -> Result<RoomBookingQuery, ApiError> {
        let period = match (self.check_in_date, self.check_out_date) {
            (Some(check_in), Some(check_out)) => Some(StayPeriod::new(check_in, check_out)?),
            (None, None) => None,
            _ => {
                return Err(ApiError::validation(
                    "check_in_date and check_out_date must be given together",
                ))
            }
        };
        let statuses = match self.status.as_deref() {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| s.parse::<BookingStatus>().map_err(ApiError::validation))
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };
        Ok(RoomBookingQuery { period, statuses })
    }
}
