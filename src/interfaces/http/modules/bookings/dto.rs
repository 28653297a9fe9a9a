//! Booking DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::BookingRequest;
use crate::domain::{Booking, BookingDetails, BookingPatch, BookingStatus};
use crate::interfaces::http::common::ApiError;
use crate::interfaces::http::modules::hotels::HotelDto;
use crate::interfaces::http::modules::rooms::RoomDto;
use crate::interfaces::http::modules::users::UserDto;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookingDto {
    pub id: i32,
    pub booking_reference: String,
    pub user_id: i32,
    pub hotel_id: i32,
    pub room_id: i32,
    pub check_in_date: DateTime<Utc>,
    pub check_out_date: DateTime<Utc>,
    pub nights: i64,
    pub number_of_guests: i32,
    pub total_price: Decimal,
    /// confirmed, checked_in, completed or cancelled
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingDto {
    fn from(b: Booking) -> Self {
        let nights = (b.check_out_date - b.check_in_date).num_days();
        Self {
            id: b.id,
            booking_reference: b.booking_reference,
            user_id: b.user_id,
            hotel_id: b.hotel_id,
            room_id: b.room_id,
            check_in_date: b.check_in_date,
            check_out_date: b.check_out_date,
            nights,
            number_of_guests: b.number_of_guests,
            total_price: b.total_price,
            status: b.status.to_string(),
            special_requests: b.special_requests,
            created_at: b.created_at,
        }
    }
}

/// Booking with embedded guest, hotel and room
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookingDetailsDto {
    #[serde(flatten)]
    pub booking: BookingDto,
    pub user: UserDto,
    pub hotel: HotelDto,
    pub room: RoomDto,
}

impl From<BookingDetails> for BookingDetailsDto {
    fn from(d: BookingDetails) -> Self {
        Self {
            booking: d.booking.into(),
            user: d.user.into(),
            hotel: d.hotel.into(),
            room: d.room.into(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    pub user_id: i32,
    pub hotel_id: i32,
    pub room_id: i32,
    pub check_in_date: DateTime<Utc>,
    pub check_out_date: DateTime<Utc>,
    #[validate(range(min = 1, max = 20))]
    pub number_of_guests: i32,
    #[validate(length(max = 1000))]
    pub special_requests: Option<String>,
}

impl From<CreateBookingRequest> for BookingRequest {
    fn from(r: CreateBookingRequest) -> Self {
        Self {
            user_id: r.user_id,
            hotel_id: r.hotel_id,
            room_id: r.room_id,
            check_in_date: r.check_in_date,
            check_out_date: r.check_out_date,
            number_of_guests: r.number_of_guests,
            special_requests: r.special_requests,
        }
    }
}

/// Partial update. A `status` is applied as the matching transition.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBookingRequest {
    pub check_in_date: Option<DateTime<Utc>>,
    pub check_out_date: Option<DateTime<Utc>>,
    #[validate(range(min = 1, max = 20))]
    pub number_of_guests: Option<i32>,
    #[validate(length(max = 1000))]
    pub special_requests: Option<String>,
    /// checked_in, completed (alias checked_out) or cancelled
    pub status: Option<String>,
}

impl UpdateBookingRequest {
    pub fn into_patch(self) -> Result<BookingPatch, ApiError> {
        let status = self
            .status
            .as_deref()
            .map(|raw| raw.parse::<BookingStatus>().map_err(ApiError::validation))
            .transpose()?;
        Ok(BookingPatch {
            check_in_date: self.check_in_date,
            check_out_date: self.check_out_date,
            number_of_guests: self.number_of_guests,
            special_requests: self.special_requests,
            status,
        })
    }
}

/// Acknowledgement of a lifecycle transition
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransitionResponse {
    pub message: String,
    pub booking_id: i32,
    pub status: String,
}

impl TransitionResponse {
    pub fn new(message: &str, booking: &Booking) -> Self {
        Self {
            message: message.to_string(),
            booking_id: booking.id,
            status: booking.status.to_string(),
        }
    }
}
