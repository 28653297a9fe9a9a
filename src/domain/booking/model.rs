//! Booking domain entity

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::period::{self, StayPeriod};
use super::state::BookingStatus;
use crate::domain::hotel::Hotel;
use crate::domain::room::Room;
use crate::domain::user::User;
use crate::shared::DomainResult;

/// Reservation of one room by one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i32,
    /// UUID v4, generated at creation
    pub booking_reference: String,
    pub user_id: i32,
    pub hotel_id: i32,
    pub room_id: i32,
    pub check_in_date: DateTime<Utc>,
    pub check_out_date: DateTime<Utc>,
    pub number_of_guests: i32,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub special_requests: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn stay(&self) -> DomainResult<StayPeriod> {
        StayPeriod::new(self.check_in_date, self.check_out_date)
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// True when this booking holds `room_id` for some part of `stay`.
    pub fn blocks(&self, room_id: i32, stay: &StayPeriod) -> bool {
        self.room_id == room_id
            && self.is_active()
            && period::overlaps(
                self.check_in_date,
                self.check_out_date,
                stay.check_in(),
                stay.check_out(),
            )
    }
}

/// Data for inserting a booking
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub booking_reference: String,
    pub user_id: i32,
    pub hotel_id: i32,
    pub room_id: i32,
    pub stay: StayPeriod,
    pub number_of_guests: i32,
    pub total_price: Decimal,
    pub special_requests: Option<String>,
}

impl NewBooking {
    pub fn new(
        user_id: i32,
        hotel_id: i32,
        room_id: i32,
        stay: StayPeriod,
        number_of_guests: i32,
        price_per_night: Decimal,
        special_requests: Option<String>,
    ) -> Self {
        Self {
            booking_reference: Uuid::new_v4().to_string(),
            user_id,
            hotel_id,
            room_id,
            stay,
            number_of_guests,
            total_price: stay.total_price(price_per_night),
            special_requests,
        }
    }
}

/// Typed partial update of a booking
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingPatch {
    pub check_in_date: Option<DateTime<Utc>>,
    pub check_out_date: Option<DateTime<Utc>>,
    pub number_of_guests: Option<i32>,
    pub special_requests: Option<String>,
    pub status: Option<BookingStatus>,
}

impl BookingPatch {
    pub fn changes_dates(&self) -> bool {
        self.check_in_date.is_some() || self.check_out_date.is_some()
    }
}

/// Booking with the entities it references
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDetails {
    pub booking: Booking,
    pub user: User,
    pub hotel: Hotel,
    pub room: Room,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, d, 15, 0, 0).unwrap()
    }

    fn booking(status: BookingStatus) -> Booking {
        Booking {
            id: 1,
            booking_reference: Uuid::new_v4().to_string(),
            user_id: 1,
            hotel_id: 1,
            room_id: 7,
            check_in_date: day(10),
            check_out_date: day(12),
            number_of_guests: 2,
            total_price: Decimal::from(200),
            status,
            special_requests: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn new_booking_prices_the_stay() {
        let stay = StayPeriod::new(day(1), day(4)).unwrap();
        let nb = NewBooking::new(1, 2, 3, stay, 2, Decimal::from(80), None);
        assert_eq!(nb.total_price, Decimal::from(240));
        assert!(Uuid::parse_str(&nb.booking_reference).is_ok());
    }

    #[test]
    fn only_active_bookings_block() {
        let stay = StayPeriod::new(day(11), day(13)).unwrap();
        assert!(booking(BookingStatus::Confirmed).blocks(7, &stay));
        assert!(booking(BookingStatus::CheckedIn).blocks(7, &stay));
        assert!(!booking(BookingStatus::Cancelled).blocks(7, &stay));
        assert!(!booking(BookingStatus::Completed).blocks(7, &stay));
        assert!(!booking(BookingStatus::Confirmed).blocks(8, &stay));

        let after = StayPeriod::new(day(12), day(14)).unwrap();
        assert!(!booking(BookingStatus::Confirmed).blocks(7, &after));
    }
}
