//! Booking lifecycle events
//!
//! Every message is tagged with its topic (`booking.created`, ...) so that
//! downstream consumers can route on the `type` field alone.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::booking::{Booking, BookingStatus};
use crate::domain::room::RoomStatus;
use crate::domain::user::User;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    #[serde(rename = "booking.created")]
    BookingCreated(BookingEvent),
    #[serde(rename = "booking.updated")]
    BookingUpdated(BookingEvent),
    #[serde(rename = "booking.cancelled")]
    BookingCancelled(BookingEvent),
    #[serde(rename = "booking.checked_in")]
    BookingCheckedIn(BookingEvent),
    #[serde(rename = "booking.checked_out")]
    BookingCheckedOut(BookingEvent),
    #[serde(rename = "room.status_changed")]
    RoomStatusChanged(RoomStatusChangedEvent),
    #[serde(rename = "notification.email")]
    EmailNotification(EmailNotificationEvent),
}

impl Event {
    pub fn topic(&self) -> &'static str {
        match self {
            Event::BookingCreated(_) => "booking.created",
            Event::BookingUpdated(_) => "booking.updated",
            Event::BookingCancelled(_) => "booking.cancelled",
            Event::BookingCheckedIn(_) => "booking.checked_in",
            Event::BookingCheckedOut(_) => "booking.checked_out",
            Event::RoomStatusChanged(_) => "room.status_changed",
            Event::EmailNotification(_) => "notification.email",
        }
    }

    pub fn booking_id(&self) -> Option<i32> {
        match self {
            Event::BookingCreated(e)
            | Event::BookingUpdated(e)
            | Event::BookingCancelled(e)
            | Event::BookingCheckedIn(e)
            | Event::BookingCheckedOut(e) => Some(e.booking_id),
            Event::EmailNotification(e) => Some(e.booking_id),
            Event::RoomStatusChanged(_) => None,
        }
    }

    pub fn room_id(&self) -> Option<i32> {
        match self {
            Event::BookingCreated(e)
            | Event::BookingUpdated(e)
            | Event::BookingCancelled(e)
            | Event::BookingCheckedIn(e)
            | Event::BookingCheckedOut(e) => Some(e.room_id),
            Event::RoomStatusChanged(e) => Some(e.room_id),
            Event::EmailNotification(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingEvent {
    pub booking_id: i32,
    pub booking_reference: String,
    pub user_id: i32,
    pub hotel_id: i32,
    pub room_id: i32,
    pub status: BookingStatus,
    pub check_in_date: DateTime<Utc>,
    pub check_out_date: DateTime<Utc>,
    pub total_price: Decimal,
}

impl From<&Booking> for BookingEvent {
    fn from(b: &Booking) -> Self {
        Self {
            booking_id: b.id,
            booking_reference: b.booking_reference.clone(),
            user_id: b.user_id,
            hotel_id: b.hotel_id,
            room_id: b.room_id,
            status: b.status,
            check_in_date: b.check_in_date,
            check_out_date: b.check_out_date,
            total_price: b.total_price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomStatusChangedEvent {
    pub room_id: i32,
    pub hotel_id: i32,
    pub old_status: RoomStatus,
    pub new_status: RoomStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    BookingConfirmation,
    BookingCancellation,
}

/// Request for the mailer; delivery is someone else's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailNotificationEvent {
    pub kind: NotificationKind,
    pub booking_id: i32,
    pub booking_reference: String,
    pub user_id: i32,
    pub recipient: String,
    pub recipient_name: String,
}

impl EmailNotificationEvent {
    pub fn new(kind: NotificationKind, booking: &Booking, user: &User) -> Self {
        Self {
            kind,
            booking_id: booking.id,
            booking_reference: booking.booking_reference.clone(),
            user_id: user.id,
            recipient: user.email.clone(),
            recipient_name: user.full_name(),
        }
    }
}

/// Wrapper for sending events with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: Event,
}

impl EventMessage {
    pub fn new(event: Event) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event,
        }
    }

    pub fn topic(&self) -> &'static str {
        self.event.topic()
    }
}
