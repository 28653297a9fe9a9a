use thiserror::Error;

use crate::domain::{BookingStatus, RoomStatus};

/// Errors raised by the inventory store and the booking state machine.
///
/// Every variant maps onto one HTTP status class (see `ApiError`) and carries a
/// stable machine code returned by [`DomainError::code`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DomainError {
    #[error("{entity} not found ({field}={value})")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Room {room_id} does not belong to hotel {hotel_id}")]
    RoomHotelMismatch { room_id: i32, hotel_id: i32 },

    #[error("Room {room_id} is not available for booking (status: {status})")]
    RoomUnavailable { room_id: i32, status: RoomStatus },

    #[error("Room capacity exceeded: room holds at most {capacity} guests, {requested} requested")]
    CapacityExceeded { capacity: i32, requested: i32 },

    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("Room {room_id} is already booked for the requested dates")]
    DateConflict { room_id: i32 },

    #[error("Booking in status {status} can no longer be modified")]
    BookingImmutable { status: BookingStatus },

    #[error("Booking is already cancelled")]
    AlreadyCancelled,

    #[error("A completed booking cannot be cancelled")]
    CannotCancelCompleted,

    #[error("Cannot {action} a booking in status {from}")]
    InvalidTransition {
        from: BookingStatus,
        action: &'static str,
    },

    #[error("Room {room_id} is {status}, expected {expected}")]
    InvalidRoomStatus {
        room_id: i32,
        status: RoomStatus,
        expected: RoomStatus,
    },

    #[error("{entity} {id} still has {count} active booking(s)")]
    HasActiveBookings {
        entity: &'static str,
        id: i32,
        count: u64,
    },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            field: "id",
            value: id.to_string(),
        }
    }

    /// Stable machine-readable code for API clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { entity, .. } => match *entity {
                "User" => "USER_NOT_FOUND",
                "Hotel" => "HOTEL_NOT_FOUND",
                "Room" => "ROOM_NOT_FOUND",
                "Booking" => "BOOKING_NOT_FOUND",
                _ => "NOT_FOUND",
            },
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::Conflict(_) => "ALREADY_EXISTS",
            Self::RoomHotelMismatch { .. } => "ROOM_HOTEL_MISMATCH",
            Self::RoomUnavailable { .. } => "ROOM_UNAVAILABLE",
            Self::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
            Self::InvalidDateRange(_) => "INVALID_DATE_RANGE",
            Self::DateConflict { .. } => "DATE_CONFLICT",
            Self::BookingImmutable { .. } => "BOOKING_IMMUTABLE",
            Self::AlreadyCancelled => "ALREADY_CANCELLED",
            Self::CannotCancelCompleted => "CANNOT_CANCEL_COMPLETED",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::InvalidRoomStatus { .. } => "INVALID_ROOM_STATUS",
            Self::HasActiveBookings { .. } => "HAS_ACTIVE_BOOKINGS",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Infrastructure failures surface as 500; everything else is the caller's input.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        use sea_orm::SqlErr;

        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => Self::Conflict(msg),
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                Self::Validation(format!("Referenced entity does not exist: {}", msg))
            }
            _ => Self::Storage(e.to_string()),
        }
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_codes_follow_entity() {
        assert_eq!(DomainError::not_found("User", 1).code(), "USER_NOT_FOUND");
        assert_eq!(DomainError::not_found("Hotel", 1).code(), "HOTEL_NOT_FOUND");
        assert_eq!(DomainError::not_found("Room", 1).code(), "ROOM_NOT_FOUND");
        assert_eq!(
            DomainError::not_found("Booking", 1).code(),
            "BOOKING_NOT_FOUND"
        );
    }

    #[test]
    fn messages_are_specific() {
        let e = DomainError::CapacityExceeded {
            capacity: 2,
            requested: 3,
        };
        assert!(e.to_string().contains("capacity exceeded"));

        let e = DomainError::DateConflict { room_id: 7 };
        assert!(e.to_string().contains("already booked"));
    }

    #[test]
    fn only_storage_is_internal() {
        assert!(DomainError::Storage("down".into()).is_internal());
        assert!(!DomainError::AlreadyCancelled.is_internal());
        assert!(!DomainError::not_found("Room", 3).is_internal());
    }
}
