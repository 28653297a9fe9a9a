//! Booking status lifecycle
//!
//! ```text
//! Confirmed ──check-in──▶ CheckedIn ──check-out──▶ Completed
//!     │
//!     └──cancel──▶ Cancelled
//! ```
//!
//! Every transition also names the room status it leaves behind.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::room::RoomStatus;
use crate::shared::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
    CheckedIn,
    #[serde(alias = "checked_out")]
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        Self::Confirmed,
        Self::CheckedIn,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Statuses that hold the room for their date range
    pub const ACTIVE: [BookingStatus; 2] = [Self::Confirmed, Self::CheckedIn];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::CheckedIn => "checked_in",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Confirmed | Self::CheckedIn)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Validate `action` against the current status.
    pub fn apply(self, action: BookingAction) -> DomainResult<Transition> {
        use BookingAction::*;
        use BookingStatus::*;

        match (self, action) {
            (Confirmed, CheckIn) => Ok(Transition {
                to: CheckedIn,
                room_status: None,
            }),
            (CheckedIn, CheckOut) => Ok(Transition {
                to: Completed,
                room_status: Some(RoomStatus::Cleaning),
            }),
            (Confirmed, Cancel) => Ok(Transition {
                to: Cancelled,
                room_status: Some(RoomStatus::Available),
            }),
            (Cancelled, Cancel) => Err(DomainError::AlreadyCancelled),
            (Completed, Cancel) => Err(DomainError::CannotCancelCompleted),
            (from, action) => Err(DomainError::InvalidTransition {
                from,
                action: action.as_str(),
            }),
        }
    }

    /// Action that moves a booking into `target`, if any.
    pub fn action_towards(target: BookingStatus) -> Option<BookingAction> {
        match target {
            Self::CheckedIn => Some(BookingAction::CheckIn),
            Self::Completed => Some(BookingAction::CheckOut),
            Self::Cancelled => Some(BookingAction::Cancel),
            Self::Confirmed => None,
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("checked_out") {
            return Ok(Self::Completed);
        }
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown booking status '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingAction {
    CheckIn,
    CheckOut,
    Cancel,
}

impl BookingAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CheckIn => "check in",
            Self::CheckOut => "check out",
            Self::Cancel => "cancel",
        }
    }
}

/// Validated outcome of a status change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub to: BookingStatus,
    /// Room status to write in the same transaction
    pub room_status: Option<RoomStatus>,
}
