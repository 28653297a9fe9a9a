//! Stay period and interval arithmetic

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::shared::{DomainError, DomainResult};

/// Half-open `[check_in, check_out)` stay spanning at least one night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayPeriod {
    check_in: DateTime<Utc>,
    check_out: DateTime<Utc>,
}

impl StayPeriod {
    pub fn new(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> DomainResult<Self> {
        if check_in >= check_out {
            return Err(DomainError::InvalidDateRange(
                "Check-out date must be after check-in date".into(),
            ));
        }
        let period = Self {
            check_in,
            check_out,
        };
        if period.nights() < 1 {
            return Err(DomainError::InvalidDateRange(
                "Stay must span at least one night".into(),
            ));
        }
        Ok(period)
    }

    pub fn check_in(&self) -> DateTime<Utc> {
        self.check_in
    }

    pub fn check_out(&self) -> DateTime<Utc> {
        self.check_out
    }

    /// Whole days between check-in and check-out
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    pub fn overlaps(&self, other: &StayPeriod) -> bool {
        overlaps(self.check_in, self.check_out, other.check_in, other.check_out)
    }

    pub fn total_price(&self, price_per_night: Decimal) -> Decimal {
        price_per_night * Decimal::from(self.nights())
    }
}

/// Half-open interval overlap. Touching ranges (one ends when the other
/// starts) do not overlap.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, d, 14, 0, 0).unwrap()
    }

    #[test]
    fn rejects_reversed_and_empty_ranges() {
        assert!(matches!(
            StayPeriod::new(day(5), day(3)),
            Err(DomainError::InvalidDateRange(_))
        ));
        assert!(matches!(
            StayPeriod::new(day(5), day(5)),
            Err(DomainError::InvalidDateRange(_))
        ));
    }

    #[test]
    fn rejects_sub_day_stay() {
        let check_in = day(5);
        let result = StayPeriod::new(check_in, check_in + Duration::hours(20));
        assert!(matches!(result, Err(DomainError::InvalidDateRange(_))));
    }

    #[test]
    fn computes_nights_and_price() {
        let p = StayPeriod::new(day(1), day(4)).unwrap();
        assert_eq!(p.nights(), 3);
        assert_eq!(p.total_price(Decimal::new(9950, 2)), Decimal::new(29850, 2));
    }

    #[test]
    fn back_to_back_stays_do_not_overlap() {
        let first = StayPeriod::new(day(1), day(3)).unwrap();
        let second = StayPeriod::new(day(3), day(5)).unwrap();
        let inner = StayPeriod::new(day(2), day(4)).unwrap();
        assert!(!first.overlaps(&second));
        assert!(!second.overlaps(&first));
        assert!(first.overlaps(&inner));
        assert!(inner.overlaps(&second));
    }
}
