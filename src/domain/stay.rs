//! Calendar stay ranges.
//!
//! [`StayDates`] is the canonical check-in/check-out pair. Check-out is
//! exclusive: a Friday-to-Sunday stay is two nights. The constructor is
//! the single place the `nights >= 1` invariant is enforced, so every
//! `StayDates` in the system is priceable.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::EngineError;

/// A validated check-in/check-out date pair (check-out exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StayDates {
    /// Arrival date.
    pub check_in: NaiveDate,
    /// Departure date (exclusive).
    pub check_out: NaiveDate,
}

impl StayDates {
    /// Creates a stay range, rejecting empty or inverted ranges.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidDateRange`] when
    /// `check_out <= check_in`.
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, EngineError> {
        if check_out <= check_in {
            return Err(EngineError::InvalidDateRange(format!(
                "check-out {check_out} must be after check-in {check_in}"
            )));
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    /// Number of nights in the stay. Always `>= 1` by construction.
    #[must_use]
    pub fn nights(&self) -> u32 {
        let days = (self.check_out - self.check_in).num_days();
        u32::try_from(days).unwrap_or(0)
    }

    /// Whole days from `today` until check-in. Negative once the stay
    /// has started.
    #[must_use]
    pub fn days_until_check_in(&self, today: NaiveDate) -> i64 {
        (self.check_in - today).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
    }

    #[test]
    fn nights_counts_checkout_exclusive() {
        let stay = StayDates::new(date(2026, 9, 4), date(2026, 9, 6));
        assert!(stay.is_ok());
        if let Ok(stay) = stay {
            assert_eq!(stay.nights(), 2);
        }
    }

    #[test]
    fn empty_range_is_rejected() {
        let same_day = StayDates::new(date(2026, 9, 4), date(2026, 9, 4));
        assert!(same_day.is_err());

        let inverted = StayDates::new(date(2026, 9, 6), date(2026, 9, 4));
        assert!(matches!(inverted, Err(EngineError::InvalidDateRange(_))));
    }

    #[test]
    fn days_until_check_in_goes_negative_after_start() {
        let Ok(stay) = StayDates::new(date(2026, 9, 4), date(2026, 9, 6)) else {
            return;
        };
        assert_eq!(stay.days_until_check_in(date(2026, 8, 28)), 7);
        assert_eq!(stay.days_until_check_in(date(2026, 9, 4)), 0);
        assert_eq!(stay.days_until_check_in(date(2026, 9, 5)), -1);
    }
}
