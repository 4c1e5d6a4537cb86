//! Integer money arithmetic in minor currency units.
//!
//! All monetary amounts in the engine are [`Money`] — an `i64` count of
//! minor currency units (cents). Floating point never touches money:
//! percentage computations widen to `i128` and apply a single
//! round-half-up at the end, so the same inputs always reconcile to the
//! same output during both UI preview and server-side confirmation.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::EngineError;

/// A monetary amount in minor currency units (e.g. euro cents).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema, Default,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from minor currency units.
    #[must_use]
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the amount in minor currency units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Internal`] on arithmetic overflow.
    pub fn checked_add(self, other: Self) -> Result<Self, EngineError> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or_else(|| EngineError::Internal("money overflow in addition".to_string()))
    }

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Internal`] on arithmetic overflow.
    pub fn checked_sub(self, other: Self) -> Result<Self, EngineError> {
        self.0
            .checked_sub(other.0)
            .map(Self)
            .ok_or_else(|| EngineError::Internal("money overflow in subtraction".to_string()))
    }

    /// Checked multiplication by a unit count (nights, guests).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Internal`] on arithmetic overflow.
    pub fn checked_mul(self, count: u32) -> Result<Self, EngineError> {
        self.0
            .checked_mul(i64::from(count))
            .map(Self)
            .ok_or_else(|| EngineError::Internal("money overflow in multiplication".to_string()))
    }

    /// Computes `pct` percent of this amount, rounding half-up once.
    ///
    /// Defined for non-negative amounts (totals and penalties are never
    /// negative). The intermediate product is widened to `i128`, so no
    /// realistic amount can overflow.
    #[must_use]
    pub fn percent(self, pct: u32) -> Self {
        let scaled = i128::from(self.0) * i128::from(pct);
        let rounded = (scaled + 50) / 100;
        #[allow(clippy::cast_possible_truncation)]
        Self(rounded as i64)
    }

    /// Splits this amount into `(deposit, balance)` where the deposit is
    /// `deposit_pct` percent (round-half-up) and the balance is the exact
    /// remainder, so `deposit + balance == total` always.
    #[must_use]
    pub fn deposit_split(self, deposit_pct: u32) -> (Self, Self) {
        let deposit = self.percent(deposit_pct);
        let balance = Self(self.0 - deposit.0);
        (deposit, balance)
    }

    /// Returns `true` if the amount is strictly positive.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let major = self.0 / 100;
        let minor = (self.0 % 100).abs();
        write!(f, "{major}.{minor:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_half_up() {
        // 50% of 3 cents is 1.5 -> rounds up to 2
        assert_eq!(Money::from_minor(3).percent(50).minor(), 2);
        // 30% of 12345 is 3703.5 -> 3704
        assert_eq!(Money::from_minor(12_345).percent(30).minor(), 3704);
        // Exact values stay exact
        assert_eq!(Money::from_minor(20_000).percent(50).minor(), 10_000);
        assert_eq!(Money::from_minor(20_000).percent(100).minor(), 20_000);
        assert_eq!(Money::from_minor(20_000).percent(0).minor(), 0);
    }

    #[test]
    fn deposit_split_reconciles_exactly() {
        for total in [0_i64, 1, 99, 100, 12_345, 20_000, 99_999] {
            let money = Money::from_minor(total);
            let (deposit, balance) = money.deposit_split(30);
            assert_eq!(deposit.minor() + balance.minor(), total);
        }
    }

    #[test]
    fn checked_ops_reject_overflow() {
        let max = Money::from_minor(i64::MAX);
        assert!(max.checked_add(Money::from_minor(1)).is_err());
        assert!(max.checked_mul(2).is_err());
        assert!(Money::from_minor(i64::MIN).checked_sub(Money::from_minor(1)).is_err());
    }

    #[test]
    fn display_formats_major_units() {
        assert_eq!(Money::from_minor(20_000).to_string(), "200.00");
        assert_eq!(Money::from_minor(105).to_string(), "1.05");
        assert_eq!(Money::from_minor(0).to_string(), "0.00");
    }
}
