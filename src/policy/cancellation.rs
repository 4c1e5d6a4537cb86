//! Cancellation policy: tiered refund/penalty split by lead time.

use chrono::NaiveDate;

use super::PolicyConfig;
use crate::domain::Money;
use crate::error::EngineError;

/// Refund/penalty split for a confirmed cancellation.
///
/// `refund_amount + penalty_amount == total` always.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancellationOutcome {
    /// Amount returned to the guest.
    pub refund_amount: Money,
    /// Amount retained by the property.
    pub penalty_amount: Money,
    /// Refund as a whole percentage (100 or 0 under the current tiers).
    pub refund_percentage: u8,
}

/// Computes the refund/penalty split for cancelling a stay.
///
/// One threshold drives both tiers: at or beyond
/// `policy.free_cancel_threshold_days` days before check-in the guest is
/// refunded in full; inside the window the whole amount is retained.
///
/// # Errors
///
/// Returns [`EngineError::BookingAlreadyStarted`] when check-in has
/// already passed; no refund computation occurs in that case.
pub fn cancellation_outcome(
    check_in: NaiveDate,
    total: Money,
    today: NaiveDate,
    policy: &PolicyConfig,
) -> Result<CancellationOutcome, EngineError> {
    let days_until_check_in = (check_in - today).num_days();
    if days_until_check_in < 0 {
        return Err(EngineError::BookingAlreadyStarted);
    }

    if days_until_check_in >= policy.free_cancel_threshold_days {
        Ok(CancellationOutcome {
            refund_amount: total,
            penalty_amount: Money::ZERO,
            refund_percentage: 100,
        })
    } else {
        Ok(CancellationOutcome {
            refund_amount: Money::ZERO,
            penalty_amount: total,
            refund_percentage: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
    }

    #[test]
    fn ten_days_out_is_a_full_refund() {
        let outcome = cancellation_outcome(
            date(2026, 9, 11),
            Money::from_minor(20_000),
            date(2026, 9, 1),
            &PolicyConfig::default(),
        );
        let Ok(outcome) = outcome else {
            unreachable!("outcome must compute");
        };
        assert_eq!(outcome.refund_amount.minor(), 20_000);
        assert_eq!(outcome.penalty_amount.minor(), 0);
        assert_eq!(outcome.refund_percentage, 100);
    }

    #[test]
    fn three_days_out_forfeits_everything() {
        let outcome = cancellation_outcome(
            date(2026, 9, 4),
            Money::from_minor(20_000),
            date(2026, 9, 1),
            &PolicyConfig::default(),
        );
        let Ok(outcome) = outcome else {
            unreachable!("outcome must compute");
        };
        assert_eq!(outcome.refund_amount.minor(), 0);
        assert_eq!(outcome.penalty_amount.minor(), 20_000);
        assert_eq!(outcome.refund_percentage, 0);
    }

    #[test]
    fn exactly_seven_days_is_still_free() {
        let outcome = cancellation_outcome(
            date(2026, 9, 8),
            Money::from_minor(20_000),
            date(2026, 9, 1),
            &PolicyConfig::default(),
        );
        let Ok(outcome) = outcome else {
            unreachable!("outcome must compute");
        };
        assert_eq!(outcome.refund_percentage, 100);
    }

    #[test]
    fn started_stay_cannot_be_cancelled() {
        let outcome = cancellation_outcome(
            date(2026, 8, 30),
            Money::from_minor(20_000),
            date(2026, 9, 1),
            &PolicyConfig::default(),
        );
        assert!(matches!(outcome, Err(EngineError::BookingAlreadyStarted)));
    }

    #[test]
    fn refund_plus_penalty_always_reconciles() {
        let policy = PolicyConfig::default();
        let today = date(2026, 9, 1);
        for total in [0_i64, 1, 99, 12_345, 20_000, 987_654] {
            for offset in 0..30 {
                let check_in = today + chrono::Duration::days(offset);
                let Ok(outcome) =
                    cancellation_outcome(check_in, Money::from_minor(total), today, &policy)
                else {
                    unreachable!("future check-in must compute");
                };
                assert_eq!(
                    outcome.refund_amount.minor() + outcome.penalty_amount.minor(),
                    total
                );
            }
        }
    }
}
