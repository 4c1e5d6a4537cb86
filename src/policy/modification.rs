//! Modification policy: price deltas for date and guest-count changes.
//!
//! These functions only compute; the settlement branch (collect the
//! difference, refund the difference, or commit directly) belongs to
//! [`crate::service::BookingService`].

use chrono::NaiveDate;

use super::PolicyConfig;
use super::pricing::price_for_stay;
use crate::domain::{Booking, BookingStatus, Money, RatePlan, StayDates};
use crate::error::EngineError;

/// Quote for a proposed date change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateChangeQuote {
    /// New stay priced with the original guest count.
    pub new_base_amount: Money,
    /// Late-change penalty (percentage of the *original* total; zero when
    /// the original check-in is far enough away).
    pub penalty: Money,
    /// `new_base_amount + penalty − original_total`, signed minor units.
    /// Positive: the guest owes; negative: the guest is owed.
    pub delta: i64,
    /// The validated new stay range.
    pub new_stay: StayDates,
}

/// Computes the quote for moving `booking` to a new date range.
///
/// The new stay is priced with the booking's *original* guest count. The
/// lead-time penalty is keyed to the *original* check-in: changing a stay
/// less than the threshold days before it begins costs a flat percentage
/// of the original total, independent of where the dates move.
///
/// # Errors
///
/// - [`EngineError::BookingCancelled`] when the booking is cancelled.
/// - [`EngineError::InvalidDateRange`] when the new check-in is in the
///   past or the range is empty.
/// - Any pricing error for the new stay.
pub fn date_change_quote(
    booking: &Booking,
    plan: &RatePlan,
    new_check_in: NaiveDate,
    new_check_out: NaiveDate,
    today: NaiveDate,
    policy: &PolicyConfig,
) -> Result<DateChangeQuote, EngineError> {
    if booking.status == BookingStatus::Cancelled {
        return Err(EngineError::BookingCancelled(booking.id));
    }
    if new_check_in < today {
        return Err(EngineError::InvalidDateRange(
            "new check-in cannot be in the past".to_string(),
        ));
    }
    let new_stay = StayDates::new(new_check_in, new_check_out)?;

    let new_base_amount = price_for_stay(plan, booking.guests, new_stay.nights())?;

    let penalty = if booking.days_until_check_in(today) < policy.free_cancel_threshold_days {
        booking.total_amount.percent(policy.late_change_penalty_pct)
    } else {
        Money::ZERO
    };

    let owed = new_base_amount.checked_add(penalty)?;
    let delta = owed
        .minor()
        .checked_sub(booking.total_amount.minor())
        .ok_or_else(|| EngineError::Internal("money overflow in date-change delta".to_string()))?;

    Ok(DateChangeQuote {
        new_base_amount,
        penalty,
        delta,
        new_stay,
    })
}

/// Computes the price difference for raising the guest count.
///
/// Only additions are supported; the difference is non-negative by the
/// monotonicity of [`price_for_stay`].
///
/// # Errors
///
/// - [`EngineError::BookingCancelled`] when the booking is cancelled.
/// - [`EngineError::GuestReductionUnsupported`] when `new_guests` is
///   below the current count.
/// - [`EngineError::InvalidRequest`] when the count is unchanged.
/// - [`EngineError::GuestLimitExceeded`] when `new_guests` exceeds the
///   room maximum.
pub fn guest_change_price(
    booking: &Booking,
    plan: &RatePlan,
    new_guests: u32,
) -> Result<Money, EngineError> {
    if booking.status == BookingStatus::Cancelled {
        return Err(EngineError::BookingCancelled(booking.id));
    }
    if new_guests < booking.guests {
        return Err(EngineError::GuestReductionUnsupported);
    }
    if new_guests == booking.guests {
        return Err(EngineError::InvalidRequest(
            "guest count is unchanged".to_string(),
        ));
    }

    let nights = booking.nights();
    let new_price = price_for_stay(plan, new_guests, nights)?;
    let old_price = price_for_stay(plan, booking.guests, nights)?;
    new_price.checked_sub(old_price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GuestContact;
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
    }

    fn plan(nightly: i64) -> RatePlan {
        RatePlan {
            nightly_rate: Money::from_minor(nightly),
            base_occupancy: 2,
            extra_guest_fee: Money::from_minor(2_000),
            max_guests: 4,
        }
    }

    fn booking(check_in: NaiveDate, check_out: NaiveDate, total: i64) -> Booking {
        let Ok(stay) = StayDates::new(check_in, check_out) else {
            unreachable!("test stay must be valid");
        };
        let mut booking = Booking::new_site(
            "camera-rosa".to_string(),
            stay,
            2,
            Money::from_minor(total),
            "EUR".to_string(),
            GuestContact::default(),
            30,
            Utc::now(),
        );
        booking.status = BookingStatus::Confirmed;
        booking
    }

    #[test]
    fn late_date_change_adds_half_of_original_total() {
        // Scenario: original check-in 3 days out, original total 300.00;
        // the new two-night stay prices at 280.00.
        let today = date(2026, 9, 1);
        let booking = booking(date(2026, 9, 4), date(2026, 9, 6), 30_000);
        let quote = date_change_quote(
            &booking,
            &plan(14_000),
            date(2026, 9, 20),
            date(2026, 9, 22),
            today,
            &PolicyConfig::default(),
        );
        let Ok(quote) = quote else {
            unreachable!("quote must succeed");
        };
        assert_eq!(quote.new_base_amount.minor(), 28_000);
        assert_eq!(quote.penalty.minor(), 15_000);
        assert_eq!(quote.delta, 13_000);
    }

    #[test]
    fn early_date_change_carries_no_penalty() {
        let today = date(2026, 9, 1);
        let booking = booking(date(2026, 9, 10), date(2026, 9, 12), 28_000);
        let quote = date_change_quote(
            &booking,
            &plan(14_000),
            date(2026, 9, 20),
            date(2026, 9, 23),
            today,
            &PolicyConfig::default(),
        );
        let Ok(quote) = quote else {
            unreachable!("quote must succeed");
        };
        assert_eq!(quote.penalty, Money::ZERO);
        // Three nights at 140.00 against a two-night original.
        assert_eq!(quote.delta, 42_000 - 28_000);
    }

    #[test]
    fn delta_round_trips_exactly() {
        // Apply the delta, then quote the change back to the original
        // dates: integer money must return to the starting total.
        let today = date(2026, 9, 1);
        let original = booking(date(2026, 9, 10), date(2026, 9, 12), 28_000);
        let rate = plan(14_000);
        let policy = PolicyConfig::default();

        let Ok(there) = date_change_quote(
            &original,
            &rate,
            date(2026, 9, 20),
            date(2026, 9, 23),
            today,
            &policy,
        ) else {
            unreachable!("quote must succeed");
        };
        let mut moved = original.clone();
        moved.stay = there.new_stay;
        let Ok(new_total) = original.total_amount.checked_add(Money::from_minor(there.delta))
        else {
            unreachable!("delta must apply");
        };
        moved.set_total(new_total, policy.deposit_pct, Utc::now());
        assert_eq!(moved.total_amount.minor(), 42_000);

        let Ok(back) = date_change_quote(
            &moved,
            &rate,
            original.stay.check_in,
            original.stay.check_out,
            today,
            &policy,
        ) else {
            unreachable!("quote must succeed");
        };
        assert_eq!(moved.total_amount.minor() + back.delta, 28_000);
    }

    #[test]
    fn rejects_past_or_empty_ranges() {
        let today = date(2026, 9, 1);
        let booking = booking(date(2026, 9, 10), date(2026, 9, 12), 28_000);
        let past = date_change_quote(
            &booking,
            &plan(14_000),
            date(2026, 8, 20),
            date(2026, 8, 22),
            today,
            &PolicyConfig::default(),
        );
        assert!(matches!(past, Err(EngineError::InvalidDateRange(_))));

        let empty = date_change_quote(
            &booking,
            &plan(14_000),
            date(2026, 9, 20),
            date(2026, 9, 20),
            today,
            &PolicyConfig::default(),
        );
        assert!(matches!(empty, Err(EngineError::InvalidDateRange(_))));
    }

    #[test]
    fn cancelled_booking_cannot_be_requoted() {
        let today = date(2026, 9, 1);
        let mut booking = booking(date(2026, 9, 10), date(2026, 9, 12), 28_000);
        booking.status = BookingStatus::Cancelled;
        let quote = date_change_quote(
            &booking,
            &plan(14_000),
            date(2026, 9, 20),
            date(2026, 9, 22),
            today,
            &PolicyConfig::default(),
        );
        assert!(matches!(quote, Err(EngineError::BookingCancelled(_))));
        assert!(matches!(
            guest_change_price(&booking, &plan(14_000), 3),
            Err(EngineError::BookingCancelled(_))
        ));
    }

    #[test]
    fn adding_a_guest_prices_the_surcharge() {
        // Room max 4, base 2 included, 20.00 per night per extra guest,
        // 3 nights: going from 2 to 3 guests costs 60.00.
        let booking = booking(date(2026, 9, 10), date(2026, 9, 13), 24_000);
        let diff = guest_change_price(&booking, &plan(8_000), 3);
        assert_eq!(diff.ok().map(Money::minor), Some(6_000));

        let over = guest_change_price(&booking, &plan(8_000), 5);
        assert!(matches!(
            over,
            Err(EngineError::GuestLimitExceeded {
                requested: 5,
                max: 4
            })
        ));
    }

    #[test]
    fn guest_reduction_is_not_supported() {
        let mut booking = booking(date(2026, 9, 10), date(2026, 9, 13), 30_000);
        booking.guests = 3;
        assert!(matches!(
            guest_change_price(&booking, &plan(8_000), 2),
            Err(EngineError::GuestReductionUnsupported)
        ));
        assert!(matches!(
            guest_change_price(&booking, &plan(8_000), 3),
            Err(EngineError::InvalidRequest(_))
        ));
    }
}
