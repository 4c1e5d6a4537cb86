//! Pricing engine: guest-tiered nightly pricing.

use crate::domain::{Money, RatePlan};
use crate::error::EngineError;

/// Prices a stay of `nights` nights for `guests` guests under `plan`.
///
/// Pricing is tiered, not linear: the nightly rate covers up to
/// `plan.base_occupancy` guests and each guest above that adds a fixed
/// per-night surcharge. The result is monotonically non-decreasing in
/// `guests` for a fixed `nights`. Pure integer arithmetic throughout.
///
/// # Errors
///
/// - [`EngineError::InvalidRequest`] when `nights == 0` or `guests == 0`.
/// - [`EngineError::GuestLimitExceeded`] when `guests > plan.max_guests`.
pub fn price_for_stay(plan: &RatePlan, guests: u32, nights: u32) -> Result<Money, EngineError> {
    if nights == 0 {
        return Err(EngineError::InvalidRequest(
            "a stay must be at least one night".to_string(),
        ));
    }
    if guests == 0 {
        return Err(EngineError::InvalidRequest(
            "a booking must have at least one guest".to_string(),
        ));
    }
    if guests > plan.max_guests {
        return Err(EngineError::GuestLimitExceeded {
            requested: guests,
            max: plan.max_guests,
        });
    }

    let base = plan.nightly_rate.checked_mul(nights)?;
    let extra_guests = guests.saturating_sub(plan.base_occupancy);
    let surcharge = plan.extra_guest_fee.checked_mul(nights)?.checked_mul(extra_guests)?;
    base.checked_add(surcharge)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> RatePlan {
        RatePlan {
            nightly_rate: Money::from_minor(8_000),
            base_occupancy: 2,
            extra_guest_fee: Money::from_minor(2_000),
            max_guests: 4,
        }
    }

    #[test]
    fn base_occupancy_is_included_in_nightly_rate() {
        // 1 and 2 guests price identically: the base rate covers both.
        let one = price_for_stay(&plan(), 1, 3);
        let two = price_for_stay(&plan(), 2, 3);
        assert_eq!(one.as_ref().ok(), two.as_ref().ok());
        assert_eq!(two.ok().map(Money::minor), Some(24_000));
    }

    #[test]
    fn extra_guests_add_per_night_surcharge() {
        // 3 nights, one guest above base: 24000 + 3 * 2000
        let three = price_for_stay(&plan(), 3, 3);
        assert_eq!(three.ok().map(Money::minor), Some(30_000));
        // Two guests above base.
        let four = price_for_stay(&plan(), 4, 3);
        assert_eq!(four.ok().map(Money::minor), Some(36_000));
    }

    #[test]
    fn monotone_in_guest_count() {
        for nights in 1..=14 {
            let mut previous = Money::ZERO;
            for guests in 1..=4 {
                let Ok(price) = price_for_stay(&plan(), guests, nights) else {
                    unreachable!("in-range inputs must price");
                };
                assert!(price >= previous, "price dropped at {guests} guests");
                previous = price;
            }
        }
    }

    #[test]
    fn rejects_out_of_range_inputs() {
        assert!(matches!(
            price_for_stay(&plan(), 2, 0),
            Err(EngineError::InvalidRequest(_))
        ));
        assert!(matches!(
            price_for_stay(&plan(), 0, 2),
            Err(EngineError::InvalidRequest(_))
        ));
        assert!(matches!(
            price_for_stay(&plan(), 5, 2),
            Err(EngineError::GuestLimitExceeded {
                requested: 5,
                max: 4
            })
        ));
    }
}
