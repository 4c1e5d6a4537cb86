//! The central booking entity.
//!
//! A [`Booking`] is created in `Pending` state by the site checkout flow,
//! or directly `Confirmed` when imported from a channel manager. It is
//! never hard-deleted: cancellation is a status flag plus audit fields.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{BookingId, Money, StayDates};

/// Sales channel that created a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Created by this site's own checkout flow.
    Site,
    /// Imported from Booking.com via a channel manager.
    Booking,
    /// Imported from Airbnb via a channel manager.
    Airbnb,
    /// Entered directly by the owner (phone, walk-in).
    Direct,
    /// Recognized channel that maps to no specific tag.
    Other,
}

impl Origin {
    /// Stable string form used in persistence and JSON.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Site => "site",
            Self::Booking => "booking",
            Self::Airbnb => "airbnb",
            Self::Direct => "direct",
            Self::Other => "other",
        }
    }

    /// Parses the stable string form back into an origin.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "site" => Some(Self::Site),
            "booking" => Some(Self::Booking),
            "airbnb" => Some(Self::Airbnb),
            "direct" => Some(Self::Direct),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Booking lifecycle status.
///
/// Transitions are monotonic: `Pending → Paid → Confirmed`, and any
/// non-cancelled state may move to `Cancelled` (terminal). See
/// [`super::transition`] for the transition rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Created by checkout, payment not yet confirmed.
    Pending,
    /// Deposit payment confirmed by the gateway.
    Paid,
    /// Stay confirmed (locally after payment, or imported as such).
    Confirmed,
    /// Terminal: cancelled by guest or admin.
    Cancelled,
}

impl BookingStatus {
    /// Stable string form used in persistence and JSON.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses the stable string form back into a status.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "paid" => Some(Self::Paid),
            "confirmed" => Some(Self::Confirmed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns `true` for the terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Guest contact details attached to a booking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GuestContact {
    /// Given name.
    pub first_name: String,
    /// Surname; also the fuzzy-dedup key component.
    pub last_name: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    pub phone: String,
}

/// Audit record of the most recent refund issued for a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RefundRecord {
    /// Refunded amount in minor units.
    pub amount: Money,
    /// Human-readable reason (e.g. `"free cancellation"`).
    pub reason: String,
    /// When the refund was issued (or attempted).
    pub refunded_at: DateTime<Utc>,
}

/// The central booking entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Booking {
    /// Store-assigned identity.
    pub id: BookingId,
    /// External identity reported by the channel manager, when known.
    /// Primary dedup key for imports.
    pub channel_booking_id: Option<String>,
    /// Raw channel id/name as reported by the feed, kept for debugging.
    pub channel_name: Option<String>,
    /// Room the stay occupies.
    pub room_id: String,
    /// Check-in/check-out pair.
    pub stay: StayDates,
    /// Number of guests (>= 1, <= room max).
    pub guests: u32,
    /// Total price in minor currency units.
    pub total_amount: Money,
    /// ISO currency code.
    pub currency: String,
    /// Deposit portion of the total (30% by default policy).
    pub deposit_paid: Money,
    /// Balance due at the property.
    pub balance_due: Money,
    /// Sales channel that created the booking.
    pub origin: Origin,
    /// Lifecycle status.
    pub status: BookingStatus,
    /// Guest contact details.
    pub contact: GuestContact,
    /// Payment gateway reference once the deposit is confirmed.
    pub payment_ref: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// When the booking was cancelled, if it was.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Most recent refund, if any.
    pub last_refund: Option<RefundRecord>,
}

impl Booking {
    /// Creates a new `Pending` booking for the site checkout flow.
    ///
    /// `deposit_pct` drives the deposit/balance split of the total.
    #[must_use]
    pub fn new_site(
        room_id: String,
        stay: StayDates,
        guests: u32,
        total_amount: Money,
        currency: String,
        contact: GuestContact,
        deposit_pct: u32,
        now: DateTime<Utc>,
    ) -> Self {
        let (deposit_paid, balance_due) = total_amount.deposit_split(deposit_pct);
        Self {
            id: BookingId::new(),
            channel_booking_id: None,
            channel_name: None,
            room_id,
            stay,
            guests,
            total_amount,
            currency,
            deposit_paid,
            balance_due,
            origin: Origin::Site,
            status: BookingStatus::Pending,
            contact,
            payment_ref: None,
            created_at: now,
            updated_at: now,
            cancelled_at: None,
            last_refund: None,
        }
    }

    /// Number of nights in the stay.
    #[must_use]
    pub fn nights(&self) -> u32 {
        self.stay.nights()
    }

    /// Guest surname used as the fuzzy-dedup key component.
    #[must_use]
    pub fn guest_last(&self) -> &str {
        &self.contact.last_name
    }

    /// Whole days from `today` until check-in.
    #[must_use]
    pub fn days_until_check_in(&self, today: NaiveDate) -> i64 {
        self.stay.days_until_check_in(today)
    }

    /// Replaces the total amount and recomputes the deposit/balance
    /// split, keeping `deposit_paid + balance_due == total_amount`.
    pub fn set_total(&mut self, total: Money, deposit_pct: u32, now: DateTime<Utc>) {
        let (deposit, balance) = total.deposit_split(deposit_pct);
        self.total_amount = total;
        self.deposit_paid = deposit;
        self.balance_due = balance;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_stay() -> StayDates {
        let check_in = NaiveDate::from_ymd_opt(2026, 9, 10).unwrap_or_default();
        let check_out = NaiveDate::from_ymd_opt(2026, 9, 13).unwrap_or_default();
        StayDates {
            check_in,
            check_out,
        }
    }

    #[test]
    fn new_site_booking_is_pending_with_split() {
        let booking = Booking::new_site(
            "camera-verde".to_string(),
            sample_stay(),
            2,
            Money::from_minor(30_000),
            "EUR".to_string(),
            GuestContact::default(),
            30,
            Utc::now(),
        );
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.origin, Origin::Site);
        assert_eq!(booking.deposit_paid.minor(), 9_000);
        assert_eq!(booking.balance_due.minor(), 21_000);
        assert_eq!(booking.nights(), 3);
    }

    #[test]
    fn set_total_recomputes_split() {
        let mut booking = Booking::new_site(
            "camera-verde".to_string(),
            sample_stay(),
            2,
            Money::from_minor(30_000),
            "EUR".to_string(),
            GuestContact::default(),
            30,
            Utc::now(),
        );
        booking.set_total(Money::from_minor(43_000), 30, Utc::now());
        assert_eq!(booking.total_amount.minor(), 43_000);
        assert_eq!(
            booking.deposit_paid.minor() + booking.balance_due.minor(),
            43_000
        );
    }

    #[test]
    fn status_and_origin_string_forms_round_trip() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Paid,
            BookingStatus::Confirmed,
            BookingStatus::Cancelled,
        ] {
            assert_eq!(BookingStatus::parse(status.as_str()), Some(status));
        }
        for origin in [
            Origin::Site,
            Origin::Booking,
            Origin::Airbnb,
            Origin::Direct,
            Origin::Other,
        ] {
            assert_eq!(Origin::parse(origin.as_str()), Some(origin));
        }
        assert_eq!(BookingStatus::parse("unknown"), None);
        assert_eq!(Origin::parse("expedia"), None);
    }
}
