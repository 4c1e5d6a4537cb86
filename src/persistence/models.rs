//! Database row models and their conversions into domain types.
//!
//! The store is schemaless from the domain's point of view: status and
//! origin come back as text. Conversion parses and validates at the
//! boundary instead of trusting field shapes downstream.

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{
    Booking, BookingId, BookingStatus, GuestContact, Money, Origin, RatePlan, RefundRecord, Room,
    StayDates,
};
use crate::error::EngineError;

/// A booking row from the `bookings` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookingRow {
    /// Booking UUID.
    pub id: uuid::Uuid,
    /// External channel identity, when imported.
    pub channel_booking_id: Option<String>,
    /// Raw channel id/name from the feed.
    pub channel_name: Option<String>,
    /// Room identifier.
    pub room_id: String,
    /// Arrival date.
    pub check_in: NaiveDate,
    /// Departure date (exclusive).
    pub check_out: NaiveDate,
    /// Guest count.
    pub guests: i32,
    /// Total in minor units.
    pub total_amount: i64,
    /// ISO currency code.
    pub currency: String,
    /// Deposit portion in minor units.
    pub deposit_paid: i64,
    /// Balance portion in minor units.
    pub balance_due: i64,
    /// Origin tag as text.
    pub origin: String,
    /// Status as text.
    pub status: String,
    /// Guest given name.
    pub first_name: String,
    /// Guest surname.
    pub last_name: String,
    /// Guest email.
    pub email: String,
    /// Guest phone.
    pub phone: String,
    /// Gateway payment reference.
    pub payment_ref: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Cancellation timestamp.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Last refund amount in minor units.
    pub refund_amount: Option<i64>,
    /// Last refund reason.
    pub refund_reason: Option<String>,
    /// Last refund timestamp.
    pub refunded_at: Option<DateTime<Utc>>,
}

impl BookingRow {
    /// Converts the row into a domain [`Booking`], validating the parts
    /// a schemaless store cannot guarantee.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Persistence`] when the status or origin
    /// text is unknown, or the stored date range is empty.
    pub fn into_booking(self) -> Result<Booking, EngineError> {
        let status = BookingStatus::parse(&self.status).ok_or_else(|| {
            EngineError::Persistence(format!("unknown booking status {:?}", self.status))
        })?;
        let origin = Origin::parse(&self.origin).ok_or_else(|| {
            EngineError::Persistence(format!("unknown booking origin {:?}", self.origin))
        })?;
        let stay = StayDates::new(self.check_in, self.check_out).map_err(|_| {
            EngineError::Persistence(format!(
                "stored stay {}..{} is empty",
                self.check_in, self.check_out
            ))
        })?;
        let last_refund = match (self.refund_amount, self.refunded_at) {
            (Some(amount), Some(refunded_at)) => Some(RefundRecord {
                amount: Money::from_minor(amount),
                reason: self.refund_reason.unwrap_or_default(),
                refunded_at,
            }),
            _ => None,
        };
        Ok(Booking {
            id: BookingId::from_uuid(self.id),
            channel_booking_id: self.channel_booking_id,
            channel_name: self.channel_name,
            room_id: self.room_id,
            stay,
            guests: u32::try_from(self.guests).unwrap_or(0),
            total_amount: Money::from_minor(self.total_amount),
            currency: self.currency,
            deposit_paid: Money::from_minor(self.deposit_paid),
            balance_due: Money::from_minor(self.balance_due),
            origin,
            status,
            contact: GuestContact {
                first_name: self.first_name,
                last_name: self.last_name,
                email: self.email,
                phone: self.phone,
            },
            payment_ref: self.payment_ref,
            created_at: self.created_at,
            updated_at: self.updated_at,
            cancelled_at: self.cancelled_at,
            last_refund,
        })
    }
}

/// A room row from the `rooms` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RoomRow {
    /// Room identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Nightly rate in minor units.
    pub nightly_rate: i64,
    /// Guests included in the nightly rate.
    pub base_occupancy: i32,
    /// Per-night surcharge per extra guest, minor units.
    pub extra_guest_fee: i64,
    /// Maximum occupancy.
    pub max_guests: i32,
}

impl From<RoomRow> for Room {
    fn from(row: RoomRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            rate_plan: RatePlan {
                nightly_rate: Money::from_minor(row.nightly_rate),
                base_occupancy: u32::try_from(row.base_occupancy).unwrap_or(0),
                extra_guest_fee: Money::from_minor(row.extra_guest_fee),
                max_guests: u32::try_from(row.max_guests).unwrap_or(0),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> BookingRow {
        BookingRow {
            id: uuid::Uuid::new_v4(),
            channel_booking_id: Some("B24-1".to_string()),
            channel_name: Some("airbnb".to_string()),
            room_id: "camera-blu".to_string(),
            check_in: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap_or_default(),
            check_out: NaiveDate::from_ymd_opt(2026, 10, 3).unwrap_or_default(),
            guests: 2,
            total_amount: 20_000,
            currency: "EUR".to_string(),
            deposit_paid: 6_000,
            balance_due: 14_000,
            origin: "airbnb".to_string(),
            status: "confirmed".to_string(),
            first_name: "Anna".to_string(),
            last_name: "Rossi".to_string(),
            email: "anna@example.com".to_string(),
            phone: String::new(),
            payment_ref: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            cancelled_at: None,
            refund_amount: None,
            refund_reason: None,
            refunded_at: None,
        }
    }

    #[test]
    fn valid_row_converts() {
        let booking = sample_row().into_booking();
        let Ok(booking) = booking else {
            unreachable!("valid row must convert");
        };
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.origin, Origin::Airbnb);
        assert_eq!(booking.nights(), 2);
    }

    #[test]
    fn unknown_status_is_rejected_at_the_boundary() {
        let mut row = sample_row();
        row.status = "archived".to_string();
        assert!(matches!(
            row.into_booking(),
            Err(EngineError::Persistence(_))
        ));
    }

    #[test]
    fn empty_stored_range_is_rejected() {
        let mut row = sample_row();
        row.check_out = row.check_in;
        assert!(matches!(
            row.into_booking(),
            Err(EngineError::Persistence(_))
        ));
    }
}
