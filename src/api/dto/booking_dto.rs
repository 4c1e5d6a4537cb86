//! Booking DTOs for create, get, list, and payment-callback operations.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Booking, BookingId, Money, RefundRecord, Room};

/// Request body for `POST /bookings`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBookingRequest {
    /// Room identifier.
    pub room_id: String,
    /// Arrival date (`YYYY-MM-DD`).
    pub check_in: NaiveDate,
    /// Departure date, exclusive (`YYYY-MM-DD`).
    pub check_out: NaiveDate,
    /// Guest count.
    pub guests: u32,
    /// Guest given name.
    pub first_name: String,
    /// Guest surname.
    pub last_name: String,
    /// Guest email.
    pub email: String,
    /// Guest phone.
    #[serde(default)]
    pub phone: String,
}

/// Full booking view returned by every booking endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingResponse {
    /// Booking identifier.
    pub id: BookingId,
    /// Channel-manager id for imported bookings.
    pub channel_booking_id: Option<String>,
    /// Room identifier.
    pub room_id: String,
    /// Arrival date.
    pub check_in: NaiveDate,
    /// Departure date (exclusive).
    pub check_out: NaiveDate,
    /// Nights in the stay.
    pub nights: u32,
    /// Guest count.
    pub guests: u32,
    /// Total price, minor units.
    pub total_amount: Money,
    /// ISO currency code.
    pub currency: String,
    /// Deposit portion, minor units.
    pub deposit_paid: Money,
    /// Balance due at the property, minor units.
    pub balance_due: Money,
    /// Sales channel tag.
    pub origin: String,
    /// Lifecycle status.
    pub status: String,
    /// Guest given name.
    pub first_name: String,
    /// Guest surname.
    pub last_name: String,
    /// Guest email.
    pub email: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Cancellation timestamp, when cancelled.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Most recent refund, when one was issued.
    pub last_refund: Option<RefundRecord>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            channel_booking_id: booking.channel_booking_id,
            room_id: booking.room_id,
            check_in: booking.stay.check_in,
            check_out: booking.stay.check_out,
            nights: booking.stay.nights(),
            guests: booking.guests,
            total_amount: booking.total_amount,
            currency: booking.currency,
            deposit_paid: booking.deposit_paid,
            balance_due: booking.balance_due,
            origin: booking.origin.as_str().to_string(),
            status: booking.status.as_str().to_string(),
            first_name: booking.contact.first_name,
            last_name: booking.contact.last_name,
            email: booking.contact.email,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
            cancelled_at: booking.cancelled_at,
            last_refund: booking.last_refund,
        }
    }
}

/// Response body for `POST /bookings` (201 Created).
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateBookingResponse {
    /// The pending booking.
    pub booking: BookingResponse,
    /// Provider-hosted payment page for the deposit.
    pub payment_url: String,
    /// Gateway reference for the opened charge session.
    pub payment_ref: String,
}

/// List response for `GET /bookings`.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingListResponse {
    /// Bookings, newest first.
    pub data: Vec<BookingResponse>,
    /// Total count.
    pub total: u32,
}

/// Request body for `POST /bookings/{id}/payment-callback`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentCallbackRequest {
    /// Gateway payment reference to verify and record.
    pub payment_ref: String,
}

/// Request body for `POST /rooms/{id}/blocks`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BlockRequest {
    /// First blocked date.
    pub from: NaiveDate,
    /// End of the blocked range (exclusive).
    pub to: NaiveDate,
    /// Why the range is blocked.
    #[serde(default)]
    pub reason: String,
}

/// Response body for `DELETE /rooms/{id}/blocks`.
#[derive(Debug, Serialize, ToSchema)]
pub struct UnblockResponse {
    /// Number of blocks removed.
    pub removed: u64,
}

/// Room view for `GET /rooms`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoomResponse {
    /// Room identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Nightly rate, minor units.
    pub nightly_rate: Money,
    /// Guests covered by the nightly rate.
    pub base_occupancy: u32,
    /// Per-guest-per-night surcharge above base occupancy, minor units.
    pub extra_guest_fee: Money,
    /// Maximum occupancy.
    pub max_guests: u32,
}

impl From<Room> for RoomResponse {
    fn from(room: Room) -> Self {
        Self {
            id: room.id,
            name: room.name,
            nightly_rate: room.rate_plan.nightly_rate,
            base_occupancy: room.rate_plan.base_occupancy,
            extra_guest_fee: room.rate_plan.extra_guest_fee,
            max_guests: room.rate_plan.max_guests,
        }
    }
}
