//! DTOs for date changes, guest changes, and cancellation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Money;
use crate::policy::{CancellationOutcome, DateChangeQuote};
use crate::ports::ChargeSession;

use super::booking_dto::BookingResponse;

/// Request body for quoting a date change.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DateChangeRequest {
    /// New arrival date.
    pub check_in: NaiveDate,
    /// New departure date (exclusive).
    pub check_out: NaiveDate,
}

/// Request body for committing a date change.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CommitDateChangeRequest {
    /// New arrival date.
    pub check_in: NaiveDate,
    /// New departure date (exclusive).
    pub check_out: NaiveDate,
    /// Payment reference for the collected delta. Required when the
    /// quoted delta was positive.
    #[serde(default)]
    pub payment_ref: Option<String>,
}

/// Quote for a date change, with a charge session when money is owed.
#[derive(Debug, Serialize, ToSchema)]
pub struct DateChangeQuoteResponse {
    /// Price of the new stay at the original guest count, minor units.
    pub new_base_amount: Money,
    /// Late-change penalty, minor units.
    pub penalty: Money,
    /// Signed settlement delta, minor units. Positive: guest owes.
    pub delta: i64,
    /// Nights in the new stay.
    pub nights: u32,
    /// Payment page for the amount due now, when `delta > 0`.
    pub payment_url: Option<String>,
    /// Gateway reference for the opened session, when `delta > 0`.
    pub payment_ref: Option<String>,
}

impl DateChangeQuoteResponse {
    /// Builds the response from a quote and its optional charge session.
    #[must_use]
    pub fn from_quote(quote: DateChangeQuote, session: Option<ChargeSession>) -> Self {
        let (payment_url, payment_ref) = match session {
            Some(session) => (Some(session.redirect_url), Some(session.payment_ref)),
            None => (None, None),
        };
        Self {
            new_base_amount: quote.new_base_amount,
            penalty: quote.penalty,
            delta: quote.delta,
            nights: quote.new_stay.nights(),
            payment_url,
            payment_ref,
        }
    }
}

/// Request body for quoting or committing a guest-count change.
#[derive(Debug, Deserialize, ToSchema)]
pub struct GuestChangeRequest {
    /// New guest count (must exceed the current count).
    pub guests: u32,
    /// Payment reference for the collected difference. Required on
    /// commit; ignored on quote.
    #[serde(default)]
    pub payment_ref: Option<String>,
}

/// Quote for a guest-count increase.
#[derive(Debug, Serialize, ToSchema)]
pub struct GuestChangeQuoteResponse {
    /// Amount owed for the additional guests, minor units.
    pub price_difference: Money,
    /// Payment page for the difference.
    pub payment_url: String,
    /// Gateway reference for the opened session.
    pub payment_ref: String,
}

/// Response body for a committed cancellation.
#[derive(Debug, Serialize, ToSchema)]
pub struct CancellationResponse {
    /// The cancelled booking.
    pub booking: BookingResponse,
    /// Amount refunded to the guest, minor units.
    pub refund_amount: Money,
    /// Amount retained by the property, minor units.
    pub penalty_amount: Money,
    /// Refund as a whole percentage.
    pub refund_percentage: u8,
}

impl CancellationResponse {
    /// Builds the response from the cancelled booking and its outcome.
    #[must_use]
    pub fn from_outcome(booking: BookingResponse, outcome: CancellationOutcome) -> Self {
        Self {
            booking,
            refund_amount: outcome.refund_amount,
            penalty_amount: outcome.penalty_amount,
            refund_percentage: outcome.refund_percentage,
        }
    }
}
