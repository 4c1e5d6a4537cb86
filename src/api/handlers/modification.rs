//! Modification handlers: date changes and guest-count changes.
//!
//! Both follow the quote/commit shape: the quote prices the change and,
//! when money is owed, opens a charge session; the commit verifies the
//! payment and writes the new state.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{
    BookingResponse, CommitDateChangeRequest, DateChangeQuoteResponse, DateChangeRequest,
    GuestChangeQuoteResponse, GuestChangeRequest,
};
use crate::app_state::AppState;
use crate::domain::BookingId;
use crate::error::{EngineError, ErrorResponse};

/// `POST /bookings/:id/date-change/quote` — Price a date change.
///
/// # Errors
///
/// Returns [`EngineError`] on invalid dates, cancelled or started
/// bookings, or a gateway failure opening the session.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/date-change/quote",
    tag = "Modifications",
    summary = "Quote a date change",
    description = "Prices the new stay at the original guest count, adds the late-change penalty when the original check-in is close, and opens a charge session for the deposit share of any amount owed.",
    params(
        ("id" = uuid::Uuid, Path, description = "Booking UUID"),
    ),
    request_body = DateChangeRequest,
    responses(
        (status = 200, description = "Quote with optional payment session", body = DateChangeQuoteResponse),
        (status = 400, description = "Invalid date range", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse),
        (status = 409, description = "Booking is cancelled", body = ErrorResponse),
        (status = 422, description = "Stay already started", body = ErrorResponse),
    )
)]
pub async fn quote_date_change(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<DateChangeRequest>,
) -> Result<impl IntoResponse, EngineError> {
    let (quote, session) = state
        .booking_service
        .quote_date_change(BookingId::from_uuid(id), req.check_in, req.check_out)
        .await?;
    Ok(Json(DateChangeQuoteResponse::from_quote(quote, session)))
}

/// `POST /bookings/:id/date-change` — Commit a date change.
///
/// # Errors
///
/// Returns [`EngineError::PaymentNotConfirmed`] when the quoted delta
/// is positive and no succeeded payment reference was supplied.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/date-change",
    tag = "Modifications",
    summary = "Commit a date change",
    description = "Re-evaluates the quote, settles the delta (verified payment when the guest owes, refund when the guest is owed), and rewrites the stay and amounts.",
    params(
        ("id" = uuid::Uuid, Path, description = "Booking UUID"),
    ),
    request_body = CommitDateChangeRequest,
    responses(
        (status = 200, description = "Date change committed", body = BookingResponse),
        (status = 402, description = "Payment required but not confirmed", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse),
        (status = 409, description = "Booking is cancelled", body = ErrorResponse),
        (status = 422, description = "Stay already started", body = ErrorResponse),
    )
)]
pub async fn commit_date_change(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<CommitDateChangeRequest>,
) -> Result<impl IntoResponse, EngineError> {
    let booking = state
        .booking_service
        .commit_date_change(
            BookingId::from_uuid(id),
            req.check_in,
            req.check_out,
            req.payment_ref.as_deref(),
        )
        .await?;
    Ok(Json(BookingResponse::from(booking)))
}

/// `POST /bookings/:id/guests/quote` — Price a guest-count increase.
///
/// # Errors
///
/// Returns [`EngineError::GuestLimitExceeded`] over the room maximum and
/// [`EngineError::GuestReductionUnsupported`] for decreases.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/guests/quote",
    tag = "Modifications",
    summary = "Quote a guest-count change",
    description = "Prices the stay at the new guest count and opens a charge session for the difference. Guest reductions are not supported.",
    params(
        ("id" = uuid::Uuid, Path, description = "Booking UUID"),
    ),
    request_body = GuestChangeRequest,
    responses(
        (status = 200, description = "Quote with payment session", body = GuestChangeQuoteResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse),
        (status = 409, description = "Booking is cancelled", body = ErrorResponse),
        (status = 422, description = "Over the room limit, or a reduction", body = ErrorResponse),
    )
)]
pub async fn quote_guest_change(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<GuestChangeRequest>,
) -> Result<impl IntoResponse, EngineError> {
    let (difference, session) = state
        .booking_service
        .quote_guest_change(BookingId::from_uuid(id), req.guests)
        .await?;
    Ok(Json(GuestChangeQuoteResponse {
        price_difference: difference,
        payment_url: session.redirect_url,
        payment_ref: session.payment_ref,
    }))
}

/// `POST /bookings/:id/guests` — Commit a guest-count increase.
///
/// # Errors
///
/// Returns [`EngineError::PaymentNotConfirmed`] without a succeeded
/// payment for the difference.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/guests",
    tag = "Modifications",
    summary = "Commit a guest-count change",
    description = "Verifies the payment for the difference, then updates guest count and amounts in one write.",
    params(
        ("id" = uuid::Uuid, Path, description = "Booking UUID"),
    ),
    request_body = GuestChangeRequest,
    responses(
        (status = 200, description = "Guest change committed", body = BookingResponse),
        (status = 402, description = "Payment required but not confirmed", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse),
        (status = 409, description = "Booking is cancelled", body = ErrorResponse),
        (status = 422, description = "Over the room limit, or a reduction", body = ErrorResponse),
    )
)]
pub async fn commit_guest_change(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<GuestChangeRequest>,
) -> Result<impl IntoResponse, EngineError> {
    let booking = state
        .booking_service
        .commit_guest_change(
            BookingId::from_uuid(id),
            req.guests,
            req.payment_ref.as_deref(),
        )
        .await?;
    Ok(Json(BookingResponse::from(booking)))
}

/// Modification routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/bookings/{id}/date-change/quote",
            post(quote_date_change),
        )
        .route("/bookings/{id}/date-change", post(commit_date_change))
        .route("/bookings/{id}/guests/quote", post(quote_guest_change))
        .route("/bookings/{id}/guests", post(commit_guest_change))
}
