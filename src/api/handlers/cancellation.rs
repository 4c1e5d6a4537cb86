//! Cancellation handler.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;

use crate::api::dto::CancellationResponse;
use crate::app_state::AppState;
use crate::domain::BookingId;
use crate::error::{EngineError, ErrorResponse};

/// `DELETE /bookings/:id` — Cancel a booking.
///
/// # Errors
///
/// Returns [`EngineError::BookingCancelled`] when already cancelled and
/// [`EngineError::BookingAlreadyStarted`] when check-in has passed.
#[utoipa::path(
    delete,
    path = "/api/v1/bookings/{id}",
    tag = "Cancellation",
    summary = "Cancel a booking",
    description = "Applies the refund tiers (full refund at or beyond the free-cancellation threshold, no refund inside it), issues the refund, marks the booking cancelled, and releases the dates on external channels.",
    params(
        ("id" = uuid::Uuid, Path, description = "Booking UUID"),
    ),
    responses(
        (status = 200, description = "Booking cancelled", body = CancellationResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse),
        (status = 409, description = "Already cancelled", body = ErrorResponse),
        (status = 422, description = "Stay already started", body = ErrorResponse),
    )
)]
pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, EngineError> {
    let (booking, outcome) = state
        .booking_service
        .cancel_booking(BookingId::from_uuid(id))
        .await?;
    Ok(Json(CancellationResponse::from_outcome(
        booking.into(),
        outcome,
    )))
}
