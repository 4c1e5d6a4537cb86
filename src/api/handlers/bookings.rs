//! Booking handlers: create, list, get, payment callback, room catalog.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    BlockRequest, BookingListResponse, BookingResponse, CreateBookingRequest,
    CreateBookingResponse, PaymentCallbackRequest, RoomResponse, UnblockResponse,
};
use crate::app_state::AppState;
use crate::domain::{BlockedDateRange, BookingId, GuestContact};
use crate::error::{EngineError, ErrorResponse};
use crate::service::NewBookingRequest;

/// `POST /bookings` — Create a pending booking and open the deposit
/// charge session.
///
/// # Errors
///
/// Returns [`EngineError`] on invalid dates, unknown rooms, guest counts
/// over the room limit, or a gateway failure.
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    summary = "Create a booking",
    description = "Validates the stay, prices it against the room's rate plan, stores a pending booking, and returns the payment page for the deposit.",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created, deposit payment pending", body = CreateBookingResponse),
        (status = 400, description = "Invalid dates or request", body = ErrorResponse),
        (status = 404, description = "Room not found", body = ErrorResponse),
        (status = 422, description = "Guest count over the room limit", body = ErrorResponse),
    )
)]
pub async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, EngineError> {
    let (booking, session) = state
        .booking_service
        .create_booking(NewBookingRequest {
            room_id: req.room_id,
            check_in: req.check_in,
            check_out: req.check_out,
            guests: req.guests,
            contact: GuestContact {
                first_name: req.first_name,
                last_name: req.last_name,
                email: req.email,
                phone: req.phone,
            },
        })
        .await?;

    let response = CreateBookingResponse {
        booking: booking.into(),
        payment_url: session.redirect_url,
        payment_ref: session.payment_ref,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// `GET /bookings` — List all bookings.
///
/// # Errors
///
/// Returns [`EngineError`] on store failures.
#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "Bookings",
    summary = "List bookings",
    responses(
        (status = 200, description = "All bookings", body = BookingListResponse),
    )
)]
pub async fn list_bookings(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, EngineError> {
    let bookings = state.booking_service.list_bookings().await?;
    let total = u32::try_from(bookings.len()).unwrap_or(u32::MAX);
    let data: Vec<BookingResponse> = bookings.into_iter().map(Into::into).collect();
    Ok(Json(BookingListResponse { data, total }))
}

/// `GET /bookings/:id` — Get one booking.
///
/// # Errors
///
/// Returns [`EngineError::BookingNotFound`] if it does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    tag = "Bookings",
    summary = "Get booking details",
    params(
        ("id" = uuid::Uuid, Path, description = "Booking UUID"),
    ),
    responses(
        (status = 200, description = "Booking details", body = BookingResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse),
    )
)]
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, EngineError> {
    let booking = state
        .booking_service
        .get_booking(BookingId::from_uuid(id))
        .await?;
    Ok(Json(BookingResponse::from(booking)))
}

/// `POST /bookings/:id/payment-callback` — Record a confirmed deposit
/// payment. Safe to replay.
///
/// # Errors
///
/// Returns [`EngineError::PaymentNotConfirmed`] when the gateway does
/// not report the payment as succeeded.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/payment-callback",
    tag = "Bookings",
    summary = "Confirm the deposit payment",
    description = "Verifies the payment with the gateway and moves the booking to paid. Replaying a callback for an already-paid booking returns it unchanged.",
    params(
        ("id" = uuid::Uuid, Path, description = "Booking UUID"),
    ),
    request_body = PaymentCallbackRequest,
    responses(
        (status = 200, description = "Booking paid", body = BookingResponse),
        (status = 402, description = "Payment not confirmed by the gateway", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse),
        (status = 409, description = "Booking is cancelled", body = ErrorResponse),
    )
)]
pub async fn payment_callback(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<PaymentCallbackRequest>,
) -> Result<impl IntoResponse, EngineError> {
    let booking = state
        .booking_service
        .handle_payment_callback(BookingId::from_uuid(id), &req.payment_ref)
        .await?;
    Ok(Json(BookingResponse::from(booking)))
}

/// `GET /rooms` — Room catalog with rate plans.
///
/// # Errors
///
/// Returns [`EngineError`] on store failures.
#[utoipa::path(
    get,
    path = "/api/v1/rooms",
    tag = "Rooms",
    summary = "List rooms",
    responses(
        (status = 200, description = "Room catalog", body = Vec<RoomResponse>),
    )
)]
pub async fn list_rooms(State(state): State<AppState>) -> Result<impl IntoResponse, EngineError> {
    let rooms = state.booking_service.list_rooms().await?;
    let data: Vec<RoomResponse> = rooms.into_iter().map(Into::into).collect();
    Ok(Json(data))
}

/// `POST /rooms/:id/blocks` — Block a room's dates (maintenance, owner
/// stay).
///
/// # Errors
///
/// Returns [`EngineError::RoomNotFound`] for unknown rooms and
/// [`EngineError::InvalidDateRange`] for empty ranges.
#[utoipa::path(
    post,
    path = "/api/v1/rooms/{id}/blocks",
    tag = "Rooms",
    summary = "Block room dates",
    description = "Marks the range unavailable locally and pushes the block to the external channels.",
    params(
        ("id" = String, Path, description = "Room identifier"),
    ),
    request_body = BlockRequest,
    responses(
        (status = 201, description = "Range blocked", body = BlockedDateRange),
        (status = 400, description = "Invalid range", body = ErrorResponse),
        (status = 404, description = "Room not found", body = ErrorResponse),
    )
)]
pub async fn block_room(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<BlockRequest>,
) -> Result<impl IntoResponse, EngineError> {
    let block = state
        .booking_service
        .block_room(&id, req.from, req.to, req.reason)
        .await?;
    Ok((StatusCode::CREATED, Json(block)))
}

/// `DELETE /rooms/:id/blocks` — Remove blocks inside a range.
///
/// # Errors
///
/// Returns [`EngineError`] on store failures.
#[utoipa::path(
    delete,
    path = "/api/v1/rooms/{id}/blocks",
    tag = "Rooms",
    summary = "Unblock room dates",
    description = "Removes availability blocks falling inside the range and releases them on the external channels.",
    params(
        ("id" = String, Path, description = "Room identifier"),
    ),
    request_body = BlockRequest,
    responses(
        (status = 200, description = "Blocks removed", body = UnblockResponse),
    )
)]
pub async fn unblock_room(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<BlockRequest>,
) -> Result<impl IntoResponse, EngineError> {
    let removed = state
        .booking_service
        .unblock_room(&id, req.from, req.to)
        .await?;
    Ok(Json(UnblockResponse { removed }))
}

/// Booking and room routes. Cancellation shares the `/bookings/{id}`
/// path, so its handler is mounted here.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", post(create_booking).get(list_bookings))
        .route(
            "/bookings/{id}",
            get(get_booking).delete(super::cancellation::cancel_booking),
        )
        .route("/bookings/{id}/payment-callback", post(payment_callback))
        .route("/rooms", get(list_rooms))
        .route("/rooms/{id}/blocks", post(block_room).delete(unblock_room))
}
