//! Engine error types with HTTP status code mapping.
//!
//! [`EngineError`] is the central error type for the booking engine. Each
//! variant maps to a specific HTTP status code and structured JSON error
//! response. Best-effort side effects (refund issuance, channel unblock,
//! notifications) never surface here: their failures are logged at the
//! call site and the operation still reports success.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::BookingId;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "invalid date range: check-out must be after check-in",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`EngineError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category         | HTTP Status                  |
/// |-----------|------------------|------------------------------|
/// | 1000–1999 | Validation       | 400 Bad Request              |
/// | 2000–2999 | State/Not Found  | 404 Not Found / 409 Conflict |
/// | 3000–3999 | Server/Upstream  | 500 / 502                    |
/// | 4000–4999 | Policy Violation | 422 / 402                    |
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Proposed stay dates are malformed or in the past.
    #[error("invalid date range: {0}")]
    InvalidDateRange(String),

    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Booking with the given ID was not found.
    #[error("booking not found: {0}")]
    BookingNotFound(BookingId),

    /// Room with the given ID was not found.
    #[error("room not found: {0}")]
    RoomNotFound(String),

    /// The booking is cancelled; no further mutation is allowed.
    #[error("booking {0} is cancelled and can no longer be modified")]
    BookingCancelled(BookingId),

    /// Requested guest count exceeds the room's maximum occupancy.
    #[error("guest limit exceeded: requested {requested}, room allows {max}")]
    GuestLimitExceeded {
        /// Guest count the caller asked for.
        requested: u32,
        /// Maximum occupancy of the room.
        max: u32,
    },

    /// Guest count may only be increased through the modification flow.
    #[error("guest count can only be increased, not reduced")]
    GuestReductionUnsupported,

    /// The stay has already started; cancellation is no longer possible.
    #[error("booking has already started; cancellation window has closed")]
    BookingAlreadyStarted,

    /// A required payment has not been confirmed by the gateway.
    #[error("payment not confirmed: {0}")]
    PaymentNotConfirmed(String),

    /// A required upstream call (payment gateway, channel manager) failed.
    #[error("upstream {service} failure: {message}")]
    Upstream {
        /// Which collaborator failed (e.g. `"payment-gateway"`).
        service: &'static str,
        /// Failure description from the collaborator.
        message: String,
    },

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidDateRange(_) => 1001,
            Self::InvalidRequest(_) => 1002,
            Self::BookingNotFound(_) => 2001,
            Self::RoomNotFound(_) => 2002,
            Self::BookingCancelled(_) => 2003,
            Self::GuestLimitExceeded { .. } => 4001,
            Self::GuestReductionUnsupported => 4002,
            Self::BookingAlreadyStarted => 4003,
            Self::PaymentNotConfirmed(_) => 4004,
            Self::Upstream { .. } => 3002,
            Self::Persistence(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidDateRange(_) | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::BookingNotFound(_) | Self::RoomNotFound(_) => StatusCode::NOT_FOUND,
            Self::BookingCancelled(_) => StatusCode::CONFLICT,
            Self::GuestLimitExceeded { .. }
            | Self::GuestReductionUnsupported
            | Self::BookingAlreadyStarted => StatusCode::UNPROCESSABLE_ENTITY,
            Self::PaymentNotConfirmed(_) => StatusCode::PAYMENT_REQUIRED,
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
            Self::Persistence(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_bad_request() {
        let err = EngineError::InvalidDateRange("check-out before check-in".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), 1001);
    }

    #[test]
    fn policy_violations_map_to_unprocessable() {
        let err = EngineError::GuestLimitExceeded {
            requested: 5,
            max: 4,
        };
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.error_code(), 4001);

        assert_eq!(
            EngineError::GuestReductionUnsupported.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            EngineError::BookingAlreadyStarted.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn cancelled_booking_is_a_conflict() {
        let err = EngineError::BookingCancelled(BookingId::new());
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn upstream_failure_is_bad_gateway() {
        let err = EngineError::Upstream {
            service: "payment-gateway",
            message: "timeout".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert!(err.to_string().contains("payment-gateway"));
    }
}
