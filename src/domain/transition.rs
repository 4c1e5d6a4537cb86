//! Booking lifecycle state machine.
//!
//! `Pending → Paid → Confirmed`, with `Cancelled` as the single terminal
//! state reachable from any of the three. [`apply_transition`] is a pure
//! function from `(booking, event)` to a new booking value; the service
//! layer persists the result and runs the side effects. Purity keeps
//! replayed payment-gateway callbacks trivially idempotent: a replay maps
//! to [`TransitionOutcome::NoOp`] and the caller skips every side effect.

use chrono::{DateTime, Utc};

use super::booking::{Booking, BookingStatus, RefundRecord};
use crate::error::EngineError;

/// An event that drives the booking lifecycle forward.
#[derive(Debug, Clone)]
pub enum TransitionEvent {
    /// Payment gateway confirmed the deposit charge for this booking.
    PaymentConfirmed {
        /// Gateway payment reference to persist on the booking.
        payment_ref: String,
    },
    /// Mark the stay confirmed (post-payment, or imported as such).
    MarkConfirmed,
    /// Cancel the booking, optionally recording the refund issued.
    Cancel {
        /// Refund audit record, when a refund was owed.
        refund: Option<RefundRecord>,
    },
}

/// Result of applying a transition event.
#[derive(Debug, Clone)]
pub enum TransitionOutcome {
    /// The event moved the booking to a new state.
    Applied(Booking),
    /// The event was a replay or redundant; nothing changed and no side
    /// effects must run.
    NoOp,
}

/// Applies `event` to `booking`, returning the updated booking value.
///
/// Transitions are monotonic and never reversed. A replayed
/// [`TransitionEvent::PaymentConfirmed`] against an already-paid or
/// confirmed booking is a [`TransitionOutcome::NoOp`], not an error,
/// because payment-provider callbacks can be delivered more than once.
///
/// # Errors
///
/// Returns [`EngineError::BookingCancelled`] when any event other than a
/// redundant cancel targets a cancelled booking.
pub fn apply_transition(
    booking: &Booking,
    event: TransitionEvent,
    now: DateTime<Utc>,
) -> Result<TransitionOutcome, EngineError> {
    if booking.status == BookingStatus::Cancelled {
        return match event {
            // Cancelling twice is harmless; the terminal state holds.
            TransitionEvent::Cancel { .. } => Ok(TransitionOutcome::NoOp),
            _ => Err(EngineError::BookingCancelled(booking.id)),
        };
    }

    match event {
        TransitionEvent::PaymentConfirmed { payment_ref } => match booking.status {
            BookingStatus::Pending => {
                let mut updated = booking.clone();
                updated.status = BookingStatus::Paid;
                updated.payment_ref = Some(payment_ref);
                updated.updated_at = now;
                Ok(TransitionOutcome::Applied(updated))
            }
            // Callback replay: the booking already advanced.
            BookingStatus::Paid | BookingStatus::Confirmed => Ok(TransitionOutcome::NoOp),
            BookingStatus::Cancelled => Err(EngineError::BookingCancelled(booking.id)),
        },
        TransitionEvent::MarkConfirmed => match booking.status {
            BookingStatus::Pending | BookingStatus::Paid => {
                let mut updated = booking.clone();
                updated.status = BookingStatus::Confirmed;
                updated.updated_at = now;
                Ok(TransitionOutcome::Applied(updated))
            }
            BookingStatus::Confirmed => Ok(TransitionOutcome::NoOp),
            BookingStatus::Cancelled => Err(EngineError::BookingCancelled(booking.id)),
        },
        TransitionEvent::Cancel { refund } => {
            let mut updated = booking.clone();
            updated.status = BookingStatus::Cancelled;
            updated.cancelled_at = Some(now);
            updated.last_refund = refund;
            updated.updated_at = now;
            Ok(TransitionOutcome::Applied(updated))
        }
    }
}
