//! Domain events reflecting booking state mutations.
//!
//! Every committed state change emits a [`BookingEvent`] through the
//! [`super::EventBus`]. Events feed the admin dashboard over WebSocket;
//! they are observational only and never part of the commit path.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::{BookingId, Money};

/// Domain event emitted after every committed booking mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum BookingEvent {
    /// A new booking was created (site checkout or channel import).
    BookingCreated {
        /// Booking identifier.
        booking_id: BookingId,
        /// Room the stay occupies.
        room_id: String,
        /// Arrival date.
        check_in: NaiveDate,
        /// Departure date (exclusive).
        check_out: NaiveDate,
        /// Sales channel tag (`"site"`, `"airbnb"`, ...).
        origin: String,
        /// Total amount in minor units.
        total_amount: Money,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// The deposit payment was confirmed and the booking marked paid.
    PaymentConfirmed {
        /// Booking identifier.
        booking_id: BookingId,
        /// Room the stay occupies.
        room_id: String,
        /// Gateway payment reference.
        payment_ref: String,
        /// Confirmation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Dates or guest count changed and the amounts were settled.
    BookingModified {
        /// Booking identifier.
        booking_id: BookingId,
        /// Room the stay occupies.
        room_id: String,
        /// Total before the change.
        old_total: Money,
        /// Total after the change.
        new_total: Money,
        /// Signed settlement delta in minor units (collected if positive,
        /// refunded if negative).
        delta: i64,
        /// Modification timestamp.
        timestamp: DateTime<Utc>,
    },

    /// The booking was cancelled.
    BookingCancelled {
        /// Booking identifier.
        booking_id: BookingId,
        /// Room the stay occupied.
        room_id: String,
        /// Amount refunded to the guest.
        refund_amount: Money,
        /// Amount retained as penalty.
        penalty_amount: Money,
        /// Cancellation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A channel-manager sync batch finished.
    SyncCompleted {
        /// Bookings inserted by the batch.
        synced: u32,
        /// Records skipped (duplicates, unknown channels, bad payloads).
        skipped: u32,
        /// Total records in the batch.
        total: u32,
        /// Completion timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl BookingEvent {
    /// Returns the room this event concerns, if it concerns one.
    ///
    /// Sync summaries span rooms and return `None`; the WebSocket layer
    /// only delivers those to wildcard subscribers.
    #[must_use]
    pub fn room_id(&self) -> Option<&str> {
        match self {
            Self::BookingCreated { room_id, .. }
            | Self::PaymentConfirmed { room_id, .. }
            | Self::BookingModified { room_id, .. }
            | Self::BookingCancelled { room_id, .. } => Some(room_id),
            Self::SyncCompleted { .. } => None,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::BookingCreated { .. } => "booking_created",
            Self::PaymentConfirmed { .. } => "payment_confirmed",
            Self::BookingModified { .. } => "booking_modified",
            Self::BookingCancelled { .. } => "booking_cancelled",
            Self::SyncCompleted { .. } => "sync_completed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_id_accessor() {
        let event = BookingEvent::BookingCancelled {
            booking_id: BookingId::new(),
            room_id: "camera-blu".to_string(),
            refund_amount: Money::from_minor(20_000),
            penalty_amount: Money::ZERO,
            timestamp: Utc::now(),
        };
        assert_eq!(event.room_id(), Some("camera-blu"));
        assert_eq!(event.event_type_str(), "booking_cancelled");

        let sync = BookingEvent::SyncCompleted {
            synced: 1,
            skipped: 2,
            total: 3,
            timestamp: Utc::now(),
        };
        assert_eq!(sync.room_id(), None);
    }

    #[test]
    fn serializes_with_event_type_tag() {
        let event = BookingEvent::SyncCompleted {
            synced: 4,
            skipped: 1,
            total: 5,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap_or_default();
        assert!(json.contains("sync_completed"));
        assert!(json.contains("\"synced\":4"));
    }
}
