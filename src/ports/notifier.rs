//! Guest notification contract.
//!
//! Fire-and-forget from the engine's perspective: a notification failure
//! is logged by the caller and never blocks the state transition that
//! triggered it.

use async_trait::async_trait;

use crate::domain::{Booking, Money};
use crate::error::EngineError;

/// Cost breakdown attached to a modification notification.
#[derive(Debug, Clone, Copy)]
pub struct CostBreakdown {
    /// Total before the change.
    pub old_total: Money,
    /// Total after the change.
    pub new_total: Money,
    /// Penalty portion, if any.
    pub penalty: Money,
    /// Signed settlement delta in minor units.
    pub delta: i64,
}

/// Refund summary attached to a cancellation notification.
#[derive(Debug, Clone, Copy)]
pub struct RefundInfo {
    /// Amount refunded to the guest.
    pub refund_amount: Money,
    /// Amount retained as penalty.
    pub penalty_amount: Money,
}

/// Abstract guest notifier (email under the hood).
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends the booking-confirmed message.
    async fn booking_confirmed(&self, booking: &Booking) -> Result<(), EngineError>;

    /// Sends the booking-cancelled message with the refund summary.
    async fn booking_cancelled(
        &self,
        booking: &Booking,
        refund: &RefundInfo,
    ) -> Result<(), EngineError>;

    /// Sends the booking-modified message with the cost breakdown.
    async fn booking_modified(
        &self,
        booking: &Booking,
        costs: &CostBreakdown,
    ) -> Result<(), EngineError>;
}
