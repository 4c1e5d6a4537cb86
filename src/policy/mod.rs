//! Policy layer: pure pricing, modification, and cancellation rules.
//!
//! All functions here are deterministic and side-effect free: same
//! inputs, same output, so a UI preview and the server-side confirmation
//! can never disagree on an amount. The service layer owns every store
//! write and every collaborator call.

pub mod cancellation;
pub mod modification;
pub mod pricing;

pub use cancellation::{CancellationOutcome, cancellation_outcome};
pub use modification::{DateChangeQuote, date_change_quote, guest_change_price};
pub use pricing::price_for_stay;

/// Tunable policy knobs, loaded from configuration.
///
/// The defaults mirror the house policy: one 7-day lead-time threshold
/// shared by free cancellation and the late-change penalty, a flat 50%
/// late-change penalty, and a 30/70 deposit/balance split.
#[derive(Debug, Clone, Copy)]
pub struct PolicyConfig {
    /// Days before check-in at or above which cancellation is free and
    /// date changes carry no penalty.
    pub free_cancel_threshold_days: i64,
    /// Penalty for late date changes, as a percentage of the original
    /// total.
    pub late_change_penalty_pct: u32,
    /// Deposit percentage of the total collected at checkout.
    pub deposit_pct: u32,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            free_cancel_threshold_days: 7,
            late_change_penalty_pct: 50,
            deposit_pct: 30,
        }
    }
}
