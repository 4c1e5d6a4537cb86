//! External collaborator contracts (ports).
//!
//! The engine consumes four capabilities: a booking store, a payment
//! gateway, a channel manager, and a notifier. Each is an async trait so
//! services hold `Arc<dyn ...>` and tests substitute recording fakes.
//! Concrete implementations live in [`crate::persistence`] (PostgreSQL
//! store), [`memory`] (in-memory store), and [`local`] (log-only dev
//! collaborators).

pub mod channel;
pub mod local;
pub mod memory;
pub mod notifier;
pub mod payment;
pub mod store;
pub mod token;

pub use channel::{ChannelManager, ChannelRecord};
pub use local::{LocalChannelManager, LocalPaymentGateway, LogNotifier};
pub use memory::InMemoryBookingStore;
pub use notifier::{CostBreakdown, Notifier, RefundInfo};
pub use payment::{ChargeRequest, ChargeSession, PaymentGateway, PaymentStatus, RefundReceipt};
pub use store::BookingStore;
pub use token::{CachedToken, TokenCache, TokenRefresher};
