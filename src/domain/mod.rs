//! Domain layer: core booking types, money, the lifecycle state machine,
//! and the event system.
//!
//! Everything in this module is pure data and pure functions; I/O lives
//! behind the traits in [`crate::ports`] and in the service layer.

pub mod booking;
pub mod booking_id;
pub mod event;
pub mod event_bus;
pub mod money;
pub mod room;
pub mod stay;
pub mod transition;

pub use booking::{Booking, BookingStatus, GuestContact, Origin, RefundRecord};
pub use booking_id::BookingId;
pub use event::BookingEvent;
pub use event_bus::EventBus;
pub use money::Money;
pub use room::{BlockedDateRange, RatePlan, Room};
pub use stay::StayDates;
pub use transition::{TransitionEvent, TransitionOutcome, apply_transition};
