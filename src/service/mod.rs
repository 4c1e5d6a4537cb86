//! Service layer.
//!
//! [`BookingService`] orchestrates the booking lifecycle (pricing,
//! settlement, transitions, side effects); [`SyncService`] reconciles
//! the channel-manager feed into the store.

mod booking_service;
mod sync_service;

pub use booking_service::{BookingService, NewBookingRequest};
pub use sync_service::{SyncReport, SyncService, origin_for_channel};
