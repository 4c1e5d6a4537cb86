//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::policy::PolicyConfig;
use crate::service::{BookingService, SyncService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Booking service for pricing, settlement, and lifecycle logic.
    pub booking_service: Arc<BookingService>,
    /// Channel-manager reconciliation service.
    pub sync_service: Arc<SyncService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
    /// Modification policy currently in force.
    pub policy: PolicyConfig,
}
