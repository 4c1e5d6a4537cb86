//! # locanda-engine
//!
//! Pricing, modification, and reconciliation engine for a small
//! bed-and-breakfast's direct booking site.
//!
//! The engine owns booking money math (occupancy-tiered pricing,
//! date-change deltas with lead-time penalties, cancellation refund
//! tiers), the booking lifecycle state machine, and one-way
//! reconciliation of the channel-manager feed (Booking.com, Airbnb,
//! ...) into the local store. Payment collection itself is delegated to
//! a redirect-based gateway; this service quotes, verifies, and commits.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── BookingService / SyncService (service/)
//!     ├── Policy math (policy/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── Ports: store, gateway, channel, notifier (ports/)
//!     │
//!     └── PostgreSQL Persistence
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod policy;
pub mod ports;
pub mod service;
pub mod ws;
