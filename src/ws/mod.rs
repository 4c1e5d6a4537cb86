//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` pushes booking events to the admin
//! dashboard, filtered per connection by room subscription.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
