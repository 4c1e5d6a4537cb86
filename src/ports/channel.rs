//! Channel manager contract.
//!
//! The channel manager (Beds24, Smoobu) aggregates external sales
//! channels and syncs availability back to them. Its records arrive
//! loosely typed: dates and status come as raw strings that the
//! reconciliation layer parses and validates (parse, don't trust).
//! Token refresh and HTTP mechanics are entirely internal to the
//! implementation.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::EngineError;

/// A booking as reported by the channel-manager feed.
#[derive(Debug, Clone, Default)]
pub struct ChannelRecord {
    /// External identity of the booking on the channel manager.
    pub external_id: String,
    /// Room identifier as mapped on the channel manager.
    pub room_id: String,
    /// Arrival date, raw (expected `YYYY-MM-DD`).
    pub arrival: String,
    /// Departure date, raw (expected `YYYY-MM-DD`).
    pub departure: String,
    /// Total guest count.
    pub guests: u32,
    /// Guest given name.
    pub first_name: String,
    /// Guest surname.
    pub last_name: String,
    /// Guest email, when the channel shares it.
    pub email: String,
    /// Guest phone, when the channel shares it.
    pub phone: String,
    /// Price in minor currency units, when reported.
    pub price_minor: Option<i64>,
    /// Raw status string from the feed (e.g. `"confirmed"`, `"new"`).
    pub status: String,
    /// Numeric channel identifier from the feed.
    pub channel_id: String,
    /// Channel display name from the feed.
    pub channel_name: String,
}

/// Abstract channel-manager client.
#[async_trait]
pub trait ChannelManager: Send + Sync {
    /// Lists bookings reported by external channels in the date range.
    async fn list_bookings(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<ChannelRecord>, EngineError>;

    /// Blocks a room's dates on all external channels.
    async fn block_date_range(
        &self,
        room_id: &str,
        from: NaiveDate,
        to: NaiveDate,
        reference: &str,
    ) -> Result<(), EngineError>;

    /// Releases a block previously created under `reference`.
    async fn unblock_date_range(&self, reference: &str) -> Result<(), EngineError>;
}
