//! Booking store contract.
//!
//! The store is the single source of truth. Services re-read current
//! state through it on every operation (no cross-request caching), and
//! it is assumed to provide read-your-writes consistency within one
//! handler invocation. Only single-document reads/writes and equality
//! queries are required; no cross-document transactions.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{BlockedDateRange, Booking, BookingId, Room};
use crate::error::EngineError;

/// Durable storage for bookings, rooms, and manual availability blocks.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Inserts a new booking, returning its id.
    async fn insert(&self, booking: &Booking) -> Result<BookingId, EngineError>;

    /// Fetches a booking by id.
    async fn get(&self, id: BookingId) -> Result<Option<Booking>, EngineError>;

    /// Replaces the stored booking with the given value.
    async fn update(&self, booking: &Booking) -> Result<(), EngineError>;

    /// Lists all bookings (admin views).
    async fn list(&self) -> Result<Vec<Booking>, EngineError>;

    /// Primary dedup query: booking with this external channel identity.
    async fn find_by_channel_booking_id(
        &self,
        channel_booking_id: &str,
    ) -> Result<Option<Booking>, EngineError>;

    /// Secondary fuzzy dedup query: identical stay, room, and guest
    /// surname.
    async fn find_by_stay(
        &self,
        room_id: &str,
        check_in: NaiveDate,
        check_out: NaiveDate,
        guest_last: &str,
    ) -> Result<Option<Booking>, EngineError>;

    /// Fetches a room by id.
    async fn get_room(&self, room_id: &str) -> Result<Option<Room>, EngineError>;

    /// Lists all rooms.
    async fn list_rooms(&self) -> Result<Vec<Room>, EngineError>;

    /// Links a guest account (keyed by email) to a booking. Best-effort:
    /// callers log a failure and move on.
    async fn link_guest_account(&self, email: &str, booking: BookingId)
    -> Result<(), EngineError>;

    /// Records a manual availability block.
    async fn insert_block(&self, block: &BlockedDateRange) -> Result<(), EngineError>;

    /// Removes all availability blocks for a room that fall inside the
    /// given range, returning the removed blocks so the caller can
    /// release each one upstream.
    async fn remove_blocks(
        &self,
        room_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<BlockedDateRange>, EngineError>;
}
