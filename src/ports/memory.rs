//! In-memory booking store.
//!
//! Backs unit tests and local development runs. A `RwLock<HashMap>` per
//! collection; queries are linear scans, which is fine at the scale of a
//! six-room property.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use super::store::BookingStore;
use crate::domain::{BlockedDateRange, Booking, BookingId, Room};
use crate::error::EngineError;

/// In-memory [`BookingStore`] implementation.
#[derive(Debug, Default)]
pub struct InMemoryBookingStore {
    bookings: RwLock<HashMap<BookingId, Booking>>,
    rooms: RwLock<HashMap<String, Room>>,
    accounts: RwLock<HashMap<String, Vec<BookingId>>>,
    blocks: RwLock<Vec<BlockedDateRange>>,
}

impl InMemoryBookingStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with the given rooms.
    #[must_use]
    pub fn with_rooms(rooms: Vec<Room>) -> Self {
        let store = Self::default();
        {
            let map = rooms.into_iter().map(|r| (r.id.clone(), r)).collect();
            // Constructor runs before any task can hold the lock.
            if let Ok(mut guard) = store.rooms.try_write() {
                *guard = map;
            }
        }
        store
    }

    /// Returns the bookings linked to a guest account email.
    pub async fn linked_bookings(&self, email: &str) -> Vec<BookingId> {
        self.accounts
            .read()
            .await
            .get(email)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn insert(&self, booking: &Booking) -> Result<BookingId, EngineError> {
        let mut map = self.bookings.write().await;
        if map.contains_key(&booking.id) {
            return Err(EngineError::Persistence(format!(
                "booking {} already exists",
                booking.id
            )));
        }
        map.insert(booking.id, booking.clone());
        Ok(booking.id)
    }

    async fn get(&self, id: BookingId) -> Result<Option<Booking>, EngineError> {
        Ok(self.bookings.read().await.get(&id).cloned())
    }

    async fn update(&self, booking: &Booking) -> Result<(), EngineError> {
        let mut map = self.bookings.write().await;
        if !map.contains_key(&booking.id) {
            return Err(EngineError::BookingNotFound(booking.id));
        }
        map.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Booking>, EngineError> {
        Ok(self.bookings.read().await.values().cloned().collect())
    }

    async fn find_by_channel_booking_id(
        &self,
        channel_booking_id: &str,
    ) -> Result<Option<Booking>, EngineError> {
        Ok(self
            .bookings
            .read()
            .await
            .values()
            .find(|b| b.channel_booking_id.as_deref() == Some(channel_booking_id))
            .cloned())
    }

    async fn find_by_stay(
        &self,
        room_id: &str,
        check_in: NaiveDate,
        check_out: NaiveDate,
        guest_last: &str,
    ) -> Result<Option<Booking>, EngineError> {
        Ok(self
            .bookings
            .read()
            .await
            .values()
            .find(|b| {
                b.room_id == room_id
                    && b.stay.check_in == check_in
                    && b.stay.check_out == check_out
                    && b.guest_last() == guest_last
            })
            .cloned())
    }

    async fn get_room(&self, room_id: &str) -> Result<Option<Room>, EngineError> {
        Ok(self.rooms.read().await.get(room_id).cloned())
    }

    async fn list_rooms(&self) -> Result<Vec<Room>, EngineError> {
        Ok(self.rooms.read().await.values().cloned().collect())
    }

    async fn link_guest_account(
        &self,
        email: &str,
        booking: BookingId,
    ) -> Result<(), EngineError> {
        let mut accounts = self.accounts.write().await;
        let entries = accounts.entry(email.to_string()).or_default();
        if !entries.contains(&booking) {
            entries.push(booking);
        }
        Ok(())
    }

    async fn insert_block(&self, block: &BlockedDateRange) -> Result<(), EngineError> {
        self.blocks.write().await.push(block.clone());
        Ok(())
    }

    async fn remove_blocks(
        &self,
        room_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<BlockedDateRange>, EngineError> {
        let mut blocks = self.blocks.write().await;
        let mut removed = Vec::new();
        blocks.retain(|b| {
            if b.room_id == room_id && b.from >= from && b.to <= to {
                removed.push(b.clone());
                false
            } else {
                true
            }
        });
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GuestContact, Money, StayDates};
    use chrono::Utc;

    fn booking_for(last_name: &str, channel_id: Option<&str>) -> Booking {
        let check_in = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap_or_default();
        let check_out = NaiveDate::from_ymd_opt(2026, 10, 4).unwrap_or_default();
        let mut booking = Booking::new_site(
            "camera-blu".to_string(),
            StayDates {
                check_in,
                check_out,
            },
            2,
            Money::from_minor(30_000),
            "EUR".to_string(),
            GuestContact {
                last_name: last_name.to_string(),
                ..GuestContact::default()
            },
            30,
            Utc::now(),
        );
        booking.channel_booking_id = channel_id.map(str::to_string);
        booking
    }

    #[tokio::test]
    async fn insert_get_update_round_trip() {
        let store = InMemoryBookingStore::new();
        let booking = booking_for("Rossi", None);
        let id = booking.id;

        assert!(store.insert(&booking).await.is_ok());
        // Double insert is a persistence error.
        assert!(store.insert(&booking).await.is_err());

        let fetched = store.get(id).await;
        assert!(matches!(fetched, Ok(Some(_))));

        let mut updated = booking;
        updated.guests = 3;
        assert!(store.update(&updated).await.is_ok());
        let fetched = store.get(id).await;
        assert_eq!(fetched.ok().flatten().map(|b| b.guests), Some(3));
    }

    #[tokio::test]
    async fn dedup_queries_match_expected_keys() {
        let store = InMemoryBookingStore::new();
        let booking = booking_for("Bianchi", Some("B24-77"));
        let _ = store.insert(&booking).await;

        let by_channel = store.find_by_channel_booking_id("B24-77").await;
        assert!(matches!(by_channel, Ok(Some(_))));
        let miss = store.find_by_channel_booking_id("B24-99").await;
        assert!(matches!(miss, Ok(None)));

        let by_stay = store
            .find_by_stay(
                "camera-blu",
                booking.stay.check_in,
                booking.stay.check_out,
                "Bianchi",
            )
            .await;
        assert!(matches!(by_stay, Ok(Some(_))));
        let wrong_name = store
            .find_by_stay(
                "camera-blu",
                booking.stay.check_in,
                booking.stay.check_out,
                "Verdi",
            )
            .await;
        assert!(matches!(wrong_name, Ok(None)));
    }

    #[tokio::test]
    async fn account_links_are_idempotent() {
        let store = InMemoryBookingStore::new();
        let booking = booking_for("Rossi", None);
        let _ = store.insert(&booking).await;

        let _ = store.link_guest_account("g@example.com", booking.id).await;
        let _ = store.link_guest_account("g@example.com", booking.id).await;
        assert_eq!(store.linked_bookings("g@example.com").await.len(), 1);
    }
}
