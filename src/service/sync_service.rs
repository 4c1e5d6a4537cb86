//! Channel-manager reconciliation.
//!
//! Pulls the external booking feed and imports each record at most
//! once. Deduplication runs in two passes: the channel's own booking id
//! first, then a fuzzy match on room, stay dates and guest surname for
//! records the feed re-sent under a new id. A record that fails to
//! parse is logged and skipped; it never aborts the rest of the batch.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{
    Booking, BookingEvent, BookingId, BookingStatus, EventBus, GuestContact, Money, Origin,
    StayDates,
};
use crate::error::EngineError;
use crate::ports::{BookingStore, ChannelManager, ChannelRecord};

/// Counters for one reconciliation run. `synced + skipped == total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct SyncReport {
    /// Records imported as new bookings.
    pub synced: u32,
    /// Records already known (or unusable) and left alone.
    pub skipped: u32,
    /// Records seen in the feed.
    pub total: u32,
}

/// Maps the feed's channel identity onto a booking [`Origin`].
///
/// Matches the channel name case-insensitively so feed cosmetics
/// ("Booking.com" vs "booking.com") do not fragment origins. Returns
/// `None` for sources outside the lookup table; provenance is never
/// guessed, the caller skips the record instead.
#[must_use]
pub fn origin_for_channel(channel_id: &str, channel_name: &str) -> Option<Origin> {
    let name = channel_name.to_lowercase();
    if name.contains("booking") || channel_id == "19" {
        Some(Origin::Booking)
    } else if name.contains("airbnb") || channel_id == "27" {
        Some(Origin::Airbnb)
    } else if name.contains("direct") || channel_id == "0" {
        Some(Origin::Direct)
    } else if name.contains("manual") || name.contains("api") {
        Some(Origin::Other)
    } else {
        None
    }
}

/// Reconciles the channel-manager feed into the booking store.
#[derive(Clone)]
pub struct SyncService {
    store: Arc<dyn BookingStore>,
    channel: Arc<dyn ChannelManager>,
    event_bus: EventBus,
}

impl std::fmt::Debug for SyncService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncService").finish_non_exhaustive()
    }
}

impl SyncService {
    /// Creates a new `SyncService`.
    #[must_use]
    pub fn new(
        store: Arc<dyn BookingStore>,
        channel: Arc<dyn ChannelManager>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            store,
            channel,
            event_bus,
        }
    }

    /// Fetches the feed for the date range and reconciles it.
    ///
    /// # Errors
    ///
    /// A failed feed fetch propagates as-is; per-record problems inside
    /// the batch only show up as `skipped` entries in the report.
    pub async fn run(&self, from: NaiveDate, to: NaiveDate) -> Result<SyncReport, EngineError> {
        let records = self.channel.list_bookings(from, to).await?;
        self.reconcile_batch(&records).await
    }

    /// Reconciles one batch of feed records.
    ///
    /// Records are processed sequentially so the dedup checks see every
    /// booking the same batch already inserted.
    ///
    /// # Errors
    ///
    /// Only store failures abort the batch; malformed records are
    /// logged, counted as skipped, and dropped.
    pub async fn reconcile_batch(
        &self,
        records: &[ChannelRecord],
    ) -> Result<SyncReport, EngineError> {
        let mut report = SyncReport {
            synced: 0,
            skipped: 0,
            total: u32::try_from(records.len()).unwrap_or(u32::MAX),
        };

        for record in records {
            if self.reconcile_one(record).await? {
                report.synced += 1;
            } else {
                report.skipped += 1;
            }
        }

        self.event_bus.publish(BookingEvent::SyncCompleted {
            synced: report.synced,
            skipped: report.skipped,
            total: report.total,
            timestamp: Utc::now(),
        });
        tracing::info!(
            synced = report.synced,
            skipped = report.skipped,
            total = report.total,
            "channel sync completed"
        );

        Ok(report)
    }

    /// Imports one record. Returns `true` when a new booking was
    /// inserted, `false` when the record was deduplicated or dropped.
    async fn reconcile_one(&self, record: &ChannelRecord) -> Result<bool, EngineError> {
        let stay = match parse_stay(record) {
            Ok(stay) => stay,
            Err(e) => {
                tracing::warn!(external_id = %record.external_id, error = %e,
                    "unparseable feed record skipped");
                return Ok(false);
            }
        };

        let Some(origin) = origin_for_channel(&record.channel_id, &record.channel_name) else {
            tracing::warn!(external_id = %record.external_id,
                channel_id = %record.channel_id, channel_name = %record.channel_name,
                "feed record from unrecognized channel skipped");
            return Ok(false);
        };

        if is_cancelled_status(&record.status) {
            // Cancellations flow through the channel manager itself;
            // an already-cancelled record is nothing to import.
            tracing::debug!(external_id = %record.external_id,
                "cancelled feed record skipped");
            return Ok(false);
        }

        // Primary dedup: the channel's own booking id.
        if self
            .store
            .find_by_channel_booking_id(&record.external_id)
            .await?
            .is_some()
        {
            tracing::debug!(external_id = %record.external_id,
                "feed record already imported");
            return Ok(false);
        }

        // Secondary dedup: same room, same stay, same surname. Catches
        // feeds that re-announce a booking under a fresh external id;
        // when it fires, adopt the new id so the primary key matches
        // next time.
        if let Some(mut existing) = self
            .store
            .find_by_stay(&record.room_id, stay.check_in, stay.check_out, &record.last_name)
            .await?
        {
            tracing::info!(external_id = %record.external_id, booking_id = %existing.id,
                "feed record matched an existing stay; adopting channel id");
            existing.channel_booking_id = Some(record.external_id.clone());
            existing.updated_at = Utc::now();
            self.store.update(&existing).await?;
            return Ok(false);
        }

        let booking = booking_from_record(record, stay, origin);
        self.store.insert(&booking).await?;
        self.event_bus.publish(BookingEvent::BookingCreated {
            booking_id: booking.id,
            room_id: booking.room_id.clone(),
            check_in: booking.stay.check_in,
            check_out: booking.stay.check_out,
            origin: booking.origin.as_str().to_string(),
            total_amount: booking.total_amount,
            timestamp: Utc::now(),
        });
        tracing::info!(external_id = %record.external_id, booking_id = %booking.id,
            origin = booking.origin.as_str(), "feed record imported");
        Ok(true)
    }
}

fn parse_stay(record: &ChannelRecord) -> Result<StayDates, EngineError> {
    let check_in = parse_feed_date(&record.arrival)?;
    let check_out = parse_feed_date(&record.departure)?;
    StayDates::new(check_in, check_out)
}

fn parse_feed_date(raw: &str) -> Result<NaiveDate, EngineError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| EngineError::InvalidDateRange(format!("feed date {raw:?}: {e}")))
}

fn is_cancelled_status(raw: &str) -> bool {
    matches!(raw.to_lowercase().as_str(), "cancelled" | "canceled")
}

fn is_confirmed_status(raw: &str) -> bool {
    matches!(raw.to_lowercase().as_str(), "confirmed" | "new" | "modified")
}

fn booking_from_record(record: &ChannelRecord, stay: StayDates, origin: Origin) -> Booking {
    let now = Utc::now();
    let total = Money::from_minor(record.price_minor.unwrap_or(0));
    let status = if is_confirmed_status(&record.status) {
        BookingStatus::Confirmed
    } else {
        BookingStatus::Pending
    };
    Booking {
        id: BookingId::new(),
        channel_booking_id: Some(record.external_id.clone()),
        channel_name: Some(record.channel_name.clone()),
        room_id: record.room_id.clone(),
        stay,
        guests: record.guests.max(1),
        total_amount: total,
        currency: "EUR".to_string(),
        // The channel collected the money; nothing is owed through
        // this system's gateway.
        deposit_paid: Money::ZERO,
        balance_due: total,
        origin,
        status,
        contact: GuestContact {
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
        },
        payment_ref: None,
        created_at: now,
        updated_at: now,
        cancelled_at: None,
        last_refund: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::InMemoryBookingStore;
    use async_trait::async_trait;

    struct EmptyChannel;

    #[async_trait]
    impl ChannelManager for EmptyChannel {
        async fn list_bookings(
            &self,
            _from: NaiveDate,
            _to: NaiveDate,
        ) -> Result<Vec<ChannelRecord>, EngineError> {
            Ok(Vec::new())
        }

        async fn block_date_range(
            &self,
            _room_id: &str,
            _from: NaiveDate,
            _to: NaiveDate,
            _reference: &str,
        ) -> Result<(), EngineError> {
            Ok(())
        }

        async fn unblock_date_range(&self, _reference: &str) -> Result<(), EngineError> {
            Ok(())
        }
    }

    fn service() -> (SyncService, Arc<InMemoryBookingStore>) {
        let store = Arc::new(InMemoryBookingStore::new());
        let service = SyncService::new(
            Arc::<InMemoryBookingStore>::clone(&store),
            Arc::new(EmptyChannel),
            EventBus::new(100),
        );
        (service, store)
    }

    fn record(external_id: &str) -> ChannelRecord {
        ChannelRecord {
            external_id: external_id.to_string(),
            room_id: "camera-blu".to_string(),
            arrival: "2026-10-01".to_string(),
            departure: "2026-10-04".to_string(),
            guests: 2,
            first_name: "Marco".to_string(),
            last_name: "Bianchi".to_string(),
            email: "marco@example.com".to_string(),
            phone: String::new(),
            price_minor: Some(27_000),
            status: "confirmed".to_string(),
            channel_id: "19".to_string(),
            channel_name: "Booking.com".to_string(),
        }
    }

    #[tokio::test]
    async fn first_sync_imports_second_sync_skips() {
        let (service, store) = service();

        let first = service.reconcile_batch(&[record("b24-1")]).await;
        assert_eq!(
            first.ok(),
            Some(SyncReport {
                synced: 1,
                skipped: 0,
                total: 1
            })
        );

        let second = service.reconcile_batch(&[record("b24-1")]).await;
        assert_eq!(
            second.ok(),
            Some(SyncReport {
                synced: 0,
                skipped: 1,
                total: 1
            })
        );

        let bookings = store.list().await.ok().unwrap_or_default();
        assert_eq!(bookings.len(), 1);
    }

    #[tokio::test]
    async fn imported_booking_carries_channel_identity() {
        let (service, store) = service();
        let _ = service.reconcile_batch(&[record("b24-7")]).await;

        let bookings = store.list().await.ok().unwrap_or_default();
        let Some(imported) = bookings.first() else {
            unreachable!("one booking must exist");
        };
        assert_eq!(imported.channel_booking_id.as_deref(), Some("b24-7"));
        assert_eq!(imported.origin, Origin::Booking);
        assert_eq!(imported.status, BookingStatus::Confirmed);
        assert_eq!(imported.total_amount.minor(), 27_000);
        assert_eq!(imported.guest_last(), "Bianchi");
    }

    #[tokio::test]
    async fn fuzzy_match_adopts_new_external_id() {
        let (service, store) = service();
        let _ = service.reconcile_batch(&[record("b24-1")]).await;

        // Same stay and surname, fresh external id.
        let renamed = ChannelRecord {
            external_id: "b24-99".to_string(),
            ..record("b24-1")
        };
        let report = service.reconcile_batch(&[renamed]).await;
        assert_eq!(report.ok().map(|r| r.synced), Some(0));

        let bookings = store.list().await.ok().unwrap_or_default();
        assert_eq!(bookings.len(), 1);
        assert_eq!(
            bookings.first().and_then(|b| b.channel_booking_id.as_deref()),
            Some("b24-99")
        );
    }

    #[tokio::test]
    async fn malformed_record_skips_without_aborting_batch() {
        let (service, store) = service();
        let broken = ChannelRecord {
            arrival: "not-a-date".to_string(),
            ..record("b24-bad")
        };
        let report = service.reconcile_batch(&[broken, record("b24-ok")]).await;
        assert_eq!(
            report.ok(),
            Some(SyncReport {
                synced: 1,
                skipped: 1,
                total: 2
            })
        );
        assert_eq!(store.list().await.ok().unwrap_or_default().len(), 1);
    }

    #[tokio::test]
    async fn cancelled_feed_records_are_not_imported() {
        let (service, store) = service();
        let cancelled = ChannelRecord {
            status: "cancelled".to_string(),
            ..record("b24-c")
        };
        let report = service.reconcile_batch(&[cancelled]).await;
        assert_eq!(report.ok().map(|r| r.skipped), Some(1));
        assert!(store.list().await.ok().unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn duplicate_within_one_batch_is_caught() {
        let (service, store) = service();
        let report = service
            .reconcile_batch(&[record("b24-1"), record("b24-1")])
            .await;
        assert_eq!(
            report.ok(),
            Some(SyncReport {
                synced: 1,
                skipped: 1,
                total: 2
            })
        );
        assert_eq!(store.list().await.ok().unwrap_or_default().len(), 1);
    }

    #[tokio::test]
    async fn unrecognized_channel_is_skipped_not_guessed() {
        let (service, store) = service();
        let unknown = ChannelRecord {
            channel_id: "42".to_string(),
            channel_name: "Expedia".to_string(),
            ..record("b24-x")
        };
        let report = service.reconcile_batch(&[unknown]).await;
        assert_eq!(
            report.ok(),
            Some(SyncReport {
                synced: 0,
                skipped: 1,
                total: 1
            })
        );
        assert!(store.list().await.ok().unwrap_or_default().is_empty());
    }

    #[test]
    fn channel_identity_maps_to_origin() {
        assert_eq!(
            origin_for_channel("19", "Booking.com"),
            Some(Origin::Booking)
        );
        assert_eq!(origin_for_channel("27", "Airbnb"), Some(Origin::Airbnb));
        assert_eq!(origin_for_channel("0", "Direct"), Some(Origin::Direct));
        assert_eq!(origin_for_channel("5", "Manual"), Some(Origin::Other));
        assert_eq!(origin_for_channel("42", "Expedia"), None);
    }
}
