//! PostgreSQL implementation of the booking store.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use super::models::{BookingRow, RoomRow};
use crate::domain::{BlockedDateRange, Booking, BookingId, Room};
use crate::error::EngineError;
use crate::ports::BookingStore;

/// PostgreSQL-backed [`BookingStore`] using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresBookingStore {
    pool: PgPool,
}

impl PostgresBookingStore {
    /// Creates a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Runs the embedded schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Persistence`] on migration failure.
    pub async fn migrate(&self) -> Result<(), EngineError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| EngineError::Persistence(e.to_string()))
    }
}

fn persistence_err(e: sqlx::Error) -> EngineError {
    EngineError::Persistence(e.to_string())
}

const SELECT_BOOKING: &str = "SELECT id, channel_booking_id, channel_name, room_id, check_in, \
     check_out, guests, total_amount, currency, deposit_paid, balance_due, origin, status, \
     first_name, last_name, email, phone, payment_ref, created_at, updated_at, cancelled_at, \
     refund_amount, refund_reason, refunded_at FROM bookings";

#[async_trait]
impl BookingStore for PostgresBookingStore {
    async fn insert(&self, booking: &Booking) -> Result<BookingId, EngineError> {
        sqlx::query(
            "INSERT INTO bookings (id, channel_booking_id, channel_name, room_id, check_in, \
             check_out, guests, total_amount, currency, deposit_paid, balance_due, origin, \
             status, first_name, last_name, email, phone, payment_ref, created_at, updated_at, \
             cancelled_at, refund_amount, refund_reason, refunded_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
             $17, $18, $19, $20, $21, $22, $23, $24)",
        )
        .bind(booking.id.as_uuid())
        .bind(&booking.channel_booking_id)
        .bind(&booking.channel_name)
        .bind(&booking.room_id)
        .bind(booking.stay.check_in)
        .bind(booking.stay.check_out)
        .bind(i32::try_from(booking.guests).unwrap_or(i32::MAX))
        .bind(booking.total_amount.minor())
        .bind(&booking.currency)
        .bind(booking.deposit_paid.minor())
        .bind(booking.balance_due.minor())
        .bind(booking.origin.as_str())
        .bind(booking.status.as_str())
        .bind(&booking.contact.first_name)
        .bind(&booking.contact.last_name)
        .bind(&booking.contact.email)
        .bind(&booking.contact.phone)
        .bind(&booking.payment_ref)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .bind(booking.cancelled_at)
        .bind(booking.last_refund.as_ref().map(|r| r.amount.minor()))
        .bind(booking.last_refund.as_ref().map(|r| r.reason.clone()))
        .bind(booking.last_refund.as_ref().map(|r| r.refunded_at))
        .execute(&self.pool)
        .await
        .map_err(persistence_err)?;
        Ok(booking.id)
    }

    async fn get(&self, id: BookingId) -> Result<Option<Booking>, EngineError> {
        let row = sqlx::query_as::<_, BookingRow>(&format!("{SELECT_BOOKING} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(persistence_err)?;
        row.map(BookingRow::into_booking).transpose()
    }

    async fn update(&self, booking: &Booking) -> Result<(), EngineError> {
        let result = sqlx::query(
            "UPDATE bookings SET check_in = $2, check_out = $3, guests = $4, \
             total_amount = $5, deposit_paid = $6, balance_due = $7, status = $8, \
             payment_ref = $9, updated_at = $10, cancelled_at = $11, refund_amount = $12, \
             refund_reason = $13, refunded_at = $14 WHERE id = $1",
        )
        .bind(booking.id.as_uuid())
        .bind(booking.stay.check_in)
        .bind(booking.stay.check_out)
        .bind(i32::try_from(booking.guests).unwrap_or(i32::MAX))
        .bind(booking.total_amount.minor())
        .bind(booking.deposit_paid.minor())
        .bind(booking.balance_due.minor())
        .bind(booking.status.as_str())
        .bind(&booking.payment_ref)
        .bind(booking.updated_at)
        .bind(booking.cancelled_at)
        .bind(booking.last_refund.as_ref().map(|r| r.amount.minor()))
        .bind(booking.last_refund.as_ref().map(|r| r.reason.clone()))
        .bind(booking.last_refund.as_ref().map(|r| r.refunded_at))
        .execute(&self.pool)
        .await
        .map_err(persistence_err)?;
        if result.rows_affected() == 0 {
            return Err(EngineError::BookingNotFound(booking.id));
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Booking>, EngineError> {
        let rows =
            sqlx::query_as::<_, BookingRow>(&format!("{SELECT_BOOKING} ORDER BY check_in ASC"))
                .fetch_all(&self.pool)
                .await
                .map_err(persistence_err)?;
        rows.into_iter().map(BookingRow::into_booking).collect()
    }

    async fn find_by_channel_booking_id(
        &self,
        channel_booking_id: &str,
    ) -> Result<Option<Booking>, EngineError> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "{SELECT_BOOKING} WHERE channel_booking_id = $1"
        ))
        .bind(channel_booking_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(persistence_err)?;
        row.map(BookingRow::into_booking).transpose()
    }

    async fn find_by_stay(
        &self,
        room_id: &str,
        check_in: NaiveDate,
        check_out: NaiveDate,
        guest_last: &str,
    ) -> Result<Option<Booking>, EngineError> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "{SELECT_BOOKING} WHERE room_id = $1 AND check_in = $2 AND check_out = $3 \
             AND last_name = $4"
        ))
        .bind(room_id)
        .bind(check_in)
        .bind(check_out)
        .bind(guest_last)
        .fetch_optional(&self.pool)
        .await
        .map_err(persistence_err)?;
        row.map(BookingRow::into_booking).transpose()
    }

    async fn get_room(&self, room_id: &str) -> Result<Option<Room>, EngineError> {
        let row = sqlx::query_as::<_, RoomRow>(
            "SELECT id, name, nightly_rate, base_occupancy, extra_guest_fee, max_guests \
             FROM rooms WHERE id = $1",
        )
        .bind(room_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(persistence_err)?;
        Ok(row.map(Room::from))
    }

    async fn list_rooms(&self) -> Result<Vec<Room>, EngineError> {
        let rows = sqlx::query_as::<_, RoomRow>(
            "SELECT id, name, nightly_rate, base_occupancy, extra_guest_fee, max_guests \
             FROM rooms ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(persistence_err)?;
        Ok(rows.into_iter().map(Room::from).collect())
    }

    async fn link_guest_account(
        &self,
        email: &str,
        booking: BookingId,
    ) -> Result<(), EngineError> {
        sqlx::query(
            "INSERT INTO guest_accounts (email, booking_id) VALUES ($1, $2) \
             ON CONFLICT (email, booking_id) DO NOTHING",
        )
        .bind(email)
        .bind(booking.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(persistence_err)?;
        Ok(())
    }

    async fn insert_block(&self, block: &BlockedDateRange) -> Result<(), EngineError> {
        sqlx::query(
            "INSERT INTO blocked_dates (room_id, from_date, to_date, reason) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(&block.room_id)
        .bind(block.from)
        .bind(block.to)
        .bind(&block.reason)
        .execute(&self.pool)
        .await
        .map_err(persistence_err)?;
        Ok(())
    }

    async fn remove_blocks(
        &self,
        room_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<BlockedDateRange>, EngineError> {
        let rows: Vec<(String, NaiveDate, NaiveDate, String)> = sqlx::query_as(
            "DELETE FROM blocked_dates WHERE room_id = $1 AND from_date >= $2 AND to_date <= $3 \
             RETURNING room_id, from_date, to_date, reason",
        )
        .bind(room_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(persistence_err)?;
        Ok(rows
            .into_iter()
            .map(|(room_id, from, to, reason)| BlockedDateRange {
                room_id,
                from,
                to,
                reason,
            })
            .collect())
    }
}
