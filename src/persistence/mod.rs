//! Persistence layer: PostgreSQL booking store.
//!
//! Implements the [`crate::ports::BookingStore`] contract over
//! `sqlx::PgPool`. Row models parse the loosely-typed columns into
//! domain enums at this boundary.

pub mod models;
pub mod postgres;

pub use postgres::PostgresBookingStore;
