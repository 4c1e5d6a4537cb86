//! Data Transfer Objects for REST request/response serialization.
//!
//! All monetary amounts are integers in minor currency units; the
//! [`crate::domain::Money`] newtype serializes transparently.

pub mod booking_dto;
pub mod modification_dto;
pub mod sync_dto;

pub use booking_dto::*;
pub use modification_dto::*;
pub use sync_dto::*;
