//! Rooms, rate plans, and manual availability blocks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Money;

/// Tiered nightly pricing for a room.
///
/// The nightly rate includes up to `base_occupancy` guests; each guest
/// above that adds `extra_guest_fee` per night. All amounts are minor
/// currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RatePlan {
    /// Price per night covering the base occupancy.
    pub nightly_rate: Money,
    /// Number of guests included in the nightly rate.
    pub base_occupancy: u32,
    /// Per-night surcharge for each guest above the base occupancy.
    pub extra_guest_fee: Money,
    /// Maximum occupancy of the room.
    pub max_guests: u32,
}

/// A bookable room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Room {
    /// Room identifier (stable across the site and channel managers).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Pricing rules for this room.
    pub rate_plan: RatePlan,
}

/// A manually or system-created range marking a room unavailable
/// independent of any booking.
///
/// Created by admin action only; the cancellation flow removes blocks,
/// it never creates one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BlockedDateRange {
    /// Room the block applies to.
    pub room_id: String,
    /// First blocked date.
    pub from: NaiveDate,
    /// End of the blocked range (exclusive, checkout-style).
    pub to: NaiveDate,
    /// Why the range was blocked (maintenance, owner stay, ...).
    pub reason: String,
}
