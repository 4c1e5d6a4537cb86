//! Per-connection subscription manager.
//!
//! Tracks which rooms a WebSocket client is subscribed to and provides
//! server-side event filtering. Events without a room (sync summaries)
//! only reach wildcard subscribers.

use std::collections::HashSet;

use crate::domain::BookingEvent;

/// Manages the room subscriptions for a single WebSocket connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Subscribed room IDs. If `subscribe_all` is true, this set is ignored.
    room_ids: HashSet<String>,
    /// Whether the client subscribes to all rooms (wildcard `"*"`).
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds room IDs to the subscription set. `"*"` enables the wildcard.
    pub fn subscribe(&mut self, ids: &[String], wildcard: bool) {
        if wildcard {
            self.subscribe_all = true;
        }
        for id in ids {
            self.room_ids.insert(id.clone());
        }
    }

    /// Removes room IDs from the subscription set.
    pub fn unsubscribe(&mut self, ids: &[String]) {
        for id in ids {
            self.room_ids.remove(id);
        }
    }

    /// Returns `true` if the given room ID matches the subscription filter.
    #[must_use]
    pub fn matches(&self, room_id: &str) -> bool {
        self.subscribe_all || self.room_ids.contains(room_id)
    }

    /// Returns `true` if the event should be delivered to this client.
    #[must_use]
    pub fn matches_event(&self, event: &BookingEvent) -> bool {
        match event.room_id() {
            Some(room_id) => self.matches(room_id),
            None => self.subscribe_all,
        }
    }

    /// Returns the number of explicitly subscribed room IDs.
    #[must_use]
    pub fn count(&self) -> usize {
        self.room_ids.len()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::BookingId;
    use chrono::Utc;

    #[test]
    fn empty_matches_nothing() {
        let mgr = SubscriptionManager::new();
        assert!(!mgr.matches("camera-blu"));
    }

    #[test]
    fn subscribe_specific_room() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&["camera-blu".to_string()], false);
        assert!(mgr.matches("camera-blu"));
        assert!(!mgr.matches("camera-verde"));
    }

    #[test]
    fn wildcard_matches_everything() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&[], true);
        assert!(mgr.matches("camera-blu"));
        assert!(mgr.matches("camera-verde"));
    }

    #[test]
    fn unsubscribe_removes_room() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&["camera-blu".to_string()], false);
        assert!(mgr.matches("camera-blu"));
        mgr.unsubscribe(&["camera-blu".to_string()]);
        assert!(!mgr.matches("camera-blu"));
    }

    #[test]
    fn sync_summary_only_reaches_wildcard() {
        let sync = BookingEvent::SyncCompleted {
            synced: 1,
            skipped: 0,
            total: 1,
            timestamp: Utc::now(),
        };
        let mut explicit = SubscriptionManager::new();
        explicit.subscribe(&["camera-blu".to_string()], false);
        assert!(!explicit.matches_event(&sync));

        let mut wildcard = SubscriptionManager::new();
        wildcard.subscribe(&[], true);
        assert!(wildcard.matches_event(&sync));

        let scoped = BookingEvent::PaymentConfirmed {
            booking_id: BookingId::new(),
            room_id: "camera-blu".to_string(),
            payment_ref: "pi-1".to_string(),
            timestamp: Utc::now(),
        };
        assert!(explicit.matches_event(&scoped));
    }
}
