//! Log-only collaborator implementations for local development.
//!
//! The binary needs concrete ports to start without provider
//! credentials. These implementations succeed unconditionally and log
//! what a real provider integration would do.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use super::channel::{ChannelManager, ChannelRecord};
use super::notifier::{CostBreakdown, Notifier, RefundInfo};
use super::payment::{ChargeRequest, ChargeSession, PaymentGateway, PaymentStatus, RefundReceipt};
use super::token::{CachedToken, TokenCache, TokenRefresher};
use crate::domain::{Booking, Money};
use crate::error::EngineError;

/// Payment gateway that approves everything and logs the traffic.
#[derive(Debug, Default)]
pub struct LocalPaymentGateway;

#[async_trait]
impl PaymentGateway for LocalPaymentGateway {
    async fn create_charge(&self, request: &ChargeRequest) -> Result<ChargeSession, EngineError> {
        let payment_ref = format!("local-{}", uuid::Uuid::new_v4());
        tracing::info!(
            amount = %request.amount,
            booking_ref = %request.booking_ref,
            %payment_ref,
            "local gateway: charge session opened"
        );
        Ok(ChargeSession {
            redirect_url: format!("http://localhost/pay/{payment_ref}"),
            payment_ref,
        })
    }

    async fn create_refund(
        &self,
        payment_ref: &str,
        amount: Money,
        reason: &str,
    ) -> Result<RefundReceipt, EngineError> {
        tracing::info!(%payment_ref, %amount, reason, "local gateway: refund issued");
        Ok(RefundReceipt {
            refund_id: format!("local-re-{}", uuid::Uuid::new_v4()),
        })
    }

    async fn get_status(&self, _payment_ref: &str) -> Result<PaymentStatus, EngineError> {
        Ok(PaymentStatus::Succeeded)
    }
}

/// Token refresher that mints throwaway local tokens.
#[derive(Debug, Default)]
struct LocalTokenRefresher;

#[async_trait]
impl TokenRefresher for LocalTokenRefresher {
    async fn refresh(&self) -> Result<CachedToken, EngineError> {
        tracing::debug!("local channel manager: token refreshed");
        Ok(CachedToken {
            value: format!("local-tok-{}", uuid::Uuid::new_v4()),
            expires_at: Utc::now() + chrono::Duration::hours(1),
        })
    }
}

/// Channel manager with no channels behind it. Authenticates through a
/// [`TokenCache`] the way a real channel client would, just against a
/// local refresher.
#[derive(Debug)]
pub struct LocalChannelManager {
    tokens: TokenCache,
}

impl LocalChannelManager {
    /// Creates a local channel manager with an empty token cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tokens: TokenCache::new(Arc::new(LocalTokenRefresher)),
        }
    }
}

impl Default for LocalChannelManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChannelManager for LocalChannelManager {
    async fn list_bookings(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<ChannelRecord>, EngineError> {
        self.tokens.get_valid_token(Utc::now()).await?;
        tracing::debug!(%from, %to, "local channel manager: empty feed");
        Ok(Vec::new())
    }

    async fn block_date_range(
        &self,
        room_id: &str,
        from: NaiveDate,
        to: NaiveDate,
        reference: &str,
    ) -> Result<(), EngineError> {
        self.tokens.get_valid_token(Utc::now()).await?;
        tracing::info!(room_id, %from, %to, reference, "local channel manager: block");
        Ok(())
    }

    async fn unblock_date_range(&self, reference: &str) -> Result<(), EngineError> {
        self.tokens.get_valid_token(Utc::now()).await?;
        tracing::info!(reference, "local channel manager: unblock");
        Ok(())
    }
}

/// Notifier that writes messages to the log instead of sending email.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn booking_confirmed(&self, booking: &Booking) -> Result<(), EngineError> {
        tracing::info!(booking_id = %booking.id, email = %booking.contact.email,
            "notify: booking confirmed");
        Ok(())
    }

    async fn booking_cancelled(
        &self,
        booking: &Booking,
        refund: &RefundInfo,
    ) -> Result<(), EngineError> {
        tracing::info!(booking_id = %booking.id, refund = %refund.refund_amount,
            penalty = %refund.penalty_amount, "notify: booking cancelled");
        Ok(())
    }

    async fn booking_modified(
        &self,
        booking: &Booking,
        costs: &CostBreakdown,
    ) -> Result<(), EngineError> {
        tracing::info!(booking_id = %booking.id, old_total = %costs.old_total,
            new_total = %costs.new_total, delta = costs.delta,
            "notify: booking modified");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn channel_calls_authenticate_through_the_token_cache() {
        let channel = LocalChannelManager::new();
        let from = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap_or_default();
        let to = NaiveDate::from_ymd_opt(2026, 10, 31).unwrap_or_default();

        let feed = channel.list_bookings(from, to).await;
        assert_eq!(feed.ok().map(|records| records.len()), Some(0));

        // Repeat calls reuse the cached token rather than failing.
        assert!(channel.block_date_range("camera-blu", from, to, "ref-1").await.is_ok());
        assert!(channel.unblock_date_range("ref-1").await.is_ok());
    }
}
