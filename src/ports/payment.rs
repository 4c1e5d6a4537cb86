//! Payment gateway contract.
//!
//! One abstract contract fronts every concrete provider (card, wallet,
//! bank redirect). All amounts are integer minor currency units. The
//! engine performs zero automatic retries on these calls: a failed
//! charge blocks the operation, a failed refund is logged for manual
//! follow-up, and neither is silently retried to avoid double-charging
//! or double-refunding.

use async_trait::async_trait;

use crate::domain::Money;
use crate::error::EngineError;

/// Request to open a hosted checkout session.
#[derive(Debug, Clone)]
pub struct ChargeRequest {
    /// Amount to collect, minor units.
    pub amount: Money,
    /// ISO currency code.
    pub currency: String,
    /// Booking reference embedded in the session for correlation.
    pub booking_ref: String,
    /// Where the provider redirects on success.
    pub success_url: String,
    /// Where the provider redirects on abandonment.
    pub cancel_url: String,
}

/// An open checkout session the guest must complete.
#[derive(Debug, Clone)]
pub struct ChargeSession {
    /// Provider-hosted payment page.
    pub redirect_url: String,
    /// Provider reference for later status checks.
    pub payment_ref: String,
}

/// Receipt for an issued refund.
#[derive(Debug, Clone)]
pub struct RefundReceipt {
    /// Provider refund identifier.
    pub refund_id: String,
}

/// Status of a payment as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    /// Session open, not yet completed.
    Pending,
    /// Funds captured.
    Succeeded,
    /// Session failed or was abandoned.
    Failed,
}

/// Abstract payment provider.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Opens a checkout session for the given amount.
    async fn create_charge(&self, request: &ChargeRequest) -> Result<ChargeSession, EngineError>;

    /// Issues a refund against an earlier payment.
    async fn create_refund(
        &self,
        payment_ref: &str,
        amount: Money,
        reason: &str,
    ) -> Result<RefundReceipt, EngineError>;

    /// Reports the current status of a payment.
    async fn get_status(&self, payment_ref: &str) -> Result<PaymentStatus, EngineError>;
}
