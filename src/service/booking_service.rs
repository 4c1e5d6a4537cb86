//! Booking service: orchestrates policy evaluation, settlement, and
//! lifecycle transitions.
//!
//! Every operation follows the same shape: re-read current state from
//! the store, evaluate the pure policy, perform required-before-commit
//! collaborator calls, write the authoritative state change, then run
//! best-effort side effects (refunds owed, channel sync, notifications)
//! whose failures are logged and never unwind the committed write.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::domain::{
    BlockedDateRange, Booking, BookingEvent, BookingId, BookingStatus, EventBus, GuestContact,
    Money, Origin, RefundRecord, Room, StayDates, TransitionEvent, TransitionOutcome,
    apply_transition,
};
use crate::error::EngineError;
use crate::policy::{
    CancellationOutcome, DateChangeQuote, PolicyConfig, cancellation_outcome, date_change_quote,
    guest_change_price, price_for_stay,
};
use crate::ports::{
    BookingStore, ChannelManager, ChargeRequest, ChargeSession, CostBreakdown, Notifier,
    PaymentGateway, PaymentStatus, RefundInfo,
};

/// New-booking request from the site checkout flow.
#[derive(Debug, Clone)]
pub struct NewBookingRequest {
    /// Room to book.
    pub room_id: String,
    /// Arrival date.
    pub check_in: NaiveDate,
    /// Departure date (exclusive).
    pub check_out: NaiveDate,
    /// Guest count.
    pub guests: u32,
    /// Guest contact details.
    pub contact: GuestContact,
}

/// Orchestration layer for all booking operations.
#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn BookingStore>,
    payments: Arc<dyn PaymentGateway>,
    channel: Arc<dyn ChannelManager>,
    notifier: Arc<dyn Notifier>,
    event_bus: EventBus,
    policy: PolicyConfig,
    site_base_url: String,
}

impl std::fmt::Debug for BookingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingService")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl BookingService {
    /// Creates a new `BookingService`.
    #[must_use]
    pub fn new(
        store: Arc<dyn BookingStore>,
        payments: Arc<dyn PaymentGateway>,
        channel: Arc<dyn ChannelManager>,
        notifier: Arc<dyn Notifier>,
        event_bus: EventBus,
        policy: PolicyConfig,
        site_base_url: String,
    ) -> Self {
        Self {
            store,
            payments,
            channel,
            notifier,
            event_bus,
            policy,
            site_base_url,
        }
    }

    /// Fetches a booking by id.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::BookingNotFound`] when it does not exist.
    pub async fn get_booking(&self, id: BookingId) -> Result<Booking, EngineError> {
        self.store
            .get(id)
            .await?
            .ok_or(EngineError::BookingNotFound(id))
    }

    /// Lists all bookings.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn list_bookings(&self) -> Result<Vec<Booking>, EngineError> {
        self.store.list().await
    }

    /// Lists all rooms.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn list_rooms(&self) -> Result<Vec<Room>, EngineError> {
        self.store.list_rooms().await
    }

    async fn room_for(&self, room_id: &str) -> Result<Room, EngineError> {
        self.store
            .get_room(room_id)
            .await?
            .ok_or_else(|| EngineError::RoomNotFound(room_id.to_string()))
    }

    /// Creates a `Pending` booking and opens the deposit charge session.
    ///
    /// The charge session is created before the insert so a gateway
    /// failure leaves no stored state behind.
    ///
    /// # Errors
    ///
    /// Validation errors for bad dates or guest counts, and upstream
    /// failures from the gateway or store.
    pub async fn create_booking(
        &self,
        request: NewBookingRequest,
    ) -> Result<(Booking, ChargeSession), EngineError> {
        let today = Utc::now().date_naive();
        if request.check_in < today {
            return Err(EngineError::InvalidDateRange(
                "check-in cannot be in the past".to_string(),
            ));
        }
        let stay = StayDates::new(request.check_in, request.check_out)?;
        let room = self.room_for(&request.room_id).await?;
        let total = price_for_stay(&room.rate_plan, request.guests, stay.nights())?;

        let booking = Booking::new_site(
            request.room_id,
            stay,
            request.guests,
            total,
            "EUR".to_string(),
            request.contact,
            self.policy.deposit_pct,
            Utc::now(),
        );

        let session = self
            .payments
            .create_charge(&self.charge_request(booking.deposit_paid, &booking))
            .await?;

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
        tracing::info!(booking_id = %booking.id, room_id = %booking.room_id,
            total = %booking.total_amount, "booking created");

        Ok((booking, session))
    }

    /// Handles a payment-gateway callback confirming the deposit.
    ///
    /// Idempotent against replay: a second callback for an already-paid
    /// booking returns the stored booking unchanged and runs no side
    /// effects.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PaymentNotConfirmed`] when the gateway does
    /// not report the payment as succeeded, and the usual not-found and
    /// cancelled-booking errors.
    pub async fn handle_payment_callback(
        &self,
        id: BookingId,
        payment_ref: &str,
    ) -> Result<Booking, EngineError> {
        let booking = self.get_booking(id).await?;

        let status = self.payments.get_status(payment_ref).await?;
        if status != PaymentStatus::Succeeded {
            return Err(EngineError::PaymentNotConfirmed(format!(
                "gateway reports {payment_ref} as {status:?}"
            )));
        }

        let event = TransitionEvent::PaymentConfirmed {
            payment_ref: payment_ref.to_string(),
        };
        let updated = match apply_transition(&booking, event, Utc::now())? {
            TransitionOutcome::Applied(updated) => updated,
            TransitionOutcome::NoOp => {
                tracing::info!(booking_id = %id, payment_ref,
                    "payment callback replay ignored");
                return Ok(booking);
            }
        };
        self.store.update(&updated).await?;

        // Best-effort from here on: the booking is paid.
        if let Err(e) = self
            .store
            .link_guest_account(&updated.contact.email, updated.id)
            .await
        {
            tracing::warn!(booking_id = %id, error = %e, "guest account link failed");
        }
        if let Err(e) = self.notifier.booking_confirmed(&updated).await {
            tracing::warn!(booking_id = %id, error = %e, "confirmation notification failed");
        }
        if let Err(e) = self
            .channel
            .block_date_range(
                &updated.room_id,
                updated.stay.check_in,
                updated.stay.check_out,
                &updated.id.to_string(),
            )
            .await
        {
            tracing::warn!(booking_id = %id, error = %e, "channel block failed");
        }

        self.event_bus.publish(BookingEvent::PaymentConfirmed {
            booking_id: updated.id,
            room_id: updated.room_id.clone(),
            payment_ref: payment_ref.to_string(),
            timestamp: Utc::now(),
        });
        tracing::info!(booking_id = %id, payment_ref, "booking marked paid");

        Ok(updated)
    }

    /// Quotes a date change; when the guest owes money, also opens a
    /// charge session for the deposit share of the delta.
    ///
    /// # Errors
    ///
    /// Policy and validation errors from the quote, gateway failures
    /// when a session is needed.
    pub async fn quote_date_change(
        &self,
        id: BookingId,
        new_check_in: NaiveDate,
        new_check_out: NaiveDate,
    ) -> Result<(DateChangeQuote, Option<ChargeSession>), EngineError> {
        let booking = self.get_booking(id).await?;
        let room = self.room_for(&booking.room_id).await?;
        let quote = date_change_quote(
            &booking,
            &room.rate_plan,
            new_check_in,
            new_check_out,
            Utc::now().date_naive(),
            &self.policy,
        )?;

        let session = if quote.delta > 0 {
            // The delta follows the overall deposit policy: collect the
            // deposit share now, the rest joins the balance due.
            let (due_now, _) = Money::from_minor(quote.delta).deposit_split(self.policy.deposit_pct);
            Some(
                self.payments
                    .create_charge(&self.charge_request(due_now, &booking))
                    .await?,
            )
        } else {
            None
        };

        Ok((quote, session))
    }

    /// Commits a date change after settlement.
    ///
    /// When the delta is positive a succeeded payment reference is
    /// required before anything is written. When negative, the refund is
    /// attempted first; its failure is logged and the change commits
    /// anyway, because money owed to the guest is no reason to trap them
    /// in a stale booking.
    ///
    /// # Errors
    ///
    /// Quote errors, [`EngineError::PaymentNotConfirmed`] for an unpaid
    /// positive delta, and store failures.
    pub async fn commit_date_change(
        &self,
        id: BookingId,
        new_check_in: NaiveDate,
        new_check_out: NaiveDate,
        payment_ref: Option<&str>,
    ) -> Result<Booking, EngineError> {
        let booking = self.get_booking(id).await?;
        let room = self.room_for(&booking.room_id).await?;
        let quote = date_change_quote(
            &booking,
            &room.rate_plan,
            new_check_in,
            new_check_out,
            Utc::now().date_naive(),
            &self.policy,
        )?;

        if quote.delta > 0 {
            self.require_succeeded_payment(payment_ref).await?;
        } else if quote.delta < 0 {
            self.refund_best_effort(&booking, Money::from_minor(-quote.delta), "date change")
                .await;
        }

        let old_total = booking.total_amount;
        let new_total = old_total.checked_add(Money::from_minor(quote.delta))?;
        let mut updated = booking;
        updated.stay = quote.new_stay;
        updated.set_total(new_total, self.policy.deposit_pct, Utc::now());
        self.store.update(&updated).await?;

        self.notify_modified(
            &updated,
            CostBreakdown {
                old_total,
                new_total,
                penalty: quote.penalty,
                delta: quote.delta,
            },
        )
        .await;
        tracing::info!(booking_id = %id, delta = quote.delta, "date change committed");

        Ok(updated)
    }

    /// Quotes a guest-count increase; the difference is always owed, so
    /// a charge session is opened alongside.
    ///
    /// # Errors
    ///
    /// Policy errors from the price computation and gateway failures.
    pub async fn quote_guest_change(
        &self,
        id: BookingId,
        new_guests: u32,
    ) -> Result<(Money, ChargeSession), EngineError> {
        let booking = self.get_booking(id).await?;
        let room = self.room_for(&booking.room_id).await?;
        let difference = guest_change_price(&booking, &room.rate_plan, new_guests)?;
        let session = self
            .payments
            .create_charge(&self.charge_request(difference, &booking))
            .await?;
        Ok((difference, session))
    }

    /// Commits a guest-count increase after the payment for the
    /// difference has succeeded. Guest count and amounts update in one
    /// store write.
    ///
    /// # Errors
    ///
    /// Policy errors, [`EngineError::PaymentNotConfirmed`] without a
    /// succeeded payment, and store failures.
    pub async fn commit_guest_change(
        &self,
        id: BookingId,
        new_guests: u32,
        payment_ref: Option<&str>,
    ) -> Result<Booking, EngineError> {
        let booking = self.get_booking(id).await?;
        let room = self.room_for(&booking.room_id).await?;
        let difference = guest_change_price(&booking, &room.rate_plan, new_guests)?;

        if difference.is_positive() {
            self.require_succeeded_payment(payment_ref).await?;
        }

        let old_total = booking.total_amount;
        let new_total = old_total.checked_add(difference)?;
        let mut updated = booking;
        updated.guests = new_guests;
        updated.set_total(new_total, self.policy.deposit_pct, Utc::now());
        self.store.update(&updated).await?;

        self.notify_modified(
            &updated,
            CostBreakdown {
                old_total,
                new_total,
                penalty: Money::ZERO,
                delta: difference.minor(),
            },
        )
        .await;
        tracing::info!(booking_id = %id, new_guests, difference = %difference,
            "guest change committed");

        Ok(updated)
    }

    /// Cancels a booking: refund first (best-effort), then the
    /// authoritative status write, then channel unblock and the guest
    /// notification (both best-effort).
    ///
    /// # Errors
    ///
    /// [`EngineError::BookingCancelled`] when already cancelled,
    /// [`EngineError::BookingAlreadyStarted`] when check-in has passed,
    /// and store failures.
    pub async fn cancel_booking(
        &self,
        id: BookingId,
    ) -> Result<(Booking, CancellationOutcome), EngineError> {
        let booking = self.get_booking(id).await?;
        if booking.status == BookingStatus::Cancelled {
            return Err(EngineError::BookingCancelled(id));
        }

        let outcome = cancellation_outcome(
            booking.stay.check_in,
            booking.total_amount,
            Utc::now().date_naive(),
            &self.policy,
        )?;

        // (1) Refund, best-effort. The audit record states whether the
        // money actually moved.
        let refund = if outcome.refund_amount.is_positive() {
            let issued = self
                .refund_best_effort(&booking, outcome.refund_amount, "cancellation")
                .await;
            let reason = if issued {
                format!("{}% cancellation refund", outcome.refund_percentage)
            } else {
                format!(
                    "{}% cancellation refund not issued, manual follow-up required",
                    outcome.refund_percentage
                )
            };
            Some(RefundRecord {
                amount: outcome.refund_amount,
                reason,
                refunded_at: Utc::now(),
            })
        } else {
            None
        };

        // (2) Authoritative state change.
        let updated = match apply_transition(&booking, TransitionEvent::Cancel { refund }, Utc::now())?
        {
            TransitionOutcome::Applied(updated) => updated,
            TransitionOutcome::NoOp => return Err(EngineError::BookingCancelled(id)),
        };
        self.store.update(&updated).await?;

        // (3) Release channel availability for site bookings.
        if updated.origin == Origin::Site {
            let reference = updated
                .channel_booking_id
                .clone()
                .unwrap_or_else(|| updated.id.to_string());
            if let Err(e) = self.channel.unblock_date_range(&reference).await {
                tracing::warn!(booking_id = %id, error = %e, "channel unblock failed");
            }
        }

        // (4) Tell the guest.
        let refund_info = RefundInfo {
            refund_amount: outcome.refund_amount,
            penalty_amount: outcome.penalty_amount,
        };
        if let Err(e) = self.notifier.booking_cancelled(&updated, &refund_info).await {
            tracing::warn!(booking_id = %id, error = %e, "cancellation notification failed");
        }

        self.event_bus.publish(BookingEvent::BookingCancelled {
            booking_id: updated.id,
            room_id: updated.room_id.clone(),
            refund_amount: outcome.refund_amount,
            penalty_amount: outcome.penalty_amount,
            timestamp: Utc::now(),
        });
        tracing::info!(booking_id = %id, refund = %outcome.refund_amount,
            penalty = %outcome.penalty_amount, "booking cancelled");

        Ok((updated, outcome))
    }

    /// Records an admin availability block and pushes it to the
    /// external channels (best-effort).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidDateRange`] for an empty range and
    /// [`EngineError::RoomNotFound`] for unknown rooms.
    pub async fn block_room(
        &self,
        room_id: &str,
        from: NaiveDate,
        to: NaiveDate,
        reason: String,
    ) -> Result<BlockedDateRange, EngineError> {
        if from >= to {
            return Err(EngineError::InvalidDateRange(
                "block range must cover at least one night".to_string(),
            ));
        }
        self.room_for(room_id).await?;
        let block = BlockedDateRange {
            room_id: room_id.to_string(),
            from,
            to,
            reason,
        };
        self.store.insert_block(&block).await?;
        if let Err(e) = self
            .channel
            .block_date_range(room_id, from, to, &block_reference(room_id, from))
            .await
        {
            tracing::warn!(room_id, error = %e, "channel block failed");
        }
        tracing::info!(room_id, %from, %to, "room blocked");
        Ok(block)
    }

    /// Removes admin availability blocks inside the range and releases
    /// each of them on the external channels (best-effort). Returns how
    /// many blocks were removed.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn unblock_room(
        &self,
        room_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<u64, EngineError> {
        let removed = self.store.remove_blocks(room_id, from, to).await?;
        for block in &removed {
            if let Err(e) = self
                .channel
                .unblock_date_range(&block_reference(&block.room_id, block.from))
                .await
            {
                tracing::warn!(room_id, block_from = %block.from, error = %e,
                    "channel unblock failed");
            }
        }
        let removed = removed.len() as u64;
        tracing::info!(room_id, %from, %to, removed, "room unblocked");
        Ok(removed)
    }

    fn charge_request(&self, amount: Money, booking: &Booking) -> ChargeRequest {
        ChargeRequest {
            amount,
            currency: booking.currency.clone(),
            booking_ref: booking.id.to_string(),
            success_url: format!("{}/checkout/success", self.site_base_url),
            cancel_url: format!("{}/checkout/cancelled", self.site_base_url),
        }
    }

    async fn require_succeeded_payment(
        &self,
        payment_ref: Option<&str>,
    ) -> Result<(), EngineError> {
        let Some(payment_ref) = payment_ref else {
            return Err(EngineError::PaymentNotConfirmed(
                "a completed payment is required before committing this change".to_string(),
            ));
        };
        let status = self.payments.get_status(payment_ref).await?;
        if status != PaymentStatus::Succeeded {
            return Err(EngineError::PaymentNotConfirmed(format!(
                "gateway reports {payment_ref} as {status:?}"
            )));
        }
        Ok(())
    }

    /// Attempts the refund and reports whether it was actually issued.
    /// A failure never blocks the caller's commit.
    async fn refund_best_effort(&self, booking: &Booking, amount: Money, context: &str) -> bool {
        let Some(payment_ref) = booking.payment_ref.as_deref() else {
            tracing::warn!(booking_id = %booking.id, context,
                "refund owed but no payment reference on record");
            return false;
        };
        match self
            .payments
            .create_refund(payment_ref, amount, context)
            .await
        {
            Ok(receipt) => {
                tracing::info!(booking_id = %booking.id, refund_id = %receipt.refund_id,
                    %amount, context, "refund issued");
                true
            }
            Err(e) => {
                // Logged for manual follow-up.
                tracing::error!(booking_id = %booking.id, %amount, context, error = %e,
                    "refund failed");
                false
            }
        }
    }

    async fn notify_modified(&self, booking: &Booking, costs: CostBreakdown) {
        if let Err(e) = self.notifier.booking_modified(booking, &costs).await {
            tracing::warn!(booking_id = %booking.id, error = %e,
                "modification notification failed");
        }
        self.event_bus.publish(BookingEvent::BookingModified {
            booking_id: booking.id,
            room_id: booking.room_id.clone(),
            old_total: costs.old_total,
            new_total: costs.new_total,
            delta: costs.delta,
            timestamp: Utc::now(),
        });
    }
}

/// Stable reference under which a manual block is pushed to (and later
/// released from) the channel manager.
fn block_reference(room_id: &str, from: NaiveDate) -> String {
    format!("block:{room_id}:{from}")
}
