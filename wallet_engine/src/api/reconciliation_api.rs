//! Bridges topup requests to the external, untrusted payment gateway.
//!
//! The flow is deliberately lopsided: `initiate` records everything we will ever need to credit
//! the wallet (user, amount, gateway transaction id) *before* the user leaves for the gateway,
//! and `confirm` re-derives all of it from that record plus the gateway's own status answer.
//! Whatever the returning client claims about the payment is at most a lookup hint.

use std::{fmt::Debug, time::Duration};

use gws_common::Money;
use log::*;

use crate::{
    api::errors::ReconciliationError,
    db_types::{EntryCategory, EntryRef, LedgerEntry, NewTopupRequest, TopupRequest, TopupStatus},
    gateway::{GatewayStatus, PaymentGateway},
    traits::{WalletApiError, WalletBackend},
};

/// The result of one `confirm` call. `Pending` is explicitly retryable: calling `confirm` again
/// later is always safe because the eventual credit is keyed on the gateway transaction id.
#[derive(Debug, Clone)]
pub enum ConfirmOutcome {
    /// The gateway settled the payment and the wallet has been credited (now, or on an earlier
    /// confirm of the same transaction).
    Completed(LedgerEntry),
    /// The gateway has not settled the payment yet, or could not be reached. Nothing changed.
    Pending,
    /// The gateway reported the payment as failed or cancelled. No credit will ever occur for
    /// this transaction.
    Failed,
}

pub struct ReconciliationApi<B, G> {
    db: B,
    gateway: G,
    status_timeout: Duration,
}

impl<B, G> Debug for ReconciliationApi<B, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReconciliationApi")
    }
}

impl<B, G> ReconciliationApi<B, G>
where
    B: WalletBackend,
    G: PaymentGateway,
{
    pub fn new(db: B, gateway: G, status_timeout: Duration) -> Self {
        Self { db, gateway, status_timeout }
    }

    /// Opens a gateway transaction for `amount` on behalf of `user_id` and records the attempt.
    /// Nothing is written to the ledger yet; the money only moves once the gateway confirms.
    pub async fn initiate(&self, user_id: i64, amount: Money) -> Result<String, ReconciliationError> {
        if !amount.is_positive() {
            return Err(WalletApiError::InvalidAmount(format!("topup amount must be positive, got {amount}")).into());
        }
        let gateway_tx_id = self.gateway.create_transaction(amount).await?;
        let request = NewTopupRequest { gateway_tx_id: gateway_tx_id.clone(), user_id, amount };
        self.db.insert_topup_request(request).await?;
        info!("🔄️ Topup initiated for user #{user_id}: {amount} under gateway transaction [{gateway_tx_id}]");
        Ok(gateway_tx_id)
    }

    /// Looks up the recorded topup attempt for a gateway transaction id, if any.
    pub async fn topup_request(&self, gateway_tx_id: &str) -> Result<Option<TopupRequest>, ReconciliationError> {
        Ok(self.db.fetch_topup_request(gateway_tx_id).await?)
    }

    /// Settles a topup attempt against the gateway's authoritative status.
    ///
    /// Any number of confirms for the same completed gateway transaction yield exactly one
    /// credit, because the credit carries the gateway transaction id as its idempotency key.
    /// A request that already reached a terminal state is answered from our own records without
    /// touching the gateway again.
    pub async fn confirm(&self, gateway_tx_id: &str) -> Result<ConfirmOutcome, ReconciliationError> {
        let request = self
            .db
            .fetch_topup_request(gateway_tx_id)
            .await?
            .ok_or_else(|| WalletApiError::TopupNotFound(gateway_tx_id.to_string()))?;

        match request.status {
            TopupStatus::Completed => {
                let entry = self
                    .db
                    .fetch_entry_by_external_id(gateway_tx_id)
                    .await?
                    .ok_or_else(|| WalletApiError::EntryNotFound(gateway_tx_id.to_string()))?;
                debug!("🔄️ Topup [{gateway_tx_id}] was already settled. Returning the recorded entry");
                Ok(ConfirmOutcome::Completed(entry))
            },
            TopupStatus::Failed => {
                debug!("🔄️ Topup [{gateway_tx_id}] already failed. No credit will occur");
                Ok(ConfirmOutcome::Failed)
            },
            TopupStatus::Initiated | TopupStatus::Pending => self.settle(gateway_tx_id, &request).await,
        }
    }

    async fn settle(
        &self,
        gateway_tx_id: &str,
        request: &TopupRequest,
    ) -> Result<ConfirmOutcome, ReconciliationError> {
        let status = match tokio::time::timeout(self.status_timeout, self.gateway.query_status(gateway_tx_id)).await
        {
            Err(_) => {
                warn!("🔄️ Gateway status query for [{gateway_tx_id}] timed out. Treating as indeterminate");
                self.db.update_topup_status(gateway_tx_id, TopupStatus::Pending).await?;
                return Ok(ConfirmOutcome::Pending);
            },
            Ok(Err(e)) => {
                warn!("🔄️ Gateway unreachable for [{gateway_tx_id}]: {e}. Treating as indeterminate");
                self.db.update_topup_status(gateway_tx_id, TopupStatus::Pending).await?;
                return Ok(ConfirmOutcome::Pending);
            },
            Ok(Ok(status)) => status,
        };

        match status {
            GatewayStatus::Completed => {
                let wallet = self.db.fetch_or_create_wallet(request.user_id).await?;
                // Credit first, then flip the request: if the flip fails, the request stays
                // pending and a later confirm replays the credit idempotently.
                let entry = self
                    .db
                    .credit(
                        wallet.id,
                        request.amount,
                        EntryCategory::Topup,
                        Some(EntryRef::gateway(gateway_tx_id)),
                        Some(gateway_tx_id.to_string()),
                        None,
                    )
                    .await?;
                self.db.update_topup_status(gateway_tx_id, TopupStatus::Completed).await?;
                info!(
                    "🔄️ Topup [{gateway_tx_id}] settled: {} credited to wallet #{}",
                    request.amount, wallet.id
                );
                Ok(ConfirmOutcome::Completed(entry))
            },
            GatewayStatus::Failed | GatewayStatus::Cancelled => {
                self.db.update_topup_status(gateway_tx_id, TopupStatus::Failed).await?;
                info!("🔄️ Topup [{gateway_tx_id}] reported {status} by the gateway. No credit will occur");
                Ok(ConfirmOutcome::Failed)
            },
            GatewayStatus::Pending => {
                self.db.update_topup_status(gateway_tx_id, TopupStatus::Pending).await?;
                debug!("🔄️ Topup [{gateway_tx_id}] still pending at the gateway");
                Ok(ConfirmOutcome::Pending)
            },
        }
    }
}
