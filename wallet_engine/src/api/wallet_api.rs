//! Unified API for wallet reads and purchase payments.

use std::fmt::Debug;

use gws_common::Money;
use log::*;

use crate::{
    api::wallet_objects::WalletHistory,
    db_types::{EntryCategory, EntryRef, LedgerEntry, Wallet},
    traits::{WalletApiError, WalletBackend},
};

/// `WalletApi` is the storefront-facing surface for everything except topups: balance reads,
/// account statements, and synchronous order payments. Topups go through
/// [`crate::ReconciliationApi`], because they involve the external gateway.
pub struct WalletApi<B> {
    db: B,
}

impl<B: Debug> Debug for WalletApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WalletApi ({:?})", self.db)
    }
}

impl<B> WalletApi<B>
where B: WalletBackend
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Returns the user's wallet, creating it with a zero balance on first access.
    pub async fn wallet_for_user(&self, user_id: i64) -> Result<Wallet, WalletApiError> {
        self.db.fetch_or_create_wallet(user_id).await
    }

    pub async fn wallet_by_id(&self, wallet_id: i64) -> Result<Option<Wallet>, WalletApiError> {
        self.db.fetch_wallet(wallet_id).await
    }

    /// The user's wallet plus their most recent `limit` ledger entries, newest first.
    pub async fn wallet_with_history(&self, user_id: i64, limit: u32) -> Result<WalletHistory, WalletApiError> {
        let wallet = self.db.fetch_or_create_wallet(user_id).await?;
        let entries = self.db.history(wallet.id, limit).await?;
        trace!("🔄️ Fetched {} ledger entries for wallet #{}", entries.len(), wallet.id);
        Ok(WalletHistory { wallet, entries })
    }

    /// Pays for an order out of the user's wallet, synchronously. Either the balance update and
    /// its ledger entry both commit, or [`WalletApiError::InsufficientBalance`] reports the
    /// current and required amounts and nothing changes.
    pub async fn pay_for_order(
        &self,
        user_id: i64,
        amount: Money,
        order_id: &str,
        memo: Option<String>,
    ) -> Result<(Wallet, LedgerEntry), WalletApiError> {
        if !amount.is_positive() {
            return Err(WalletApiError::InvalidAmount(format!("payment amount must be positive, got {amount}")));
        }
        let wallet = self.db.fetch_or_create_wallet(user_id).await?;
        let entry = self
            .db
            .debit(wallet.id, amount, EntryCategory::Purchase, Some(EntryRef::order(order_id)), memo)
            .await?;
        debug!("🔄️ Order {order_id} paid: {amount} debited from wallet #{}", wallet.id);
        let wallet = self
            .db
            .fetch_wallet(wallet.id)
            .await?
            .ok_or(WalletApiError::WalletNotFound(wallet.id))?;
        Ok((wallet, entry))
    }
}
