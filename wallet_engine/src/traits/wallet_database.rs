use gws_common::Money;

use crate::{
    db_types::{EntryCategory, EntryRef, LedgerEntry, NewTopupRequest, TopupRequest, TopupStatus, Wallet},
    traits::WalletApiError,
};

/// The transaction coordinator contract. Implementations are the sole authority permitted to
/// mutate a wallet balance, and every mutating call must be atomic: the balance update and its
/// ledger entry commit together or not at all, and concurrent mutations of the same wallet must
/// serialise their read-modify-write steps.
#[allow(async_fn_in_trait)]
pub trait WalletDatabase: Clone {
    /// The URL of the database.
    fn url(&self) -> &str;

    /// Returns the user's wallet, creating it with a zero balance on first access. Must be safe
    /// under concurrent first-time calls for the same user: both callers observe the same row.
    async fn fetch_or_create_wallet(&self, user_id: i64) -> Result<Wallet, WalletApiError>;

    /// Credits `amount` to the wallet and appends the completed ledger entry in one atomic unit.
    ///
    /// If `external_transaction_id` is given and a completed entry with that id already exists,
    /// the existing entry is returned unchanged: replaying a gateway confirmation is not an
    /// error, and must not move money twice.
    async fn credit(
        &self,
        wallet_id: i64,
        amount: Money,
        category: EntryCategory,
        reference: Option<EntryRef>,
        external_transaction_id: Option<String>,
        memo: Option<String>,
    ) -> Result<LedgerEntry, WalletApiError>;

    /// Debits `amount` from the wallet and appends the completed ledger entry in one atomic
    /// unit. Fails with [`WalletApiError::InsufficientBalance`], reporting the current balance
    /// and the requested amount, if the wallet cannot cover it; no mutation occurs in that case.
    async fn debit(
        &self,
        wallet_id: i64,
        amount: Money,
        category: EntryCategory,
        reference: Option<EntryRef>,
        memo: Option<String>,
    ) -> Result<LedgerEntry, WalletApiError>;

    /// Records a topup attempt at `initiate` time, so that confirmation can re-derive the amount
    /// and user server-side. Writes nothing to the ledger.
    async fn insert_topup_request(&self, request: NewTopupRequest) -> Result<TopupRequest, WalletApiError>;

    async fn fetch_topup_request(&self, gateway_tx_id: &str) -> Result<Option<TopupRequest>, WalletApiError>;

    /// Moves a topup request to `status`. Transitions out of a terminal state are rejected with
    /// [`WalletApiError::IllegalTopupTransition`].
    async fn update_topup_status(
        &self,
        gateway_tx_id: &str,
        status: TopupStatus,
    ) -> Result<TopupRequest, WalletApiError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), WalletApiError> {
        Ok(())
    }
}
