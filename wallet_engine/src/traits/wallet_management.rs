use crate::{
    db_types::{LedgerEntry, Wallet},
    traits::WalletApiError,
};

/// Read-only access to wallets and their ledger history. These calls run concurrently with each
/// other and with mutators; they take no locks beyond normal isolation.
#[allow(async_fn_in_trait)]
pub trait WalletManagement: Clone {
    /// Fetches the wallet with the given id, or `None` if it does not exist.
    async fn fetch_wallet(&self, wallet_id: i64) -> Result<Option<Wallet>, WalletApiError>;

    /// Fetches the wallet belonging to the given user, or `None` if the user has never touched
    /// their wallet.
    async fn fetch_wallet_for_user(&self, user_id: i64) -> Result<Option<Wallet>, WalletApiError>;

    /// Returns up to `limit` ledger entries for the wallet, newest first. A fresh call re-reads
    /// current state; there are no restart semantics beyond calling again.
    async fn history(&self, wallet_id: i64, limit: u32) -> Result<Vec<LedgerEntry>, WalletApiError>;

    /// Idempotency lookup: the completed entry recorded for the given external transaction id,
    /// if any.
    async fn fetch_entry_by_external_id(&self, txid: &str) -> Result<Option<LedgerEntry>, WalletApiError>;
}
