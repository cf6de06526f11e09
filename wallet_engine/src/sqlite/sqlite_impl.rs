//! `SqliteDatabase` is the concrete SQLite backend for the wallet engine.
//!
//! It implements the [`WalletDatabase`] (transaction coordinator) and [`WalletManagement`]
//! (read-only) traits. All the money-moving methods here follow the same shape: open a pool
//! transaction whose *first* statement is the guarded balance update, append the ledger row in
//! the same transaction, and commit. Any failure on the way discards every partial write.
use std::fmt::Debug;

use gws_common::Money;
use log::*;
use sqlx::SqlitePool;

use super::db::{db_url, ledger, new_pool, topups, wallets};
use crate::{
    db_types::{
        EntryCategory,
        EntryRef,
        LedgerEntry,
        NewLedgerEntry,
        NewTopupRequest,
        TopupRequest,
        TopupStatus,
        Wallet,
    },
    traits::{WalletApiError, WalletDatabase, WalletManagement},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl WalletDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn fetch_or_create_wallet(&self, user_id: i64) -> Result<Wallet, WalletApiError> {
        let mut conn = self.pool.acquire().await?;
        wallets::fetch_or_create_wallet(user_id, &mut conn).await
    }

    /// Credits the wallet and appends the matching completed ledger entry, as one atomic unit.
    ///
    /// The idempotency check runs first on a plain pool connection, so that the transaction's
    /// first statement is the balance update and concurrent writers queue on the wallet row. The
    /// unique index on `external_transaction_id` backstops the check: if a replay slips past it
    /// concurrently, the insert fails, the whole unit rolls back, and the entry recorded by the
    /// winner is returned instead.
    async fn credit(
        &self,
        wallet_id: i64,
        amount: Money,
        category: EntryCategory,
        reference: Option<EntryRef>,
        external_transaction_id: Option<String>,
        memo: Option<String>,
    ) -> Result<LedgerEntry, WalletApiError> {
        if !amount.is_positive() {
            return Err(WalletApiError::InvalidAmount(format!("credit amount must be positive, got {amount}")));
        }
        if let Some(txid) = &external_transaction_id {
            let mut conn = self.pool.acquire().await?;
            if let Some(existing) = ledger::entry_for_external_id(txid, &mut conn).await? {
                debug!("🗃️ Replay of external transaction [{txid}]. Returning the recorded entry unchanged");
                return Ok(existing);
            }
        }

        let mut tx = self.pool.begin().await?;
        let balance_after = wallets::increment_balance(wallet_id, amount, &mut tx)
            .await?
            .ok_or(WalletApiError::WalletNotFound(wallet_id))?;
        let balance_before = balance_after - amount;
        let mut entry = NewLedgerEntry::credit(wallet_id, amount, category, balance_before, balance_after);
        entry.reference = reference;
        entry.external_transaction_id = external_transaction_id;
        entry.memo = memo;
        match ledger::insert(entry, &mut tx).await {
            Ok(row) => {
                tx.commit().await?;
                debug!("🗃️ Credited {amount} to wallet #{wallet_id}. Balance is now {balance_after}");
                Ok(row)
            },
            Err(WalletApiError::DuplicateEntry(txid)) => {
                tx.rollback().await?;
                debug!("🗃️ Lost the insert race for external transaction [{txid}]. Fetching the winner's entry");
                let mut conn = self.pool.acquire().await?;
                ledger::entry_for_external_id(&txid, &mut conn)
                    .await?
                    .ok_or(WalletApiError::EntryNotFound(txid))
            },
            Err(e) => Err(e),
        }
    }

    /// Debits the wallet and appends the matching completed ledger entry, as one atomic unit.
    ///
    /// The decrement is a single guarded statement (`... AND balance >= amount`), so two
    /// concurrent debits can never both observe a stale balance and overdraw the wallet: the
    /// loser matches zero rows and is reported as insufficient, with the balance it actually
    /// found.
    async fn debit(
        &self,
        wallet_id: i64,
        amount: Money,
        category: EntryCategory,
        reference: Option<EntryRef>,
        memo: Option<String>,
    ) -> Result<LedgerEntry, WalletApiError> {
        if !amount.is_positive() {
            return Err(WalletApiError::InvalidAmount(format!("debit amount must be positive, got {amount}")));
        }
        let mut tx = self.pool.begin().await?;
        match wallets::decrement_balance_guarded(wallet_id, amount, &mut tx).await? {
            Some(balance_after) => {
                let balance_before = balance_after + amount;
                let mut entry = NewLedgerEntry::debit(wallet_id, amount, category, balance_before, balance_after);
                entry.reference = reference;
                entry.memo = memo;
                let row = ledger::insert(entry, &mut tx).await?;
                tx.commit().await?;
                debug!("🗃️ Debited {amount} from wallet #{wallet_id}. Balance is now {balance_after}");
                Ok(row)
            },
            None => {
                // The guard matched no row: either the wallet is missing or it can't cover the
                // amount. We still hold the write lock, so this read is consistent.
                let current = wallets::wallet_balance(wallet_id, &mut tx)
                    .await?
                    .ok_or(WalletApiError::WalletNotFound(wallet_id))?;
                tx.rollback().await?;
                debug!("🗃️ Rejected debit of {amount} from wallet #{wallet_id}: balance is only {current}");
                Err(WalletApiError::InsufficientBalance { current, required: amount })
            },
        }
    }

    async fn insert_topup_request(&self, request: NewTopupRequest) -> Result<TopupRequest, WalletApiError> {
        let mut conn = self.pool.acquire().await?;
        let row = topups::insert(request, &mut conn).await?;
        debug!("🗃️ Recorded topup request [{}] for user #{}: {}", row.gateway_tx_id, row.user_id, row.amount);
        Ok(row)
    }

    async fn fetch_topup_request(&self, gateway_tx_id: &str) -> Result<Option<TopupRequest>, WalletApiError> {
        let mut conn = self.pool.acquire().await?;
        topups::fetch(gateway_tx_id, &mut conn).await
    }

    /// Moves a topup request to `status` via a single guarded statement, so a racing transition
    /// can never overwrite a terminal state. If the guard matches nothing, the row is either
    /// missing, already in the requested state, or settled; each case is resolved after the fact.
    async fn update_topup_status(
        &self,
        gateway_tx_id: &str,
        status: TopupStatus,
    ) -> Result<TopupRequest, WalletApiError> {
        let mut conn = self.pool.acquire().await?;
        if let Some(updated) = topups::update_status_guarded(gateway_tx_id, status, &mut conn).await? {
            debug!("🗃️ Topup [{gateway_tx_id}] moved to {status}");
            return Ok(updated);
        }
        let current = topups::fetch(gateway_tx_id, &mut conn)
            .await?
            .ok_or_else(|| WalletApiError::TopupNotFound(gateway_tx_id.to_string()))?;
        if current.status == status {
            return Ok(current);
        }
        Err(WalletApiError::IllegalTopupTransition {
            gateway_tx_id: gateway_tx_id.to_string(),
            from: current.status,
            to: status,
        })
    }

    async fn close(&mut self) -> Result<(), WalletApiError> {
        self.pool.close().await;
        Ok(())
    }
}

impl WalletManagement for SqliteDatabase {
    async fn fetch_wallet(&self, wallet_id: i64) -> Result<Option<Wallet>, WalletApiError> {
        let mut conn = self.pool.acquire().await?;
        wallets::wallet_by_id(wallet_id, &mut conn).await
    }

    async fn fetch_wallet_for_user(&self, user_id: i64) -> Result<Option<Wallet>, WalletApiError> {
        let mut conn = self.pool.acquire().await?;
        wallets::wallet_for_user(user_id, &mut conn).await
    }

    async fn history(&self, wallet_id: i64, limit: u32) -> Result<Vec<LedgerEntry>, WalletApiError> {
        let mut conn = self.pool.acquire().await?;
        ledger::history(wallet_id, limit, &mut conn).await
    }

    async fn fetch_entry_by_external_id(&self, txid: &str) -> Result<Option<LedgerEntry>, WalletApiError> {
        let mut conn = self.pool.acquire().await?;
        ledger::entry_for_external_id(txid, &mut conn).await
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using the URL from the environment.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Applies any outstanding schema migrations. The migration files are embedded at compile
    /// time, so the server can bring a fresh database up on its own.
    pub async fn run_migrations(&self) -> Result<(), WalletApiError> {
        sqlx::migrate!("./src/sqlite/migrations")
            .run(&self.pool)
            .await
            .map_err(|e| WalletApiError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
