use serde::Serialize;

use crate::db_types::{LedgerEntry, Wallet};

/// A wallet together with a recency page of its ledger, for account statements.
#[derive(Debug, Clone, Serialize)]
pub struct WalletHistory {
    pub wallet: Wallet,
    pub entries: Vec<LedgerEntry>,
}
