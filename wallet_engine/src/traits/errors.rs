use gws_common::Money;
use thiserror::Error;

use crate::db_types::TopupStatus;

#[derive(Debug, Clone, Error)]
pub enum WalletApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Wallet {0} does not exist")]
    WalletNotFound(i64),
    #[error("Insufficient balance. The wallet holds {current} but {required} is required")]
    InsufficientBalance { current: Money, required: Money },
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("A completed ledger entry already exists for external transaction {0}")]
    DuplicateEntry(String),
    #[error("No ledger entry found for external transaction {0}")]
    EntryNotFound(String),
    #[error("No topup has been initiated for gateway transaction {0}")]
    TopupNotFound(String),
    #[error("A topup request for gateway transaction {0} already exists")]
    TopupAlreadyExists(String),
    #[error("Topup {gateway_tx_id} is {from} and cannot become {to}")]
    IllegalTopupTransition { gateway_tx_id: String, from: TopupStatus, to: TopupStatus },
}

impl From<sqlx::Error> for WalletApiError {
    fn from(e: sqlx::Error) -> Self {
        Self::DatabaseError(e.to_string())
    }
}
