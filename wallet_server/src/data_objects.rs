use std::fmt::Display;

use gws_common::Money;
use serde::{Deserialize, Serialize};
use wallet_engine::db_types::{LedgerEntry, Wallet};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopupInitiateParams {
    pub user_id: i64,
    pub amount: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopupInitiateResult {
    pub gateway_transaction_id: String,
}

/// A returning topup confirmation. Only `external_transaction_id` is authoritative; the other
/// fields are client-side echoes that are checked against our own records and ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopupConfirmParams {
    pub external_transaction_id: String,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub amount: Option<Money>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentParams {
    pub user_id: i64,
    pub amount: Money,
    pub order_id: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// The standard response for a successful money movement: the wallet as it stands now, plus the
/// ledger entry that recorded the movement.
#[derive(Debug, Clone, Serialize)]
pub struct WalletUpdateResult {
    pub wallet: Wallet,
    pub entry: LedgerEntry,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}
