use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use gws_common::Money;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Invalid conversion: {0}")]
pub struct ConversionError(String);

//--------------------------------------       Wallet        ---------------------------------------------------------

/// The per-user balance record. There is exactly one wallet per user; it is created lazily on
/// first access and only ever mutated through [`crate::traits::WalletDatabase::credit`] and
/// [`crate::traits::WalletDatabase::debit`].
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Wallet {
    pub id: i64,
    pub user_id: i64,
    pub balance: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------     EntryType       ---------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Credit,
    Debit,
}

impl Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryType::Credit => write!(f, "credit"),
            EntryType::Debit => write!(f, "debit"),
        }
    }
}

//--------------------------------------    EntryCategory    ---------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EntryCategory {
    /// A credit originating from an external payment gateway confirmation.
    Topup,
    /// A debit paying for an order.
    Purchase,
    /// A credit reversing an earlier purchase.
    Refund,
}

impl Display for EntryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryCategory::Topup => write!(f, "topup"),
            EntryCategory::Purchase => write!(f, "purchase"),
            EntryCategory::Refund => write!(f, "refund"),
        }
    }
}

impl FromStr for EntryCategory {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "topup" => Ok(Self::Topup),
            "purchase" => Ok(Self::Purchase),
            "refund" => Ok(Self::Refund),
            s => Err(ConversionError(format!("Invalid entry category: {s}"))),
        }
    }
}

//--------------------------------------     EntryStatus     ---------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// The entry exists but does not count towards the wallet balance.
    Pending,
    /// The entry is final and immutable. Corrections happen via new offsetting entries.
    Completed,
    Failed,
}

impl Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryStatus::Pending => write!(f, "pending"),
            EntryStatus::Completed => write!(f, "completed"),
            EntryStatus::Failed => write!(f, "failed"),
        }
    }
}

//--------------------------------------     LedgerEntry     ---------------------------------------------------------

/// One immutable, timestamped record of a balance-affecting event.
///
/// For a completed entry, `balance_after` is `balance_before` plus (credit) or minus (debit) the
/// amount, and equals the wallet balance at the instant the entry was committed.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LedgerEntry {
    pub id: i64,
    pub wallet_id: i64,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub category: EntryCategory,
    pub amount: Money,
    pub balance_before: Money,
    pub balance_after: Money,
    pub reference_type: Option<String>,
    pub reference_id: Option<String>,
    /// The idempotency key. Unique across all entries when present; a credit carrying an
    /// external transaction id that is already recorded is a replay, not a new mutation.
    pub external_transaction_id: Option<String>,
    pub memo: Option<String>,
    pub status: EntryStatus,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------      EntryRef       ---------------------------------------------------------

/// What a ledger entry points at in the rest of the system, e.g. an order or a gateway
/// transaction. The wallet engine never dereferences these; they are for statements and audits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRef {
    pub ref_type: String,
    pub ref_id: String,
}

impl EntryRef {
    pub fn order(order_id: &str) -> Self {
        Self { ref_type: "order".to_string(), ref_id: order_id.to_string() }
    }

    pub fn gateway(gateway_tx_id: &str) -> Self {
        Self { ref_type: "gateway_transaction".to_string(), ref_id: gateway_tx_id.to_string() }
    }
}

//--------------------------------------   NewLedgerEntry    ---------------------------------------------------------

#[derive(Debug, Clone)]
pub struct NewLedgerEntry {
    pub wallet_id: i64,
    pub entry_type: EntryType,
    pub category: EntryCategory,
    pub amount: Money,
    pub balance_before: Money,
    pub balance_after: Money,
    pub reference: Option<EntryRef>,
    pub external_transaction_id: Option<String>,
    pub memo: Option<String>,
}

impl NewLedgerEntry {
    pub fn credit(
        wallet_id: i64,
        amount: Money,
        category: EntryCategory,
        balance_before: Money,
        balance_after: Money,
    ) -> Self {
        Self {
            wallet_id,
            entry_type: EntryType::Credit,
            category,
            amount,
            balance_before,
            balance_after,
            reference: None,
            external_transaction_id: None,
            memo: None,
        }
    }

    pub fn debit(
        wallet_id: i64,
        amount: Money,
        category: EntryCategory,
        balance_before: Money,
        balance_after: Money,
    ) -> Self {
        Self {
            wallet_id,
            entry_type: EntryType::Debit,
            category,
            amount,
            balance_before,
            balance_after,
            reference: None,
            external_transaction_id: None,
            memo: None,
        }
    }
}

//--------------------------------------    TopupStatus      ---------------------------------------------------------

/// Lifecycle of a topup attempt: `initiated → pending → {completed | failed}`. The two terminal
/// states are sticky; a request never re-enters `pending` once settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TopupStatus {
    Initiated,
    Pending,
    Completed,
    Failed,
}

impl TopupStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TopupStatus::Completed | TopupStatus::Failed)
    }
}

impl Display for TopupStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopupStatus::Initiated => write!(f, "initiated"),
            TopupStatus::Pending => write!(f, "pending"),
            TopupStatus::Completed => write!(f, "completed"),
            TopupStatus::Failed => write!(f, "failed"),
        }
    }
}

//--------------------------------------    TopupRequest     ---------------------------------------------------------

/// The server-side record of a topup attempt, captured at `initiate` time.
///
/// This is what makes the confirmation flow safe against a tampering client: the amount and user
/// credited on confirmation come from this row and the gateway's own status response, never from
/// anything carried through a redirect.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TopupRequest {
    pub id: i64,
    pub gateway_tx_id: String,
    pub user_id: i64,
    pub amount: Money,
    pub status: TopupStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTopupRequest {
    pub gateway_tx_id: String,
    pub user_id: i64,
    pub amount: Money,
}
