use sqlx::SqliteConnection;

use crate::{
    db_types::{LedgerEntry, NewLedgerEntry},
    traits::WalletApiError,
};

/// Inserts one completed, immutable ledger row. Called only from within a coordinator
/// transaction, in the same atomic unit as the wallet balance update.
///
/// A unique violation on the external transaction id is mapped to
/// [`WalletApiError::DuplicateEntry`] so the coordinator can resolve the idempotent replay
/// instead of surfacing an error.
pub async fn insert(entry: NewLedgerEntry, conn: &mut SqliteConnection) -> Result<LedgerEntry, WalletApiError> {
    let txid = entry.external_transaction_id.clone();
    let (ref_type, ref_id) = match entry.reference {
        Some(r) => (Some(r.ref_type), Some(r.ref_id)),
        None => (None, None),
    };
    let row = sqlx::query_as(
        r#"
            INSERT INTO ledger_entries
                (wallet_id, entry_type, category, amount, balance_before, balance_after,
                 reference_type, reference_id, external_transaction_id, memo, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'completed')
            RETURNING *;
        "#,
    )
    .bind(entry.wallet_id)
    .bind(entry.entry_type)
    .bind(entry.category)
    .bind(entry.amount)
    .bind(entry.balance_before)
    .bind(entry.balance_after)
    .bind(ref_type)
    .bind(ref_id)
    .bind(entry.external_transaction_id)
    .bind(entry.memo)
    .fetch_one(conn)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(err) if err.is_unique_violation() => {
            WalletApiError::DuplicateEntry(txid.unwrap_or_default())
        },
        _ => WalletApiError::from(e),
    })?;
    Ok(row)
}

/// The most recent `limit` entries for a wallet, newest first.
pub async fn history(
    wallet_id: i64,
    limit: u32,
    conn: &mut SqliteConnection,
) -> Result<Vec<LedgerEntry>, WalletApiError> {
    let entries = sqlx::query_as("SELECT * FROM ledger_entries WHERE wallet_id = $1 ORDER BY id DESC LIMIT $2")
        .bind(wallet_id)
        .bind(limit)
        .fetch_all(conn)
        .await?;
    Ok(entries)
}

pub async fn entry_for_external_id(
    txid: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<LedgerEntry>, WalletApiError> {
    let entry = sqlx::query_as(
        "SELECT * FROM ledger_entries WHERE external_transaction_id = $1 AND status = 'completed'",
    )
    .bind(txid)
    .fetch_optional(conn)
    .await?;
    Ok(entry)
}
