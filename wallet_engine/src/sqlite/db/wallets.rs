use gws_common::Money;
use log::debug;
use sqlx::SqliteConnection;

use crate::{db_types::Wallet, traits::WalletApiError};

/// Returns the user's wallet, creating a zero-balance one if this is the first access.
///
/// The uniqueness constraint on `user_id` plus `ON CONFLICT DO NOTHING` resolves the
/// concurrent-first-access race: whichever caller loses the insert still fetches the same row.
pub async fn fetch_or_create_wallet(user_id: i64, conn: &mut SqliteConnection) -> Result<Wallet, WalletApiError> {
    let result = sqlx::query("INSERT INTO wallets (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
        .bind(user_id)
        .execute(&mut *conn)
        .await?;
    if result.rows_affected() > 0 {
        debug!("🗃️ Created new wallet for user #{user_id}");
    }
    let wallet = sqlx::query_as("SELECT * FROM wallets WHERE user_id = $1").bind(user_id).fetch_one(conn).await?;
    Ok(wallet)
}

pub async fn wallet_by_id(wallet_id: i64, conn: &mut SqliteConnection) -> Result<Option<Wallet>, WalletApiError> {
    let wallet =
        sqlx::query_as("SELECT * FROM wallets WHERE id = $1").bind(wallet_id).fetch_optional(conn).await?;
    Ok(wallet)
}

pub async fn wallet_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Option<Wallet>, WalletApiError> {
    let wallet =
        sqlx::query_as("SELECT * FROM wallets WHERE user_id = $1").bind(user_id).fetch_optional(conn).await?;
    Ok(wallet)
}

pub async fn wallet_balance(wallet_id: i64, conn: &mut SqliteConnection) -> Result<Option<Money>, WalletApiError> {
    let balance = sqlx::query_scalar("SELECT balance FROM wallets WHERE id = $1")
        .bind(wallet_id)
        .fetch_optional(conn)
        .await?;
    Ok(balance)
}

/// Adds `amount` to the wallet balance in a single guarded statement, returning the new balance,
/// or `None` if the wallet does not exist. The single-statement read-modify-write is what
/// serialises concurrent mutators on the wallet row.
pub async fn increment_balance(
    wallet_id: i64,
    amount: Money,
    conn: &mut SqliteConnection,
) -> Result<Option<Money>, WalletApiError> {
    let balance = sqlx::query_scalar(
        r#"UPDATE wallets SET
           balance = balance + $1,
           updated_at = CURRENT_TIMESTAMP
           WHERE id = $2
           RETURNING balance"#,
    )
    .bind(amount)
    .bind(wallet_id)
    .fetch_optional(conn)
    .await?;
    Ok(balance)
}

/// Subtracts `amount` from the wallet balance, guarded so the balance can never go negative.
/// Returns the new balance, or `None` if the wallet does not exist *or* cannot cover the amount;
/// the caller distinguishes the two with [`wallet_balance`].
pub async fn decrement_balance_guarded(
    wallet_id: i64,
    amount: Money,
    conn: &mut SqliteConnection,
) -> Result<Option<Money>, WalletApiError> {
    let balance = sqlx::query_scalar(
        r#"UPDATE wallets SET
           balance = balance - $1,
           updated_at = CURRENT_TIMESTAMP
           WHERE id = $2 AND balance >= $1
           RETURNING balance"#,
    )
    .bind(amount)
    .bind(wallet_id)
    .fetch_optional(conn)
    .await?;
    Ok(balance)
}
