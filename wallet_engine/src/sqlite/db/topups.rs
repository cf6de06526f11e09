use sqlx::SqliteConnection;

use crate::{
    db_types::{NewTopupRequest, TopupRequest, TopupStatus},
    traits::WalletApiError,
};

pub async fn insert(request: NewTopupRequest, conn: &mut SqliteConnection) -> Result<TopupRequest, WalletApiError> {
    let gateway_tx_id = request.gateway_tx_id.clone();
    let row = sqlx::query_as(
        r#"
            INSERT INTO topup_requests (gateway_tx_id, user_id, amount) VALUES ($1, $2, $3)
            RETURNING *;
        "#,
    )
    .bind(request.gateway_tx_id)
    .bind(request.user_id)
    .bind(request.amount)
    .fetch_one(conn)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(err) if err.is_unique_violation() => {
            WalletApiError::TopupAlreadyExists(gateway_tx_id)
        },
        _ => WalletApiError::from(e),
    })?;
    Ok(row)
}

pub async fn fetch(gateway_tx_id: &str, conn: &mut SqliteConnection) -> Result<Option<TopupRequest>, WalletApiError> {
    let request = sqlx::query_as("SELECT * FROM topup_requests WHERE gateway_tx_id = $1")
        .bind(gateway_tx_id)
        .fetch_optional(conn)
        .await?;
    Ok(request)
}

/// Moves a request to `status` in a single guarded statement. Terminal rows never match the
/// guard, so two racing confirms with contradictory gateway answers cannot overwrite each
/// other's settled state; the loser gets `None` and the caller sorts out why.
pub async fn update_status_guarded(
    gateway_tx_id: &str,
    status: TopupStatus,
    conn: &mut SqliteConnection,
) -> Result<Option<TopupRequest>, WalletApiError> {
    let request = sqlx::query_as(
        r#"UPDATE topup_requests SET
           status = $1,
           updated_at = CURRENT_TIMESTAMP
           WHERE gateway_tx_id = $2 AND status NOT IN ('completed', 'failed')
           RETURNING *"#,
    )
    .bind(status)
    .bind(gateway_tx_id)
    .fetch_optional(conn)
    .await?;
    Ok(request)
}
