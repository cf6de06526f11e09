//! # SQLite database methods
//!
//! This module contains the "low-level" SQLite interactions, one file per table.
//!
//! All interactions are simple functions (rather than stateful structs) that accept a
//! `&mut SqliteConnection` argument. Callers can obtain a connection from a pool, or create an
//! atomic transaction as the need arises, and call through to the functions without any other
//! changes.
use std::{env, str::FromStr, time::Duration};

use log::info;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    Error as SqlxError,
    SqlitePool,
};

pub mod ledger;
pub mod topups;
pub mod wallets;

const SQLITE_DB_URL: &str = "sqlite://data/wallet_store.db";

pub fn db_url() -> String {
    let result = env::var("GWS_DATABASE_URL").unwrap_or_else(|_| {
        info!("GWS_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("Using database URL: {result}");
    result
}

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    // WAL keeps readers unblocked while a writer holds the wallet row; the busy timeout queues
    // concurrent writers instead of failing them.
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(30))
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
    Ok(pool)
}
