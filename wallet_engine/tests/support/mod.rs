#![allow(dead_code)]

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex},
    time::Duration,
};

use gws_common::Money;
use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};
use wallet_engine::{GatewayStatus, PaymentGateway, PaymentGatewayError, SqliteDatabase};

pub async fn prepare_test_env(url: &str) {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    create_database(url).await;
    run_migrations(url).await;
}

pub fn random_db_path() -> String {
    format!("sqlite://{}/wallet_test_{}.db", std::env::temp_dir().display(), rand::random::<u64>())
}

pub async fn run_migrations(url: &str) {
    let db = SqliteDatabase::new_with_url(url, 5).await.expect("Error creating connection to database");
    db.run_migrations().await.expect("Error running DB migrations");
    info!("🚀️ Migrations complete");
}

pub async fn create_database<P: AsRef<Path>>(path: P) {
    let p = path.as_ref().as_os_str().to_str().unwrap();
    if let Err(e) = Sqlite::drop_database(p).await {
        warn!("Error dropping database {p}: {e:?}");
    }
    Sqlite::create_database(p).await.expect("Error creating database");
}

/// Creates a fresh, migrated database and returns a handle to it.
pub async fn new_test_db() -> SqliteDatabase {
    let url = random_db_path();
    prepare_test_env(&url).await;
    SqliteDatabase::new_with_url(&url, 10).await.expect("Error creating database")
}

//--------------------------------------    StubGateway     ----------------------------------------------------------

#[derive(Default)]
struct StubGatewayInner {
    statuses: HashMap<String, GatewayStatus>,
    unreachable: bool,
    delay: Option<Duration>,
    next_id: u64,
}

/// An in-memory stand-in for the payment gateway. Tests script its answers: the status of each
/// transaction, whether the gateway is reachable, and how long it takes to reply.
#[derive(Clone, Default)]
pub struct StubGateway {
    inner: Arc<Mutex<StubGatewayInner>>,
}

impl StubGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&self, gateway_tx_id: &str, status: GatewayStatus) {
        self.inner.lock().unwrap().statuses.insert(gateway_tx_id.to_string(), status);
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.inner.lock().unwrap().unreachable = unreachable;
    }

    pub fn set_delay(&self, delay: Option<Duration>) {
        self.inner.lock().unwrap().delay = delay;
    }
}

impl PaymentGateway for StubGateway {
    async fn create_transaction(&self, _amount: Money) -> Result<String, PaymentGatewayError> {
        let txid = {
            let mut inner = self.inner.lock().unwrap();
            if inner.unreachable {
                return Err(PaymentGatewayError::RequestError("connection refused".to_string()));
            }
            inner.next_id += 1;
            let txid = format!("gwtx-{:04}", inner.next_id);
            inner.statuses.insert(txid.clone(), GatewayStatus::Pending);
            txid
        };
        Ok(txid)
    }

    async fn query_status(&self, gateway_tx_id: &str) -> Result<GatewayStatus, PaymentGatewayError> {
        let (delay, result) = {
            let inner = self.inner.lock().unwrap();
            if inner.unreachable {
                return Err(PaymentGatewayError::RequestError("connection refused".to_string()));
            }
            let result = inner.statuses.get(gateway_tx_id).copied().ok_or(PaymentGatewayError::QueryError {
                status: 404,
                message: format!("unknown transaction {gateway_tx_id}"),
            });
            (inner.delay, result)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        result
    }
}
