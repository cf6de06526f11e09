//! Wallet Engine
//!
//! The wallet engine is the one part of the storefront that moves money: it owns per-user wallet
//! balances, the append-only ledger behind them, and the reconciliation flow that turns external
//! payment-gateway confirmations into credits.
//!
//! The library is divided into three main sections:
//! 1. Database management and control ([`mod@sqlite`]). SQLite is the supported backend. You
//!    should never need to access the database directly; use the public APIs instead. The
//!    exception is the data types used in the database, which are defined in [`mod@db_types`] and
//!    are public.
//! 2. The public API ([`mod@api`]). [`WalletApi`] covers balance reads and purchase debits;
//!    [`ReconciliationApi`] covers the topup flow against the payment gateway. Backends implement
//!    the traits in [`mod@traits`] to plug in underneath these APIs.
//! 3. The payment gateway client ([`mod@gateway`]): the two-call contract the engine has with the
//!    external gateway, and an HTTP implementation of it.
mod sqlite;

pub mod api;
pub mod db_types;
pub mod gateway;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use api::{ConfirmOutcome, ReconciliationApi, ReconciliationError, WalletApi, WalletHistory};
pub use gateway::{GatewayConfig, GatewayStatus, HttpPaymentGateway, PaymentGateway, PaymentGatewayError};
pub use sqlite::SqliteDatabase;
pub use traits::{WalletApiError, WalletBackend, WalletDatabase, WalletManagement};
