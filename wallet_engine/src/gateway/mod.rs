//! The payment gateway collaborator.
//!
//! The wallet core makes exactly two calls against the gateway: open a transaction for an
//! amount, and ask for the authoritative status of a transaction. Nothing gateway-adjacent that
//! a *client* supplies (redirect parameters, posted status fields) is ever trusted; only the
//! answers from these two calls are.
mod error;
mod http;

use std::fmt::Display;

use gws_common::Money;
use serde::{Deserialize, Serialize};

pub use error::PaymentGatewayError;
pub use http::{GatewayConfig, HttpPaymentGateway};

/// The authoritative status of a gateway transaction, as reported by the gateway itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GatewayStatus {
    Completed,
    Failed,
    Cancelled,
    Pending,
}

impl Display for GatewayStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayStatus::Completed => write!(f, "COMPLETED"),
            GatewayStatus::Failed => write!(f, "FAILED"),
            GatewayStatus::Cancelled => write!(f, "CANCELLED"),
            GatewayStatus::Pending => write!(f, "PENDING"),
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait PaymentGateway: Clone {
    /// Asks the gateway to open a transaction for `amount`. Returns the gateway's transaction
    /// id, which doubles as the idempotency key for the eventual credit.
    async fn create_transaction(&self, amount: Money) -> Result<String, PaymentGatewayError>;

    /// Queries the gateway for the authoritative status of a transaction. This is a pure read
    /// and is always safe to retry.
    async fn query_status(&self, gateway_tx_id: &str) -> Result<GatewayStatus, PaymentGatewayError>;
}
