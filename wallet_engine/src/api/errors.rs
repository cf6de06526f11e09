use thiserror::Error;

use crate::{gateway::PaymentGatewayError, traits::WalletApiError};

#[derive(Debug, Clone, Error)]
pub enum ReconciliationError {
    #[error(transparent)]
    Wallet(#[from] WalletApiError),
    #[error("Payment gateway error. {0}")]
    Gateway(#[from] PaymentGatewayError),
}
