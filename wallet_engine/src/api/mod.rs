mod errors;
mod reconciliation_api;
mod wallet_api;
mod wallet_objects;

pub use errors::ReconciliationError;
pub use reconciliation_api::{ConfirmOutcome, ReconciliationApi};
pub use wallet_api::WalletApi;
pub use wallet_objects::WalletHistory;
