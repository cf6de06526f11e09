//! The behaviour a storage backend must provide to act as the wallet engine's database.
//!
//! [`WalletManagement`] covers the read-only surface (wallet lookups and ledger history).
//! [`WalletDatabase`] is the transaction coordinator contract: the *only* path through which a
//! wallet balance may change, with each operation an atomic unit against the wallet row and the
//! ledger together.
mod errors;
mod wallet_database;
mod wallet_management;

pub use errors::WalletApiError;
pub use wallet_database::WalletDatabase;
pub use wallet_management::WalletManagement;

/// Convenience alias for backends that provide both halves of the storage contract. Handlers and
/// APIs that need reads and writes are generic over this.
pub trait WalletBackend: WalletDatabase + WalletManagement {}

impl<T> WalletBackend for T where T: WalletDatabase + WalletManagement {}
