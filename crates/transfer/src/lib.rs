//! Transfer operation: moving funds between two wallets as one atomic unit.
//!
//! The service owns validation and the wallet mutations; persistence and
//! transaction scoping are behind the [`ports`] interfaces so backends
//! (SQL, in-memory, test doubles) stay external.

pub mod ports;
pub mod service;

pub use ports::{StorageError, TransactionScope, UnitOfWork, WalletRepository};
pub use service::{TransferResult, TransferService};
