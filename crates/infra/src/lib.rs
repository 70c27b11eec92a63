//! Infrastructure implementations of the ledger's collaborator ports.
//!
//! Currently the in-memory store only; a SQL-backed store would implement
//! the same traits behind row-level locking instead of optimistic versions.

pub mod wallet_store;

pub use wallet_store::InMemoryWalletStore;
