//! Collaborator interfaces the transfer operation depends on.
//!
//! Implementations are an external concern (database rows, an in-memory map,
//! a test double); the service only sees these traits. Errors here are
//! **infrastructure** errors, folded into
//! [`LedgerError::PersistenceConflict`](ledgerkit_core::LedgerError) at the
//! service boundary.

use thiserror::Error;

use ledgerkit_core::WalletId;
use ledgerkit_wallet::Wallet;

/// Storage operation error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Optimistic/lock conflict: another transaction won; retrying with a
    /// fresh read may succeed.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The backend itself failed (IO, poisoned lock, connection loss).
    #[error("backend failure: {0}")]
    Backend(String),
}

/// Load/save wallets by identity.
///
/// `find_by_id` returns a snapshot: two reads without an intervening
/// committed mutation must return equal wallets. Within a transaction scope,
/// reads observe that scope's own unsaved writes.
pub trait WalletRepository {
    fn find_by_id(&mut self, wallet_id: WalletId) -> Result<Option<Wallet>, StorageError>;

    fn save(&mut self, wallet: &Wallet) -> Result<(), StorageError>;
}

/// One atomic transaction over the repository.
///
/// Saves issued on the scope become visible to other readers only at
/// `commit`, all together or not at all. Dropping the scope without
/// committing rolls it back, so every early return inside a transaction
/// resolves cleanly.
pub trait TransactionScope: WalletRepository {
    fn commit(self: Box<Self>) -> Result<(), StorageError>;

    fn rollback(self: Box<Self>) -> Result<(), StorageError>;
}

/// Transaction factory.
pub trait UnitOfWork: Send + Sync {
    /// Open a transaction that may mutate the given wallets.
    ///
    /// Callers pass the ids in ascending order; lock-based backends acquire
    /// per-wallet locks in exactly that order so two transfers touching the
    /// same pair of wallets cannot deadlock. Optimistic backends may ignore
    /// the hint and detect conflicts at commit instead.
    fn begin<'a>(
        &'a self,
        wallet_ids: &[WalletId],
    ) -> Result<Box<dyn TransactionScope + 'a>, StorageError>;
}
