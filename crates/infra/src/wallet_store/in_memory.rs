//! In-memory wallet store with optimistic versioning.
//!
//! Intended for tests/dev and as the reference for real backends. Not
//! optimized for performance.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use ledgerkit_core::{AggregateRoot, WalletId};
use ledgerkit_transfer::ports::{StorageError, TransactionScope, UnitOfWork, WalletRepository};
use ledgerkit_wallet::Wallet;

/// Thread-safe in-memory wallet map.
///
/// Transactions record the version of every wallet they read and stage their
/// saves privately. Commit takes the write lock once, re-checks every staged
/// wallet against its recorded read version, and installs all staged wallets
/// together. Concurrent transactions touching the same wallet therefore
/// serialize: the first commit wins, the second fails with
/// [`StorageError::Conflict`] and can be re-run against fresh state. Readers
/// never observe a half-applied transaction.
#[derive(Debug, Default)]
pub struct InMemoryWalletStore {
    wallets: RwLock<HashMap<WalletId, Wallet>>,
}

impl InMemoryWalletStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a wallet outside any transaction (bootstrap/test setup).
    pub fn seed(&self, wallet: Wallet) -> Result<(), StorageError> {
        let mut wallets = self
            .wallets
            .write()
            .map_err(|_| StorageError::Backend("lock poisoned".to_string()))?;
        wallets.insert(*wallet.id(), wallet);
        Ok(())
    }

    /// Non-transactional read of the committed state.
    pub fn snapshot(&self, wallet_id: WalletId) -> Result<Option<Wallet>, StorageError> {
        let wallets = self
            .wallets
            .read()
            .map_err(|_| StorageError::Backend("lock poisoned".to_string()))?;
        Ok(wallets.get(&wallet_id).cloned())
    }
}

impl UnitOfWork for InMemoryWalletStore {
    fn begin<'a>(
        &'a self,
        _wallet_ids: &[WalletId],
    ) -> Result<Box<dyn TransactionScope + 'a>, StorageError> {
        // Optimistic backend: the id hint is not needed, conflicts are
        // detected at commit.
        Ok(Box::new(InMemoryTx {
            store: self,
            read_versions: HashMap::new(),
            staged: BTreeMap::new(),
        }))
    }
}

/// One open transaction. Dropping it discards the staged saves (rollback).
struct InMemoryTx<'a> {
    store: &'a InMemoryWalletStore,
    /// Version observed at first read; `None` means the wallet was absent.
    read_versions: HashMap<WalletId, Option<u64>>,
    staged: BTreeMap<WalletId, Wallet>,
}

impl WalletRepository for InMemoryTx<'_> {
    fn find_by_id(&mut self, wallet_id: WalletId) -> Result<Option<Wallet>, StorageError> {
        // Reads within the scope observe the scope's own unsaved writes.
        if let Some(staged) = self.staged.get(&wallet_id) {
            return Ok(Some(staged.clone()));
        }

        let wallets = self
            .store
            .wallets
            .read()
            .map_err(|_| StorageError::Backend("lock poisoned".to_string()))?;
        let found = wallets.get(&wallet_id).cloned();

        self.read_versions
            .entry(wallet_id)
            .or_insert_with(|| found.as_ref().map(Wallet::version));
        Ok(found)
    }

    fn save(&mut self, wallet: &Wallet) -> Result<(), StorageError> {
        self.staged.insert(*wallet.id(), wallet.clone());
        Ok(())
    }
}

impl TransactionScope for InMemoryTx<'_> {
    fn commit(self: Box<Self>) -> Result<(), StorageError> {
        let mut wallets = self
            .store
            .wallets
            .write()
            .map_err(|_| StorageError::Backend("lock poisoned".to_string()))?;

        // Re-check every staged wallet before writing anything. A wallet
        // read as absent, or never read at all, is only safe as a fresh
        // insert.
        for wallet_id in self.staged.keys() {
            let current = wallets.get(wallet_id).map(Wallet::version);
            let expected = self.read_versions.get(wallet_id).copied().unwrap_or(None);
            if current != expected {
                return Err(StorageError::Conflict(format!(
                    "wallet {wallet_id} was modified concurrently"
                )));
            }
        }

        for (wallet_id, wallet) in self.staged {
            wallets.insert(wallet_id, wallet);
        }
        Ok(())
    }

    fn rollback(self: Box<Self>) -> Result<(), StorageError> {
        // Staged saves are dropped with the scope.
        Ok(())
    }
}
