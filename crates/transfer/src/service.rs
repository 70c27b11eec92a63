//! The transfer service: validate, mutate, persist atomically.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use ledgerkit_core::{CurrencyCode, LedgerError, LedgerResult, TransferId, WalletId};

use crate::ports::{StorageError, UnitOfWork};

/// How many times a transfer is re-run after losing an optimistic
/// concurrency race before giving up with `PersistenceConflict`.
const MAX_CONFLICT_RETRIES: u32 = 3;

/// Record of a completed transfer (not persisted by the core).
///
/// `reference` is a UUIDv7, so references issued by one process sort in
/// issue order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferResult {
    pub reference: TransferId,
    pub from_wallet_id: WalletId,
    pub to_wallet_id: WalletId,
    pub currency: CurrencyCode,
    /// Amount moved, in minor units.
    pub amount: i64,
    pub executed_at: DateTime<Utc>,
}

/// Moves funds between two wallets of the same organization.
///
/// Validations are front-loaded and side-effect-free; the only mutating
/// steps (wallet mutation + save + commit) run inside a single
/// [`TransactionScope`](crate::ports::TransactionScope), so a failure at any
/// point leaves both wallets' persisted state untouched. Safe to share
/// across threads; transfers hitting the same wallet serialize through the
/// storage backend and the loser of a race is retried against fresh state.
pub struct TransferService {
    uow: Arc<dyn UnitOfWork>,
}

impl TransferService {
    pub fn new(uow: Arc<dyn UnitOfWork>) -> Self {
        Self { uow }
    }

    /// Transfer `amount` minor units of `currency` between two wallets.
    ///
    /// Either the full transfer commits and a [`TransferResult`] is
    /// returned, or nothing observable happened.
    pub fn transfer(
        &self,
        from_wallet_id: WalletId,
        to_wallet_id: WalletId,
        amount: i64,
        currency: &CurrencyCode,
    ) -> LedgerResult<TransferResult> {
        // Reject before touching storage.
        if from_wallet_id == to_wallet_id {
            return Err(LedgerError::SelfTransfer(from_wallet_id));
        }
        if amount <= 0 {
            return Err(LedgerError::invalid_amount(format!(
                "transfer amount must be positive (got {amount})"
            )));
        }

        let mut attempt = 0;
        loop {
            match self.try_transfer(from_wallet_id, to_wallet_id, amount, currency) {
                Err(LedgerError::PersistenceConflict(reason)) if attempt < MAX_CONFLICT_RETRIES => {
                    attempt += 1;
                    warn!(
                        %from_wallet_id,
                        %to_wallet_id,
                        attempt,
                        %reason,
                        "transfer lost a concurrency race, retrying"
                    );
                }
                Ok(result) => {
                    info!(
                        reference = %result.reference,
                        %from_wallet_id,
                        %to_wallet_id,
                        currency = %result.currency,
                        amount = result.amount,
                        "transfer committed"
                    );
                    return Ok(result);
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// One read-validate-mutate-commit cycle.
    fn try_transfer(
        &self,
        from_wallet_id: WalletId,
        to_wallet_id: WalletId,
        amount: i64,
        currency: &CurrencyCode,
    ) -> LedgerResult<TransferResult> {
        // Ascending id order; lock-based backends rely on it (see ports).
        let ids = if from_wallet_id < to_wallet_id {
            [from_wallet_id, to_wallet_id]
        } else {
            [to_wallet_id, from_wallet_id]
        };

        // Any early return below drops the scope, which rolls it back.
        let mut tx = self.uow.begin(&ids).map_err(into_conflict)?;

        let mut source = tx
            .find_by_id(from_wallet_id)
            .map_err(into_conflict)?
            .ok_or(LedgerError::WalletNotFound(from_wallet_id))?;
        let mut destination = tx
            .find_by_id(to_wallet_id)
            .map_err(into_conflict)?
            .ok_or(LedgerError::WalletNotFound(to_wallet_id))?;

        // Side-effect-free validation, inside the same scope as the mutation
        // so it cannot race with another writer.
        source.ensure_active()?;
        destination.ensure_active()?;
        if source.organization_id() != destination.organization_id() {
            return Err(LedgerError::CrossOrganizationTransfer {
                from_org: source.organization_id(),
                to_org: destination.organization_id(),
            });
        }

        // The only mutating steps, through the wallets' own operations.
        source.deduct_balance(currency, amount)?;
        destination.add_balance(currency, amount)?;

        tx.save(&source).map_err(into_conflict)?;
        tx.save(&destination).map_err(into_conflict)?;
        tx.commit().map_err(into_conflict)?;

        Ok(TransferResult {
            reference: TransferId::new(),
            from_wallet_id,
            to_wallet_id,
            currency: currency.clone(),
            amount,
            executed_at: Utc::now(),
        })
    }
}

fn into_conflict(err: StorageError) -> LedgerError {
    LedgerError::conflict(err.to_string())
}
