//! Domain error model.
//!
//! A closed taxonomy of deterministic, caller-reportable failures. Every
//! failure path in the ledger maps to exactly one of these kinds so callers
//! can render precise feedback; none of them should ever crash the process.
//! Infrastructure concerns (storage, locking) live elsewhere and are folded
//! into [`LedgerError::PersistenceConflict`] at the service boundary.

use thiserror::Error;

use crate::currency::CurrencyCode;
use crate::id::{OrganizationId, WalletId};

/// Result type used across the domain layer.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Domain-level error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Amount is zero/negative, non-numeric, or has the wrong precision for
    /// the currency.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Referenced wallet id does not exist.
    #[error("wallet not found: {0}")]
    WalletNotFound(WalletId),

    /// Wallet is frozen or closed and an active-only operation was attempted.
    #[error("wallet {wallet_id} is not active ({status})")]
    WalletNotActive { wallet_id: WalletId, status: String },

    /// Deduction would make a balance negative.
    #[error("insufficient funds: {available} {currency} available, {requested} requested")]
    InsufficientFunds {
        currency: CurrencyCode,
        available: i64,
        requested: i64,
    },

    /// Deduction requested in a currency the wallet has never held.
    #[error("wallet holds no {0} balance")]
    UnknownCurrency(CurrencyCode),

    /// Source and destination wallets belong to different organizations.
    #[error("cross-organization transfer: {from_org} -> {to_org}")]
    CrossOrganizationTransfer {
        from_org: OrganizationId,
        to_org: OrganizationId,
    },

    /// Source and destination are the same wallet.
    #[error("cannot transfer from wallet {0} to itself")]
    SelfTransfer(WalletId),

    /// Illegal wallet status change (e.g. reactivating a closed wallet).
    #[error("invalid state transition: {0}")]
    InvalidStateTransition(String),

    /// Unit of work commit failed (concurrent modification or storage
    /// failure); no partial state was persisted.
    #[error("persistence conflict: {0}")]
    PersistenceConflict(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl LedgerError {
    pub fn invalid_amount(msg: impl Into<String>) -> Self {
        Self::InvalidAmount(msg.into())
    }

    pub fn invalid_transition(msg: impl Into<String>) -> Self {
        Self::InvalidStateTransition(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::PersistenceConflict(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
