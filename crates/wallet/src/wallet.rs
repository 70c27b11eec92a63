//! Wallet aggregate root.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use ledgerkit_core::{
    AggregateRoot, CurrencyCode, LedgerError, LedgerResult, OrganizationId, UserId, WalletId,
};

use crate::balance::Balance;

/// Wallet lifecycle status.
///
/// `Active ⇄ Frozen`, `Active | Frozen → Closed`; Closed is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletStatus {
    Active,
    Frozen,
    Closed,
}

impl core::fmt::Display for WalletStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            WalletStatus::Active => "active",
            WalletStatus::Frozen => "frozen",
            WalletStatus::Closed => "closed",
        };
        f.write_str(s)
    }
}

/// Aggregate root: a user's per-currency balances within one organization.
///
/// The balance map is keyed by currency code with one entry per currency
/// ever funded. It is only reachable mutably through `add_balance` /
/// `deduct_balance`, which keep every entry non-negative and are
/// all-or-nothing: a failed call leaves the wallet exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    id: WalletId,
    user_id: UserId,
    organization_id: OrganizationId,
    status: WalletStatus,
    balances: BTreeMap<CurrencyCode, Balance>,
    version: u64,
}

impl Wallet {
    /// Open a new wallet: Active, no balances.
    pub fn open(id: WalletId, user_id: UserId, organization_id: OrganizationId) -> Self {
        Self {
            id,
            user_id,
            organization_id,
            status: WalletStatus::Active,
            balances: BTreeMap::new(),
            version: 0,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn organization_id(&self) -> OrganizationId {
        self.organization_id
    }

    pub fn status(&self) -> WalletStatus {
        self.status
    }

    /// Balance in the given currency, if the wallet has ever held it.
    pub fn balance(&self, currency: &CurrencyCode) -> Option<&Balance> {
        self.balances.get(currency)
    }

    /// Amount in minor units for the given currency (zero if never held).
    pub fn amount_of(&self, currency: &CurrencyCode) -> i64 {
        self.balances.get(currency).map_or(0, Balance::amount)
    }

    /// All balances, one per currency ever funded.
    pub fn balances(&self) -> impl Iterator<Item = &Balance> {
        self.balances.values()
    }

    /// Invariant helper: balance-mutating operations require an active wallet.
    pub fn ensure_active(&self) -> LedgerResult<()> {
        if self.status == WalletStatus::Active {
            Ok(())
        } else {
            Err(LedgerError::WalletNotActive {
                wallet_id: self.id,
                status: self.status.to_string(),
            })
        }
    }

    fn ensure_positive(amount: i64) -> LedgerResult<()> {
        if amount > 0 {
            Ok(())
        } else {
            Err(LedgerError::invalid_amount(format!(
                "amount must be positive (got {amount})"
            )))
        }
    }

    /// Credit `amount` minor units, creating a zero balance for a currency
    /// the wallet has never held.
    pub fn add_balance(&mut self, currency: &CurrencyCode, amount: i64) -> LedgerResult<()> {
        self.ensure_active()?;
        Self::ensure_positive(amount)?;

        let current = self
            .balances
            .get(currency)
            .cloned()
            .unwrap_or_else(|| Balance::zero(currency.clone()));
        let updated = current.add(amount)?;

        self.balances.insert(currency.clone(), updated);
        self.version += 1;
        Ok(())
    }

    /// Debit `amount` minor units from an existing balance.
    pub fn deduct_balance(&mut self, currency: &CurrencyCode, amount: i64) -> LedgerResult<()> {
        self.ensure_active()?;
        Self::ensure_positive(amount)?;

        let current = self
            .balances
            .get(currency)
            .ok_or_else(|| LedgerError::UnknownCurrency(currency.clone()))?;
        let updated = current.subtract(amount)?;

        self.balances.insert(currency.clone(), updated);
        self.version += 1;
        Ok(())
    }

    /// Active → Frozen.
    pub fn freeze(&mut self) -> LedgerResult<()> {
        self.transition_to(WalletStatus::Frozen, WalletStatus::Active)
    }

    /// Frozen → Active.
    pub fn reactivate(&mut self) -> LedgerResult<()> {
        self.transition_to(WalletStatus::Active, WalletStatus::Frozen)
    }

    /// Active | Frozen → Closed. Terminal: nothing transitions out of Closed.
    pub fn close(&mut self) -> LedgerResult<()> {
        if self.status == WalletStatus::Closed {
            return Err(LedgerError::invalid_transition(format!(
                "wallet {} is already closed",
                self.id
            )));
        }
        self.status = WalletStatus::Closed;
        self.version += 1;
        Ok(())
    }

    fn transition_to(&mut self, target: WalletStatus, required: WalletStatus) -> LedgerResult<()> {
        if self.status != required {
            return Err(LedgerError::invalid_transition(format!(
                "cannot move wallet {} from {} to {target}",
                self.id, self.status
            )));
        }
        self.status = target;
        self.version += 1;
        Ok(())
    }
}

impl AggregateRoot for Wallet {
    type Id = WalletId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}
