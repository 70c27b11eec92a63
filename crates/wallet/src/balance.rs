//! Balance value object.

use serde::{Deserialize, Serialize};

use ledgerkit_core::{CurrencyCode, LedgerError, LedgerResult, ValueObject};

/// An immutable (currency, amount) pair. Amount is in minor units and never
/// negative. Arithmetic returns a new `Balance`; nothing mutates in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Balance {
    currency: CurrencyCode,
    amount: i64,
}

impl Balance {
    pub fn new(currency: CurrencyCode, amount: i64) -> LedgerResult<Self> {
        if amount < 0 {
            return Err(LedgerError::invalid_amount(format!(
                "balance amount must not be negative (got {amount})"
            )));
        }
        Ok(Self { currency, amount })
    }

    /// Zero balance, used when a wallet first sees a currency.
    pub fn zero(currency: CurrencyCode) -> Self {
        Self {
            currency,
            amount: 0,
        }
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    /// Amount in minor units.
    pub fn amount(&self) -> i64 {
        self.amount
    }

    /// New balance with `amount` added.
    pub fn add(&self, amount: i64) -> LedgerResult<Self> {
        if amount < 0 {
            return Err(LedgerError::invalid_amount(format!(
                "cannot add a negative amount ({amount})"
            )));
        }
        let total = self.amount.checked_add(amount).ok_or_else(|| {
            LedgerError::invalid_amount(format!(
                "balance overflow adding {amount} to {}",
                self.amount
            ))
        })?;
        Ok(Self {
            currency: self.currency.clone(),
            amount: total,
        })
    }

    /// New balance with `amount` removed; never goes below zero.
    pub fn subtract(&self, amount: i64) -> LedgerResult<Self> {
        if amount < 0 {
            return Err(LedgerError::invalid_amount(format!(
                "cannot subtract a negative amount ({amount})"
            )));
        }
        if amount > self.amount {
            return Err(LedgerError::InsufficientFunds {
                currency: self.currency.clone(),
                available: self.amount,
                requested: amount,
            });
        }
        Ok(Self {
            currency: self.currency.clone(),
            amount: self.amount - amount,
        })
    }
}

impl ValueObject for Balance {}
