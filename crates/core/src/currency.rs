//! Currency codes.
//!
//! The code alone identifies a currency (`Currency` in `ledgerkit-wallet`
//! carries the display metadata). It lives in core because error variants and
//! the balance map are keyed by it.

use serde::{Deserialize, Serialize};

/// ISO-4217-style currency code, e.g. `"USD"`.
///
/// Normalized to uppercase ASCII on construction so `"usd"` and `"USD"` key
/// the same balance entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
