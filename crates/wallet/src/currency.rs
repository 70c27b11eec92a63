//! Currency metadata and the decimal-string edge.
//!
//! Amounts travel through the ledger as `i64` minor units (e.g. cents).
//! Decimal strings only exist at the boundary; `parse_amount` is where they
//! are converted and validated against the currency's precision.

use serde::{Deserialize, Serialize};

use ledgerkit_core::{CurrencyCode, LedgerError, LedgerResult, ValueObject};

/// Largest scale whose minor units fit an `i64` (10^18 does, 10^19 not).
const MAX_DECIMAL_PLACES: u8 = 18;

/// Currency metadata (immutable).
///
/// Identity is the code; `name` and `decimal_places` are display/precision
/// metadata carried along with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Currency {
    code: CurrencyCode,
    name: String,
    /// Number of fractional digits (2 for USD, 0 for JPY).
    decimal_places: u8,
}

impl Currency {
    /// `decimal_places` is capped at 18: `i64` minor units cannot represent
    /// a finer scale, and an uncapped value would overflow the arithmetic in
    /// `parse_amount`/`format_amount`.
    pub fn new(code: impl Into<CurrencyCode>, name: impl Into<String>, decimal_places: u8) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            decimal_places: decimal_places.min(MAX_DECIMAL_PLACES),
        }
    }

    pub fn code(&self) -> &CurrencyCode {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn decimal_places(&self) -> u8 {
        self.decimal_places
    }

    fn scale(&self) -> i64 {
        10i64.pow(self.decimal_places as u32)
    }

    /// Parse a positive decimal string (e.g. `"30.00"`) into minor units.
    ///
    /// Rejects non-numeric input, negative amounts, and more fractional
    /// digits than the currency allows.
    pub fn parse_amount(&self, text: &str) -> LedgerResult<i64> {
        let text = text.trim();
        if text.is_empty() || text.starts_with('-') || text.starts_with('+') {
            return Err(LedgerError::invalid_amount(format!(
                "'{text}' is not a positive decimal amount"
            )));
        }

        let (whole, frac) = match text.split_once('.') {
            Some((w, f)) => (w, f),
            None => (text, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(LedgerError::invalid_amount("empty amount"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(LedgerError::invalid_amount(format!(
                "'{text}' is not a decimal number"
            )));
        }
        if frac.len() > self.decimal_places as usize {
            return Err(LedgerError::invalid_amount(format!(
                "'{text}' has more than {} decimal places ({})",
                self.decimal_places, self.code
            )));
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| {
                LedgerError::invalid_amount(format!("'{text}' is out of range"))
            })?
        };

        let mut frac_minor: i64 = if frac.is_empty() {
            0
        } else {
            // frac.len() <= decimal_places <= MAX_DECIMAL_PLACES, always fits.
            frac.parse()
                .map_err(|_| LedgerError::invalid_amount(format!("'{text}' is out of range")))?
        };
        frac_minor *= 10i64.pow((self.decimal_places as usize - frac.len()) as u32);

        whole
            .checked_mul(self.scale())
            .and_then(|w| w.checked_add(frac_minor))
            .ok_or_else(|| LedgerError::invalid_amount(format!("'{text}' is out of range")))
    }

    /// Render minor units with the currency's scale, e.g. `7000` -> `"70.00"`.
    pub fn format_amount(&self, minor: i64) -> String {
        if self.decimal_places == 0 {
            return minor.to_string();
        }
        let sign = if minor < 0 { "-" } else { "" };
        let abs = minor.unsigned_abs();
        let scale = self.scale() as u64;
        format!(
            "{sign}{}.{:0width$}",
            abs / scale,
            abs % scale,
            width = self.decimal_places as usize
        )
    }
}

impl ValueObject for Currency {}
