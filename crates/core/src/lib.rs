//! `ledgerkit-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod aggregate;
pub mod currency;
pub mod error;
pub mod id;
pub mod value_object;

pub use aggregate::AggregateRoot;
pub use currency::CurrencyCode;
pub use error::{LedgerError, LedgerResult};
pub use id::{OrganizationId, TransferId, UserId, WalletId};
pub use value_object::ValueObject;
