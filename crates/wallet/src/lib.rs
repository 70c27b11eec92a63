//! Wallet domain model: `Currency` and `Balance` value objects and the
//! `Wallet` aggregate root.
//!
//! All balance mutation goes through the wallet's own operations; external
//! code never reaches into the balance map.

pub mod balance;
pub mod currency;
pub mod wallet;

pub use balance::Balance;
pub use currency::Currency;
pub use wallet::{Wallet, WalletStatus};
