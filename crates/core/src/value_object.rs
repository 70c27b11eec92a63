//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two instances
/// with the same attribute values are the same value. To "modify" one,
/// construct a new one — `Balance::add` returns a fresh `Balance` instead of
/// mutating in place. This keeps them safe to share across threads and lets
/// them behave like primitives.
///
/// Contrast with an entity: `Wallet` has identity (two wallets with equal
/// balances are still different wallets), a `Balance` does not.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
