//! Aggregate root trait.

/// Aggregate root marker + minimal interface.
///
/// Intentionally small: the ledger keeps state transitions as plain methods
/// on the aggregate (no event sourcing), so all the foundation needs is
/// identity and a version for optimistic concurrency.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;

    /// Monotonically increasing version of the aggregate's state.
    ///
    /// Bumped by every successful mutation; storage backends compare it to
    /// detect concurrent modification at commit time.
    fn version(&self) -> u64;
}
