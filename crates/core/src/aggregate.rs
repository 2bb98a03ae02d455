//! Aggregate root trait for domain models that form a consistency boundary.

/// Aggregate root marker + minimal interface.
///
/// An aggregate owns its child entities; it is loaded, mutated and persisted
/// as one unit.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;

    /// Monotonically increasing version of the aggregate's state.
    ///
    /// Starts at 1 on creation and increases by one per committed mutation.
    fn version(&self) -> u64;
}
