//! Entity trait: identity + continuity across snapshots.

/// Entity marker + minimal interface.
///
/// Every entity in this crate family is owned by the upstream backend; the
/// dashboard only ever holds read snapshots of them.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
