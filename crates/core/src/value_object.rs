//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity; two instances holding the same values are
/// the same value (`Money`, a quote line, a credit profile snapshot).
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
