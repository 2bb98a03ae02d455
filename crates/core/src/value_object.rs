//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. They
/// are validated on construction, so holding one is proof the value is legal
/// (e.g. a `Quantity` is never below one).
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
