//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have **no identity**: two instances with the same attribute
/// values are the same value. They are **immutable**; "modifying" one means
/// constructing a new value (e.g. `Money::add` returns a fresh `Money`).
///
/// Construction should go through a validating factory so an instance is never
/// partially valid.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
