//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values; two
/// with the same values are the same value. `Money` is the canonical
/// example here — `Money::from_cents(100)` equals any other
/// `Money::from_cents(100)` regardless of where it came from. Entities, by
/// contrast, are identified by their id.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
