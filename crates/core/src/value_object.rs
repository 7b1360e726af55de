//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two `Price`s of
/// `100.5` are the same price. To "modify" one, build a new one.
///
/// - **Value Object**: `Price`, `Stock`, `ProductKind`, the normalized names
/// - **Entity**: `Product`, `Fruit` (identified by their normalized name)
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
