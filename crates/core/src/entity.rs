//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Entities are keyed by their normalized name. Stores use `key()` for
/// uniqueness and lookups, and `apply()` for field-level updates.
pub trait Entity: Clone + core::fmt::Debug {
    /// Single-field change accepted by `update_field`.
    ///
    /// Entities without updatable fields use an uninhabited type.
    type Update: Clone + core::fmt::Debug;

    /// Returns the normalized key identifying this entity.
    fn key(&self) -> &str;

    /// Apply a single-field update, leaving every other field untouched.
    fn apply(&mut self, update: Self::Update);
}
