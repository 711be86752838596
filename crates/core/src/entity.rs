//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Module stores key records by `id()`; two records with the same id are the
/// same entity.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
