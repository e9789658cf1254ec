//! entity
//!
//! Shared contract for every remote entity kind.
//!
//! # Identity
//!
//! An entity is identified solely by its [`Snowflake`]. Two values of the
//! same kind are equal iff their ids are equal, and hashing looks at the id
//! alone, so mutable fields populated later by ingestion never change an
//! entity's identity. [`impl_identity!`] writes those impls for each kind.

use crate::core::types::Snowflake;

/// A remote object with a stable identity.
pub trait Entity: Send + Sync + 'static {
    /// The entity's immutable id.
    fn id(&self) -> Snowflake;
}

/// An entity that can be looked up by display name.
pub trait Named: Entity {
    /// Current display name, if the entity has one.
    fn name(&self) -> Option<String>;
}

/// Compare two names, optionally ignoring case.
///
/// Case folding is Unicode-aware (`"ÉCOLE"` matches `"école"`).
pub fn names_match(candidate: &str, wanted: &str, ignore_case: bool) -> bool {
    if ignore_case {
        candidate == wanted || candidate.to_lowercase() == wanted.to_lowercase()
    } else {
        candidate == wanted
    }
}

/// Implement id-only `PartialEq`, `Eq` and `Hash` for an [`Entity`].
macro_rules! impl_identity {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl PartialEq for $ty {
                fn eq(&self, other: &Self) -> bool {
                    $crate::entity::Entity::id(self) == $crate::entity::Entity::id(other)
                }
            }

            impl Eq for $ty {}

            impl std::hash::Hash for $ty {
                fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                    std::hash::Hash::hash(&$crate::entity::Entity::id(self), state);
                }
            }
        )+
    };
}

pub(crate) use impl_identity;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match() {
        assert!(names_match("demo", "demo", false));
        assert!(!names_match("demo", "DEMO", false));
    }

    #[test]
    fn case_insensitive_match() {
        assert!(names_match("alice", "Alice", true));
        assert!(names_match("ÉCOLE", "école", true));
        assert!(!names_match("alice", "alicia", true));
    }
}
