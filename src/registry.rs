//! registry
//!
//! Identity-keyed, thread-safe entity registries.
//!
//! # Design
//!
//! A [`Registry`] owns the `Arc`s of every known entity of one kind, keyed
//! by [`Snowflake`]. Completion handlers and the ingestion path write to it
//! from executor threads while callers read from their own threads, so the
//! backing map sits behind a `parking_lot::RwLock`.
//!
//! Callers only ever see:
//! - point lookups (`get`), which clone one `Arc` out of the map, and
//! - snapshots (`list`, `filter`, `by_name`), which are freshly collected
//!   `Vec`s. A snapshot is owned by the caller; later inserts or removals
//!   do not change it, and changing it does not touch the registry.
//!
//! Predicates run over a snapshot after the lock is released, so a
//! predicate may itself query registries without deadlocking.
//!
//! Writes are crate-internal. Outside code mutates registries through
//! [`Ingestor`](crate::ingest::Ingestor).
//!
//! # Example
//!
//! ```ignore
//! let groups = client.groups_by_name("demo", true);
//! for group in groups {
//!     println!("{}", group);
//! }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::core::types::Snowflake;
use crate::entity::{names_match, Entity, Named};

/// Thread-safe map from id to entity.
pub struct Registry<E> {
    entries: RwLock<HashMap<Snowflake, Arc<E>>>,
}

impl<E: Entity> Registry<E> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Look up an entity by id.
    ///
    /// An unknown id is not an error; it returns `None`.
    pub fn get(&self, id: Snowflake) -> Option<Arc<E>> {
        self.entries.read().get(&id).cloned()
    }

    /// Whether an entity with this id is registered.
    pub fn contains(&self, id: Snowflake) -> bool {
        self.entries.read().contains_key(&id)
    }

    /// Number of registered entities.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Snapshot of every registered entity, in no particular order.
    pub fn list(&self) -> Vec<Arc<E>> {
        self.entries.read().values().cloned().collect()
    }

    /// Snapshot of the entities matching `predicate`.
    pub fn filter(&self, mut predicate: impl FnMut(&E) -> bool) -> Vec<Arc<E>> {
        let mut snapshot = self.list();
        snapshot.retain(|e| predicate(e));
        snapshot
    }

    /// Point lookup followed by a check.
    ///
    /// Returns `None` rather than a non-matching entity.
    pub fn get_if(&self, id: Snowflake, predicate: impl FnOnce(&E) -> bool) -> Option<Arc<E>> {
        self.get(id).filter(|e| predicate(e))
    }

    /// Insert or replace an entity, returning the previous value.
    pub(crate) fn insert(&self, entity: Arc<E>) -> Option<Arc<E>> {
        let id = entity.id();
        tracing::trace!(%id, kind = std::any::type_name::<E>(), "registry insert");
        self.entries.write().insert(id, entity)
    }

    /// Return the registered entity for `id`, inserting `make()` if absent.
    ///
    /// Nested references in payloads resolve through here so that every
    /// reference to one id shares one `Arc`.
    pub(crate) fn get_or_insert_with(&self, id: Snowflake, make: impl FnOnce() -> E) -> Arc<E> {
        if let Some(existing) = self.get(id) {
            return existing;
        }
        let mut entries = self.entries.write();
        Arc::clone(entries.entry(id).or_insert_with(|| Arc::new(make())))
    }

    /// Remove an entity, returning it if it was registered.
    pub(crate) fn remove(&self, id: Snowflake) -> Option<Arc<E>> {
        tracing::trace!(%id, kind = std::any::type_name::<E>(), "registry remove");
        self.entries.write().remove(&id)
    }
}

impl<E: Named> Registry<E> {
    /// Snapshot of the entities whose name matches `name`.
    ///
    /// Entities without a name never match.
    pub fn by_name(&self, name: &str, ignore_case: bool) -> Vec<Arc<E>> {
        self.filter(|e| {
            e.name()
                .is_some_and(|candidate| names_match(&candidate, name, ignore_case))
        })
    }
}

impl<E: Entity> Default for Registry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Registry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("kind", &std::any::type_name::<E>())
            .field("len", &self.entries.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::impl_identity;

    #[derive(Debug)]
    struct Thing {
        id: Snowflake,
        name: Option<String>,
        kind: u8,
    }

    impl Entity for Thing {
        fn id(&self) -> Snowflake {
            self.id
        }
    }

    impl Named for Thing {
        fn name(&self) -> Option<String> {
            self.name.clone()
        }
    }

    impl_identity!(Thing);

    fn thing(id: u64, name: Option<&str>, kind: u8) -> Arc<Thing> {
        Arc::new(Thing {
            id: Snowflake::new(id),
            name: name.map(str::to_string),
            kind,
        })
    }

    mod lookups {
        use super::*;

        #[test]
        fn get_absent_is_none() {
            let registry: Registry<Thing> = Registry::new();
            assert!(registry.get(Snowflake::new(1)).is_none());
            assert!(!registry.contains(Snowflake::new(1)));
        }

        #[test]
        fn insert_then_get() {
            let registry = Registry::new();
            registry.insert(thing(1, Some("one"), 0));

            let found = registry.get(Snowflake::new(1)).unwrap();
            assert_eq!(found.name.as_deref(), Some("one"));
            assert_eq!(registry.len(), 1);
        }

        #[test]
        fn insert_replaces_same_id() {
            let registry = Registry::new();
            registry.insert(thing(1, Some("old"), 0));
            let previous = registry.insert(thing(1, Some("new"), 0));

            assert_eq!(previous.unwrap().name.as_deref(), Some("old"));
            assert_eq!(registry.len(), 1);
            assert_eq!(
                registry.get(Snowflake::new(1)).unwrap().name.as_deref(),
                Some("new")
            );
        }

        #[test]
        fn get_if_rejects_mismatch() {
            let registry = Registry::new();
            registry.insert(thing(1, None, 2));

            assert!(registry.get_if(Snowflake::new(1), |t| t.kind == 2).is_some());
            assert!(registry.get_if(Snowflake::new(1), |t| t.kind == 3).is_none());
            assert!(registry.get_if(Snowflake::new(9), |_| true).is_none());
        }

        #[test]
        fn get_or_insert_with_reuses_existing() {
            let registry = Registry::new();
            let first = registry.insert(thing(5, Some("first"), 0));
            assert!(first.is_none());

            let resolved = registry.get_or_insert_with(Snowflake::new(5), || Thing {
                id: Snowflake::new(5),
                name: Some("second".into()),
                kind: 0,
            });
            assert_eq!(resolved.name.as_deref(), Some("first"));
        }

        #[test]
        fn remove_returns_entity() {
            let registry = Registry::new();
            registry.insert(thing(1, None, 0));

            assert!(registry.remove(Snowflake::new(1)).is_some());
            assert!(registry.remove(Snowflake::new(1)).is_none());
            assert!(registry.is_empty());
        }
    }

    mod snapshots {
        use super::*;

        #[test]
        fn filter_by_predicate() {
            let registry = Registry::new();
            registry.insert(thing(1, None, 1));
            registry.insert(thing(2, None, 2));
            registry.insert(thing(3, None, 2));

            let twos = registry.filter(|t| t.kind == 2);
            assert_eq!(twos.len(), 2);
            assert!(twos.iter().all(|t| t.kind == 2));
        }

        #[test]
        fn by_name_respects_case_flag() {
            let registry = Registry::new();
            registry.insert(thing(1, Some("alice"), 0));
            registry.insert(thing(2, Some("bob"), 0));
            registry.insert(thing(3, None, 0));

            assert_eq!(registry.by_name("Alice", true).len(), 1);
            assert!(registry.by_name("Alice", false).is_empty());
            assert_eq!(registry.by_name("alice", false).len(), 1);
        }

        #[test]
        fn list_is_detached_from_later_writes() {
            let registry = Registry::new();
            registry.insert(thing(1, None, 0));

            let snapshot = registry.list();
            registry.insert(thing(2, None, 0));
            registry.remove(Snowflake::new(1));

            assert_eq!(snapshot.len(), 1);
            assert_eq!(snapshot[0].id, Snowflake::new(1));
        }

        #[test]
        fn mutating_snapshot_leaves_registry_intact() {
            let registry = Registry::new();
            registry.insert(thing(1, None, 0));

            let mut snapshot = registry.list();
            snapshot.clear();

            assert_eq!(registry.len(), 1);
        }

        #[test]
        fn predicate_may_query_registry() {
            let registry = Registry::new();
            registry.insert(thing(1, None, 0));
            registry.insert(thing(2, None, 0));

            // Would deadlock if the predicate ran under the read lock and
            // the lock were not reentrant for readers queued behind a writer.
            let found = registry.filter(|t| registry.contains(t.id));
            assert_eq!(found.len(), 2);
        }
    }

    #[test]
    fn debug_shows_len() {
        let registry = Registry::new();
        registry.insert(thing(1, None, 0));
        assert!(format!("{:?}", registry).contains("len: 1"));
    }
}
