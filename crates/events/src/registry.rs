//! Handler registry: event type → ordered handler list.
//!
//! The registry is keyed by `TypeId::of::<E>()`, a compile-time type tag, and
//! stores each list type-erased. Lists are never mutated in place: `register`
//! clones the current list, appends, and swaps the new `Arc` in under the
//! write lock. A dispatch that already took a snapshot keeps iterating its own
//! `Arc` and never observes a partially-updated list.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::{Event, EventHandler};

/// Snapshot of the handlers subscribed to `E`, in subscription order.
pub type HandlerList<E> = Vec<Arc<dyn EventHandler<E>>>;

struct Entry {
    kind: &'static str,
    /// Always an `Arc<HandlerList<E>>` for the `E` this entry is keyed by.
    handlers: Arc<dyn Any + Send + Sync>,
    /// Cached length of `handlers`, for `kinds()`, which cannot name `E` to
    /// downcast. Written together with `handlers` and never changed after.
    cached_len: usize,
}

impl Entry {
    fn typed<E: Event>(&self) -> Option<Arc<HandlerList<E>>> {
        Arc::clone(&self.handlers).downcast::<HandlerList<E>>().ok()
    }
}

#[derive(Default)]
pub struct HandlerRegistry {
    entries: RwLock<HashMap<TypeId, Entry>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `handler` to the list for `E`. Returns its position in the list.
    pub fn register<E: Event>(&self, handler: Arc<dyn EventHandler<E>>) -> usize {
        // Poisoning is recovered from: every mutation below is a single
        // `insert` of a fully-built entry.
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        let mut next: HandlerList<E> = entries
            .get(&TypeId::of::<E>())
            .and_then(Entry::typed::<E>)
            .map(|current| current.as_ref().clone())
            .unwrap_or_default();

        let position = next.len();
        next.push(handler);

        entries.insert(
            TypeId::of::<E>(),
            Entry {
                kind: E::KIND,
                cached_len: next.len(),
                handlers: Arc::new(next),
            },
        );
        position
    }

    /// Current handler list for `E`, or `None` if nothing ever subscribed.
    pub fn snapshot<E: Event>(&self) -> Option<Arc<HandlerList<E>>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(&TypeId::of::<E>()).and_then(Entry::typed::<E>)
    }

    pub fn len_of<E: Event>(&self) -> usize {
        self.snapshot::<E>().map_or(0, |handlers| handlers.len())
    }

    /// `(kind, handler count)` for every subscribed event type, sorted by kind.
    pub fn kinds(&self) -> Vec<(&'static str, usize)> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut kinds: Vec<_> = entries.values().map(|e| (e.kind, e.cached_len)).collect();
        kinds.sort_unstable();
        kinds
    }
}

impl core::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FnHandler, HandlerResult};
    use chrono::{DateTime, Utc};
    use serde::Serialize;

    #[derive(Debug, Clone, Serialize)]
    struct Pinged {
        at: DateTime<Utc>,
    }

    impl Event for Pinged {
        const KIND: &'static str = "test.pinged";

        fn occurred_at(&self) -> DateTime<Utc> {
            self.at
        }
    }

    #[derive(Debug, Clone, Serialize)]
    struct Ponged {
        at: DateTime<Utc>,
    }

    impl Event for Ponged {
        const KIND: &'static str = "test.ponged";

        fn occurred_at(&self) -> DateTime<Utc> {
            self.at
        }
    }

    fn noop(name: &'static str) -> Arc<dyn EventHandler<Pinged>> {
        Arc::new(FnHandler::new(name, |_: Pinged| async { HandlerResult::Ok(()) }))
    }

    #[test]
    fn register_returns_positions_in_order() {
        let registry = HandlerRegistry::new();
        assert_eq!(registry.register(noop("a")), 0);
        assert_eq!(registry.register(noop("b")), 1);
        assert_eq!(registry.register(noop("c")), 2);

        let names: Vec<String> = registry
            .snapshot::<Pinged>()
            .unwrap()
            .iter()
            .map(|h| h.name().to_string())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn snapshot_is_stable_across_later_registrations() {
        let registry = HandlerRegistry::new();
        registry.register(noop("first"));

        let before = registry.snapshot::<Pinged>().unwrap();
        registry.register(noop("second"));

        assert_eq!(before.len(), 1);
        assert_eq!(registry.snapshot::<Pinged>().unwrap().len(), 2);
    }

    #[test]
    fn kinds_are_isolated() {
        let registry = HandlerRegistry::new();
        registry.register(noop("ping"));

        assert!(registry.snapshot::<Ponged>().is_none());
        assert_eq!(registry.len_of::<Ponged>(), 0);
        assert_eq!(registry.len_of::<Pinged>(), 1);
        assert_eq!(registry.kinds(), vec![("test.pinged", 1)]);
    }

    #[test]
    fn counts_agree_with_the_current_list() {
        let registry = HandlerRegistry::new();
        for name in ["a", "b", "c"] {
            registry.register(noop(name));
            let listed = registry.snapshot::<Pinged>().map_or(0, |h| h.len());
            assert_eq!(registry.len_of::<Pinged>(), listed);
            assert_eq!(registry.kinds(), vec![("test.pinged", listed)]);
        }
    }
}
