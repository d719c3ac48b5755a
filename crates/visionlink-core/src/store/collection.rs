// ── Rebuild-on-notification collection ──
//
// One immutable snapshot per kind, swapped wholesale on every rebuild.
// Readers load the current pointer without locking; subscribers are
// woken through `watch` channels after the swap.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::model::Descriptor;

/// The published descriptors of a single kind.
///
/// The vector is never mutated in place. A rebuild builds a new one off
/// to the side and publishes it with a single pointer store, so a reader
/// holding a snapshot keeps a consistent pre-rebuild view.
pub struct MirrorCollection<T: Descriptor> {
    /// Lock-free read path.
    current: ArcSwap<Vec<Arc<T>>>,

    /// Same snapshot, for subscribers.
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,

    /// Bumped once per published rebuild.
    generation: watch::Sender<u64>,

    last_rebuild: watch::Sender<Option<DateTime<Utc>>>,

    /// Serializes enumerate-then-publish so a slower rebuild cannot
    /// overwrite a newer one.
    rebuild_lock: Mutex<()>,
}

impl<T: Descriptor> MirrorCollection<T> {
    pub(crate) fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        let (generation, _) = watch::channel(0u64);
        let (last_rebuild, _) = watch::channel(None);

        Self {
            current: ArcSwap::from_pointee(Vec::new()),
            snapshot,
            generation,
            last_rebuild,
            rebuild_lock: Mutex::new(()),
        }
    }

    /// Publish a freshly built collection. Returns the new generation.
    pub(crate) fn replace(&self, items: Vec<Arc<T>>) -> u64 {
        let items = Arc::new(items);
        self.current.store(Arc::clone(&items));
        // `send_replace` updates unconditionally, even with zero receivers.
        self.snapshot.send_replace(items);
        self.last_rebuild.send_replace(Some(Utc::now()));

        let mut published = 0;
        self.generation.send_modify(|g| {
            *g += 1;
            published = *g;
        });
        published
    }

    /// Hold while enumerating and publishing.
    pub(crate) fn lock_rebuild(&self) -> MutexGuard<'_, ()> {
        // The guarded value is `()`, nothing can be left half-updated.
        self.rebuild_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn get(&self, index: usize) -> Option<Arc<T>> {
        self.current.load().get(index).cloned()
    }

    /// First descriptor named `name`, in enumeration order.
    pub(crate) fn by_name(&self, name: &str) -> Option<Arc<T>> {
        self.current
            .load()
            .iter()
            .find(|d| d.name() == name)
            .cloned()
    }

    pub(crate) fn find_index(&self, name: &str) -> Option<usize> {
        self.current.load().iter().position(|d| d.name() == name)
    }

    pub(crate) fn names(&self) -> Vec<String> {
        self.current
            .load()
            .iter()
            .map(|d| d.name().to_owned())
            .collect()
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.current.load_full()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn generation(&self) -> u64 {
        *self.generation.borrow()
    }

    pub(crate) fn watch_generation(&self) -> watch::Receiver<u64> {
        self.generation.subscribe()
    }

    pub(crate) fn last_rebuild(&self) -> Option<DateTime<Utc>> {
        *self.last_rebuild.borrow()
    }

    pub(crate) fn len(&self) -> usize {
        self.current.load().len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Camera, TableView};
    use crate::tables::{MemoryTables, RemoteTables, TablePath};

    fn cameras(names: &[&str]) -> Vec<Arc<Camera>> {
        let tables: Arc<dyn RemoteTables> = Arc::new(MemoryTables::new());
        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let path = TablePath::new("/Vision Server/Cameras").child(name);
                Arc::new(Camera::from_view(
                    TableView::new(Arc::clone(&tables), path).at_position(i),
                ))
            })
            .collect()
    }

    #[test]
    fn starts_empty_at_generation_zero() {
        let col: MirrorCollection<Camera> = MirrorCollection::new();
        assert_eq!(col.len(), 0);
        assert_eq!(col.generation(), 0);
        assert!(col.last_rebuild().is_none());
        assert!(col.get(0).is_none());
    }

    #[test]
    fn replace_publishes_and_bumps_generation() {
        let col = MirrorCollection::new();
        assert_eq!(col.replace(cameras(&["front", "rear"])), 1);
        assert_eq!(col.len(), 2);
        assert_eq!(col.get(1).unwrap().name(), "rear");
        assert!(col.last_rebuild().is_some());

        assert_eq!(col.replace(cameras(&["front"])), 2);
        assert_eq!(col.generation(), 2);
        assert!(col.get(1).is_none());
    }

    #[test]
    fn duplicate_names_resolve_to_first() {
        let col = MirrorCollection::new();
        col.replace(cameras(&["front", "rear", "front"]));
        assert_eq!(col.find_index("front"), Some(0));
        assert_eq!(col.by_name("front").unwrap().position_index(), Some(0));
        assert_eq!(col.find_index("nonexistent"), None);
        assert!(col.by_name("nonexistent").is_none());
    }

    #[test]
    fn held_snapshot_survives_replace() {
        let col = MirrorCollection::new();
        col.replace(cameras(&["a", "b", "c"]));
        let before = col.snapshot();

        col.replace(cameras(&["z"]));
        assert_eq!(before.len(), 3);
        assert_eq!(col.snapshot().len(), 1);
        assert_eq!(col.names(), vec!["z".to_owned()]);
    }

    #[test]
    fn subscribers_see_replacements() {
        let col = MirrorCollection::new();
        let mut rx = col.subscribe();
        col.replace(cameras(&["a"]));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);
    }
}
