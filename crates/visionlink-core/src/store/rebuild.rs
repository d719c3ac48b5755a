// ── Rebuild logic ──
//
// Enumerates a kind's child tables and publishes a fresh collection.
// Runs on whichever thread delivered the child-created notification.

use std::sync::Arc;

use tracing::debug;

use super::MirrorCache;
use super::collection::MirrorCollection;
use crate::model::{Descriptor, EntityKind, TableView};

impl MirrorCache {
    /// Replace the collection for `kind` with one descriptor per child
    /// table, in enumeration order. Returns the new length.
    pub fn rebuild(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Camera => self.rebuild_collection(&self.cameras),
            EntityKind::Pipeline => self.rebuild_collection(&self.pipelines),
            EntityKind::Stream => self.rebuild_collection(&self.streams),
            EntityKind::Target => self.rebuild_collection(&self.targets),
        }
    }

    fn rebuild_collection<T: Descriptor>(&self, collection: &MirrorCollection<T>) -> usize {
        let _guard = collection.lock_rebuild();
        let parent = self.config.kind_path(T::KIND);

        let items: Vec<Arc<T>> = self
            .tables
            .list_children(&parent)
            .iter()
            .enumerate()
            .map(|(position, name)| {
                let view = TableView::new(Arc::clone(&self.tables), parent.child(name))
                    .at_position(position);
                Arc::new(T::from_view(view))
            })
            .collect();

        let count = items.len();
        let generation = collection.replace(items);
        debug!(kind = %T::KIND, count, generation, "rebuilt mirror collection");
        count
    }
}
