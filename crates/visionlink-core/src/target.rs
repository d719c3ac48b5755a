// ── Active target resolver ──
//
// The server names the target it is tracking in its root table. This
// resolves that name to the target's data, read fresh on every call.

use std::sync::Arc;
use std::time::Duration;

use crate::keys;
use crate::model::{Descriptor, TableView, Target, TargetData, TargetOffset};
use crate::store::MirrorCache;
use crate::tables::TablePath;

#[derive(Clone)]
pub struct ActiveTarget {
    cache: Arc<MirrorCache>,
    root: TablePath,
}

impl ActiveTarget {
    pub fn new(cache: Arc<MirrorCache>) -> Self {
        let root = cache.config().root_path();
        Self { cache, root }
    }

    /// Name of the tracked target, [`keys::NO_TARGET`] when idle.
    pub fn current_name(&self) -> String {
        self.cache
            .tables()
            .get_string(&self.root, keys::ACTIVE_TARGET, keys::NO_TARGET)
    }

    pub fn has_target(&self) -> bool {
        self.current_name() != keys::NO_TARGET
    }

    /// Descriptor for the tracked target. Prefers the cached one; falls
    /// back to a standalone view if the Targets table has not been
    /// rebuilt since the target appeared.
    pub fn descriptor(&self) -> Option<Arc<Target>> {
        self.descriptor_for(&self.current_name())
    }

    pub fn resolve(&self) -> Option<TargetData> {
        self.descriptor().map(|t| t.data())
    }

    /// Like [`resolve`](Self::resolve), but only while `expected` is the
    /// tracked target.
    pub fn resolve_if_named(&self, expected: &str) -> Option<TargetData> {
        let name = self.current_name();
        if name != expected {
            return None;
        }
        self.descriptor_for(&name).map(|t| t.data())
    }

    pub fn offset(&self) -> Option<TargetOffset> {
        self.descriptor().map(|t| t.offset())
    }

    pub fn distance(&self) -> Option<f64> {
        self.descriptor().map(|t| t.distance())
    }

    pub fn up_down(&self) -> Option<f64> {
        self.descriptor().map(|t| t.up_down())
    }

    pub fn left_right(&self) -> Option<f64> {
        self.descriptor().map(|t| t.left_right())
    }

    /// A name containing `/` addresses a nested table under the targets
    /// path; the standalone view keeps the full name.
    fn descriptor_for(&self, name: &str) -> Option<Arc<Target>> {
        if name == keys::NO_TARGET {
            return None;
        }
        self.cache.lookup_by_name::<Target>(name).or_else(|| {
            let path = self.cache.config().targets_path().child(name);
            let view = TableView::new(Arc::clone(self.cache.tables()), path).named(name);
            Some(Arc::new(Target::from_view(view)))
        })
    }

    /// Whether any attribute was written within the configured window.
    pub fn is_updated(&self) -> bool {
        self.is_updated_within(self.cache.config().target_freshness)
    }

    pub fn is_updated_within(&self, threshold: Duration) -> bool {
        self.descriptor()
            .is_some_and(|t| t.is_updated_within(threshold))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::MirrorConfig;
    use crate::model::EntityKind;
    use crate::model::target::{DISTANCE, LEFT_RIGHT, UP_DOWN, X};
    use crate::tables::{MemoryTables, RemoteTables};

    fn setup() -> (Arc<MemoryTables>, ActiveTarget) {
        let tables = Arc::new(MemoryTables::new());
        let remote: Arc<dyn RemoteTables> = tables.clone();
        let cache = Arc::new(MirrorCache::new(remote, MirrorConfig::default()));
        (tables, ActiveTarget::new(cache))
    }

    fn publish(tables: &MemoryTables, name: &str, distance: f64) {
        let path = TablePath::new("/Targets").child(name);
        tables.set_double(&path, DISTANCE, distance);
        tables.set_double(&path, UP_DOWN, 1.5);
        tables.set_double(&path, LEFT_RIGHT, -2.5);
        tables.set_double(&path, X, 0.25);
    }

    fn activate(tables: &MemoryTables, name: &str) {
        tables.set_string(&TablePath::new("/Vision Server"), keys::ACTIVE_TARGET, name);
    }

    #[test]
    fn no_target_by_default() {
        let (_tables, active) = setup();
        assert_eq!(active.current_name(), "none");
        assert!(!active.has_target());
        assert!(active.resolve().is_none());
        assert!(active.distance().is_none());
        assert!(!active.is_updated());
    }

    #[test]
    fn resolves_without_a_rebuild() {
        let (tables, active) = setup();
        publish(&tables, "A", 4.0);
        activate(&tables, "A");

        let data = active.resolve().unwrap();
        assert_eq!(data.distance, 4.0);
        assert_eq!(data.up_down, 1.5);
        assert_eq!(data.left_right, -2.5);
        assert_eq!(data.offset.x, 0.25);
        assert_eq!(data.offset.y, 0.0);
    }

    #[test]
    fn resolve_if_named_requires_a_match() {
        let (tables, active) = setup();
        publish(&tables, "A", 4.0);
        publish(&tables, "B", 9.0);
        activate(&tables, "A");
        active.cache.rebuild(EntityKind::Target);

        assert!(active.resolve_if_named("B").is_none());
        let a = active.resolve_if_named("A").unwrap();
        assert_eq!(a.distance, active.distance().unwrap());
        assert_eq!(a.up_down, active.up_down().unwrap());
        assert_eq!(a.left_right, active.left_right().unwrap());
        assert_eq!(a.offset, active.offset().unwrap());
    }

    #[test]
    fn nested_target_name_resolves_by_full_name() {
        let (tables, active) = setup();
        publish(&tables, "goal/upper", 6.0);
        activate(&tables, "goal/upper");

        let data = active.resolve().unwrap();
        assert_eq!(data.distance, 6.0);
        assert_eq!(active.descriptor().unwrap().name(), "goal/upper");
        assert_eq!(active.resolve_if_named("goal/upper"), Some(data));
        assert!(active.resolve_if_named("upper").is_none());
    }

    #[test]
    fn reads_are_fresh_every_time() {
        let (tables, active) = setup();
        publish(&tables, "A", 4.0);
        activate(&tables, "A");
        assert_eq!(active.distance(), Some(4.0));

        tables.set_double(&TablePath::new("/Targets/A"), DISTANCE, 2.0);
        assert_eq!(active.distance(), Some(2.0));

        activate(&tables, "none");
        assert_eq!(active.distance(), None);
    }

    #[test]
    fn stale_target_is_not_updated() {
        let (tables, active) = setup();
        publish(&tables, "A", 4.0);
        activate(&tables, "A");
        assert!(active.is_updated());

        let path = TablePath::new("/Targets/A");
        for key in [DISTANCE, UP_DOWN, LEFT_RIGHT, X] {
            tables.backdate(&path, key, Duration::from_secs(1));
        }
        assert!(!active.is_updated());
        assert!(active.is_updated_within(Duration::from_secs(5)));
    }
}
