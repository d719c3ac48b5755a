// ── In-process table store ──
//
// A `RemoteTables` implementation that lives entirely in memory. Used by
// the CLI to operate on snapshot files and by the test suite to play the
// role of the remote producer.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use indexmap::{IndexMap, IndexSet};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{ChildCallback, ListenerId, RemoteTables, TablePath, TableValue};
use crate::error::CoreError;

struct Entry {
    value: TableValue,
    written_at: Instant,
}

#[derive(Default)]
struct TableNode {
    entries: IndexMap<String, Entry>,
    children: IndexSet<String>,
}

struct Listener {
    path: TablePath,
    callback: ChildCallback,
}

/// Thread-safe in-memory table tree.
///
/// Tables spring into existence when an entry is first written beneath
/// them, which is also the moment child-created listeners on the parent
/// fire. Enumeration follows insertion order.
pub struct MemoryTables {
    tables: DashMap<TablePath, TableNode>,
    listeners: DashMap<ListenerId, Listener>,
    next_listener: AtomicU64,
}

impl MemoryTables {
    pub fn new() -> Self {
        let tables = DashMap::new();
        tables.insert(TablePath::root(), TableNode::default());
        Self {
            tables,
            listeners: DashMap::new(),
            next_listener: AtomicU64::new(1),
        }
    }

    /// Create `path` (and any missing ancestors) without writing an entry.
    pub fn create_table(&self, path: &TablePath) {
        let created = self.ensure_table(path);
        self.notify(created);
    }

    // ── Snapshot files ───────────────────────────────────────────────

    /// Build a store from a nested JSON object: objects become tables,
    /// scalars become entries. Nulls and arrays are skipped.
    pub fn from_json(value: &Value) -> Result<Self, CoreError> {
        let Value::Object(root) = value else {
            return Err(CoreError::InvalidSnapshot {
                message: format!("expected a JSON object at the root, found {value}"),
            });
        };
        let tables = Self::new();
        tables.load_object(&TablePath::root(), root);
        Ok(tables)
    }

    /// Dump the whole tree as nested JSON, entries before sub-tables.
    pub fn to_json(&self) -> Value {
        self.dump(&TablePath::root())
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let text = std::fs::read_to_string(path).map_err(|source| CoreError::SnapshotIo {
            path: path.to_path_buf(),
            source,
        })?;
        let value: Value = serde_json::from_str(&text)?;
        let tables = Self::from_json(&value)?;
        debug!(path = %path.display(), "loaded table snapshot");
        Ok(tables)
    }

    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        let text = serde_json::to_string_pretty(&self.to_json())?;
        std::fs::write(path, text).map_err(|source| CoreError::SnapshotIo {
            path: path.to_path_buf(),
            source,
        })
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Make sure every table along `path` exists. Returns the
    /// `(parent, child)` pairs that were newly created, root first.
    fn ensure_table(&self, path: &TablePath) -> Vec<(TablePath, String)> {
        let mut created = Vec::new();
        let mut parent = TablePath::root();
        for segment in path.segments() {
            let inserted = self
                .tables
                .entry(parent.clone())
                .or_default()
                .children
                .insert(segment.to_owned());
            let child = parent.child(segment);
            self.tables.entry(child.clone()).or_default();
            if inserted {
                created.push((parent, segment.to_owned()));
            }
            parent = child;
        }
        created
    }

    /// Fire child-created callbacks. Must be called with no map guards held.
    fn notify(&self, created: Vec<(TablePath, String)>) {
        for (parent, child) in created {
            let callbacks: Vec<ChildCallback> = self
                .listeners
                .iter()
                .filter(|l| l.path == parent)
                .map(|l| Arc::clone(&l.callback))
                .collect();
            for callback in callbacks {
                callback(&parent, &child);
            }
        }
    }

    fn load_object(&self, path: &TablePath, object: &Map<String, Value>) {
        for (key, value) in object {
            match value {
                Value::Object(inner) => {
                    let child = path.child(key);
                    self.create_table(&child);
                    self.load_object(&child, inner);
                }
                Value::Bool(b) => {
                    self.set_value(path, key, TableValue::Bool(*b));
                }
                Value::Number(n) => {
                    if let Some(v) = n.as_f64() {
                        self.set_value(path, key, TableValue::Double(v));
                    }
                }
                Value::String(s) => {
                    self.set_value(path, key, TableValue::String(s.clone()));
                }
                Value::Null | Value::Array(_) => {
                    warn!(path = %path, key, "skipping unsupported snapshot value");
                }
            }
        }
    }

    fn dump(&self, path: &TablePath) -> Value {
        let (entries, children) = match self.tables.get(path) {
            Some(node) => (
                node.entries
                    .iter()
                    .map(|(k, e)| (k.clone(), e.value.clone()))
                    .collect::<Vec<_>>(),
                node.children.iter().cloned().collect::<Vec<_>>(),
            ),
            None => return Value::Object(Map::new()),
        };

        let mut out = Map::new();
        for (key, value) in entries {
            let json = match value {
                TableValue::Bool(b) => Value::Bool(b),
                TableValue::Double(v) => {
                    serde_json::Number::from_f64(v).map_or(Value::Null, Value::Number)
                }
                TableValue::String(s) => Value::String(s),
            };
            out.insert(key, json);
        }
        for child in children {
            let table = self.dump(&path.child(&child));
            out.insert(child, table);
        }
        Value::Object(out)
    }

    /// Pretend `key` was last written `by` earlier than it really was.
    #[cfg(test)]
    pub(crate) fn backdate(&self, path: &TablePath, key: &str, by: Duration) {
        if let Some(mut node) = self.tables.get_mut(path) {
            if let Some(entry) = node.entries.get_mut(key) {
                if let Some(earlier) = entry.written_at.checked_sub(by) {
                    entry.written_at = earlier;
                }
            }
        }
    }
}

impl Default for MemoryTables {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteTables for MemoryTables {
    fn get_value(&self, path: &TablePath, key: &str) -> Option<TableValue> {
        let node = self.tables.get(path)?;
        node.entries.get(key).map(|e| e.value.clone())
    }

    fn set_value(&self, path: &TablePath, key: &str, value: TableValue) -> bool {
        let created = self.ensure_table(path);
        let accepted = {
            let mut node = self.tables.entry(path.clone()).or_default();
            match node.entries.get_mut(key) {
                Some(entry) if !entry.value.same_type(&value) => {
                    debug!(
                        path = %path,
                        key,
                        existing = entry.value.type_name(),
                        attempted = value.type_name(),
                        "rejected write with mismatched type"
                    );
                    false
                }
                Some(entry) => {
                    entry.value = value;
                    entry.written_at = Instant::now();
                    true
                }
                None => {
                    node.entries.insert(
                        key.to_owned(),
                        Entry {
                            value,
                            written_at: Instant::now(),
                        },
                    );
                    true
                }
            }
        };
        self.notify(created);
        accepted
    }

    fn keys(&self, path: &TablePath) -> Vec<String> {
        self.tables
            .get(path)
            .map(|node| node.entries.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn list_children(&self, path: &TablePath) -> Vec<String> {
        self.tables
            .get(path)
            .map(|node| node.children.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn on_child_created(&self, path: &TablePath, callback: ChildCallback) -> ListenerId {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.listeners.insert(
            id,
            Listener {
                path: path.clone(),
                callback: Arc::clone(&callback),
            },
        );
        for child in self.list_children(path) {
            callback(path, &child);
        }
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners.remove(&id);
    }

    fn last_write_age(&self, path: &TablePath, key: &str) -> Option<Duration> {
        let node = self.tables.get(path)?;
        node.entries.get(key).map(|e| e.written_at.elapsed())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn recorder() -> (ChildCallback, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let cb: ChildCallback = Arc::new(move |_parent: &TablePath, child: &str| {
            sink.lock().unwrap().push(child.to_owned());
        });
        (cb, seen)
    }

    #[test]
    fn write_creates_ancestor_tables() {
        let tables = MemoryTables::new();
        let path = TablePath::new("/Vision Server/Cameras/front");
        assert!(tables.set_double(&path, "Exposure", 40.0));

        assert_eq!(tables.list_children(&TablePath::root()), vec!["Vision Server"]);
        assert_eq!(
            tables.list_children(&TablePath::new("/Vision Server/Cameras")),
            vec!["front"]
        );
        assert_eq!(tables.get_double(&path, "Exposure", 0.0), 40.0);
    }

    #[test]
    fn absent_keys_read_defaults() {
        let tables = MemoryTables::new();
        let path = TablePath::new("/nowhere");
        assert_eq!(tables.get_double(&path, "x", 1.5), 1.5);
        assert!(tables.get_bool(&path, "flag", true));
        assert_eq!(tables.get_string(&path, "name", "none"), "none");
        assert!(tables.last_write_age(&path, "x").is_none());
        assert!(tables.keys(&path).is_empty());
    }

    #[test]
    fn mismatched_type_reads_default_and_write_is_rejected() {
        let tables = MemoryTables::new();
        let path = TablePath::new("/t");
        tables.set_string(&path, "k", "hello");
        assert_eq!(tables.get_double(&path, "k", -1.0), -1.0);
        assert!(!tables.set_double(&path, "k", 2.0));
        assert_eq!(tables.get_string(&path, "k", ""), "hello");
    }

    #[test]
    fn listener_receives_existing_then_new_children() {
        let tables = MemoryTables::new();
        let cams = TablePath::new("/Vision Server/Cameras");
        tables.set_double(&cams.child("a"), "Exposure", 1.0);

        let (cb, seen) = recorder();
        tables.on_child_created(&cams, cb);
        assert_eq!(*seen.lock().unwrap(), vec!["a"]);

        tables.set_double(&cams.child("b"), "Exposure", 1.0);
        // Writing to an existing table does not re-announce it.
        tables.set_double(&cams.child("b"), "Brightness", 1.0);
        assert_eq!(*seen.lock().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn removed_listener_is_silent() {
        let tables = MemoryTables::new();
        let cams = TablePath::new("/cams");
        let (cb, seen) = recorder();
        let id = tables.on_child_created(&cams, cb);
        tables.remove_listener(id);
        tables.create_table(&cams.child("late"));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn callback_may_read_back_the_tables() {
        let tables = Arc::new(MemoryTables::new());
        let cams = TablePath::new("/cams");
        let observed = Arc::new(Mutex::new(0usize));

        let reader = Arc::clone(&tables);
        let sink = Arc::clone(&observed);
        tables.on_child_created(
            &cams,
            Arc::new(move |parent: &TablePath, _child: &str| {
                *sink.lock().unwrap() = reader.list_children(parent).len();
            }),
        );

        tables.set_double(&cams.child("one"), "Exposure", 1.0);
        tables.set_double(&cams.child("two"), "Exposure", 1.0);
        assert_eq!(*observed.lock().unwrap(), 2);
    }

    #[test]
    fn json_snapshot_preserves_structure() {
        let snapshot = json!({
            "Vision Server": {
                "Camera Index": 1.0,
                "Active Target": "none",
                "Cameras": {
                    "front": { "Exposure": 40.0 },
                    "rear": {}
                }
            }
        });

        let tables = MemoryTables::from_json(&snapshot).unwrap();
        let root = TablePath::new("/Vision Server");
        assert_eq!(tables.get_int(&root, "Camera Index", -1), 1);
        assert_eq!(
            tables.list_children(&root.child("Cameras")),
            vec!["front", "rear"]
        );
        assert_eq!(tables.to_json(), snapshot);
    }

    #[test]
    fn json_root_must_be_object() {
        assert!(MemoryTables::from_json(&json!([1, 2, 3])).is_err());
    }

    #[test]
    fn save_and_load_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("tables.json");

        let tables = MemoryTables::new();
        tables.set_bool(&TablePath::new("/Vision Server"), "Show Statistics", true);
        tables.save(&file).unwrap();

        let loaded = MemoryTables::load(&file).unwrap();
        assert!(loaded.get_bool(&TablePath::new("/Vision Server"), "Show Statistics", false));
    }

    #[test]
    fn backdate_ages_an_entry() {
        let tables = MemoryTables::new();
        let path = TablePath::new("/Targets/goal");
        tables.set_double(&path, "distance", 2.0);
        tables.backdate(&path, "distance", Duration::from_secs(5));
        assert!(tables.last_write_age(&path, "distance").unwrap() >= Duration::from_secs(5));
    }
}
