// ── Remote table facade ──
//
// The only surface through which the mirror touches the remote store.
// Everything above this module reads and writes through `RemoteTables`;
// the transport behind it is somebody else's problem.

mod memory;
mod path;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use memory::MemoryTables;
pub use path::TablePath;

// ── TableValue ──────────────────────────────────────────────────────

/// A single typed entry value.
///
/// The remote store keeps every number as a double; integer attributes
/// (indices, counts, camera settings) are truncated on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableValue {
    Bool(bool),
    Double(f64),
    String(String),
}

impl TableValue {
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the value's type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Double(_) => "double",
            Self::String(_) => "string",
        }
    }

    /// True if both values carry the same variant.
    pub fn same_type(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Display for TableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for TableValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for TableValue {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<i32> for TableValue {
    fn from(v: i32) -> Self {
        Self::Double(f64::from(v))
    }
}

impl From<&str> for TableValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for TableValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

// ── Listener plumbing ───────────────────────────────────────────────

/// Handle returned by [`RemoteTables::on_child_created`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// Callback invoked with `(parent_path, child_name)` when a child table
/// appears under a watched path.
pub type ChildCallback = Arc<dyn Fn(&TablePath, &str) + Send + Sync>;

// ── RemoteTables ────────────────────────────────────────────────────

/// Minimal contract the mirror needs from the remote key/value store.
///
/// Implementations must be callable from any thread. Child-created
/// callbacks may run on a thread owned by the implementation and must
/// not be invoked while the implementation holds internal locks, since
/// callbacks read the tables back.
pub trait RemoteTables: Send + Sync {
    /// Raw value of `key` under `path`, if present.
    fn get_value(&self, path: &TablePath, key: &str) -> Option<TableValue>;

    /// Write `value`. Returns `false` if the store refused the write.
    fn set_value(&self, path: &TablePath, key: &str, value: TableValue) -> bool;

    /// Entry keys directly under `path`, in store order.
    fn keys(&self, path: &TablePath) -> Vec<String>;

    /// Child table names directly under `path`, in store order.
    fn list_children(&self, path: &TablePath) -> Vec<String>;

    /// Register `callback` for child tables created under `path`.
    ///
    /// Children that already exist are delivered immediately, then each new
    /// child is delivered at least once after it is created. Ordering across
    /// distinct children is not guaranteed.
    fn on_child_created(&self, path: &TablePath, callback: ChildCallback) -> ListenerId;

    /// Unregister a callback. Unknown ids are ignored.
    fn remove_listener(&self, id: ListenerId);

    /// Time since `key` under `path` was last written, `None` if absent.
    fn last_write_age(&self, path: &TablePath, key: &str) -> Option<Duration>;

    // ── Typed helpers ────────────────────────────────────────────────

    fn contains_key(&self, path: &TablePath, key: &str) -> bool {
        self.get_value(path, key).is_some()
    }

    fn get_double(&self, path: &TablePath, key: &str, default: f64) -> f64 {
        self.get_value(path, key)
            .and_then(|v| v.as_double())
            .unwrap_or(default)
    }

    fn get_bool(&self, path: &TablePath, key: &str, default: bool) -> bool {
        self.get_value(path, key)
            .and_then(|v| v.as_bool())
            .unwrap_or(default)
    }

    fn get_string(&self, path: &TablePath, key: &str, default: &str) -> String {
        match self.get_value(path, key) {
            Some(TableValue::String(s)) => s,
            _ => default.to_owned(),
        }
    }

    /// Integer view of a numeric entry. Fractions truncate toward zero,
    /// out-of-range values saturate.
    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
    fn get_int(&self, path: &TablePath, key: &str, default: i32) -> i32 {
        self.get_double(path, key, f64::from(default)) as i32
    }

    fn set_double(&self, path: &TablePath, key: &str, value: f64) -> bool {
        self.set_value(path, key, TableValue::Double(value))
    }

    fn set_bool(&self, path: &TablePath, key: &str, value: bool) -> bool {
        self.set_value(path, key, TableValue::Bool(value))
    }

    fn set_string(&self, path: &TablePath, key: &str, value: &str) -> bool {
        self.set_value(path, key, TableValue::from(value))
    }

    fn set_int(&self, path: &TablePath, key: &str, value: i32) -> bool {
        self.set_value(path, key, TableValue::from(value))
    }
}
