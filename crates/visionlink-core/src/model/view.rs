use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::tables::{RemoteTables, TablePath, TableValue};

/// One remote sub-table plus the identity the mirror assigned to it.
#[derive(Clone)]
pub struct TableView {
    tables: Arc<dyn RemoteTables>,
    path: TablePath,
    name: String,
    position: Option<usize>,
}

impl TableView {
    /// A standalone view: named after the path's last segment, no position.
    pub fn new(tables: Arc<dyn RemoteTables>, path: TablePath) -> Self {
        let name = path.base_name().to_owned();
        Self {
            tables,
            path,
            name,
            position: None,
        }
    }

    pub(crate) fn at_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    pub(crate) fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position_index(&self) -> Option<usize> {
        self.position
    }

    pub fn path(&self) -> &TablePath {
        &self.path
    }

    pub fn tables(&self) -> &Arc<dyn RemoteTables> {
        &self.tables
    }

    /// Every entry key currently in the table.
    pub fn keys(&self) -> Vec<String> {
        self.tables.keys(&self.path)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.tables.contains_key(&self.path, key)
    }

    pub fn value(&self, key: &str) -> Option<TableValue> {
        self.tables.get_value(&self.path, key)
    }

    pub fn last_write_age(&self, key: &str) -> Option<Duration> {
        self.tables.last_write_age(&self.path, key)
    }

    // ── Typed reads / writes ─────────────────────────────────────────

    pub(crate) fn double(&self, key: &str) -> f64 {
        self.tables.get_double(&self.path, key, 0.0)
    }

    pub(crate) fn int(&self, key: &str) -> i32 {
        self.tables.get_int(&self.path, key, 0)
    }

    pub(crate) fn flag(&self, key: &str) -> bool {
        self.tables.get_bool(&self.path, key, false)
    }

    pub(crate) fn set_int(&self, key: &str, value: i32) -> bool {
        self.tables.set_int(&self.path, key, value)
    }

    pub(crate) fn set_flag(&self, key: &str, value: bool) -> bool {
        self.tables.set_bool(&self.path, key, value)
    }

    pub(crate) fn set(&self, key: &str, value: TableValue) -> bool {
        self.tables.set_value(&self.path, key, value)
    }
}

impl fmt::Debug for TableView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableView")
            .field("path", &self.path)
            .field("name", &self.name)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}
