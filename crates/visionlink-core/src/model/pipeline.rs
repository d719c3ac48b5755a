use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::{Descriptor, EntityKind, TableView};
use crate::error::CoreError;
use crate::reference::{SourceField, SourceReference};
use crate::tables::TableValue;

pub const ENABLE_PROCESSING: &str = "Enable Processing";
pub const SOURCE_INDEX: &str = "Source Index";
pub const STATISTICS_VERBOSITY: &str = "Statistics Verbosity";

const DEBUG_SEGMENT: &str = "debug";
const THRESHOLD_SEGMENT: &str = "threshold";

/// A named value written to a pipeline only if the pipeline already
/// publishes that key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryOption {
    pub key: String,
    pub value: TableValue,
}

impl EntryOption {
    pub fn boolean(key: impl Into<String>, value: bool) -> Self {
        Self {
            key: key.into(),
            value: TableValue::Bool(value),
        }
    }

    pub fn number(key: impl Into<String>, value: f64) -> Self {
        Self {
            key: key.into(),
            value: TableValue::Double(value),
        }
    }

    /// Returns `true` only if the key existed and the write was accepted.
    pub fn apply(&self, view: &TableView) -> bool {
        view.contains_key(&self.key) && view.set(&self.key, self.value.clone())
    }
}

/// A processing pipeline published under `<root>/Pipelines/<name>`.
///
/// The "debug" and "threshold" toggles have producer-chosen key names. Each
/// is looked up by substring scan; a key once found is kept for the life
/// of this descriptor, while a miss scans again on the next call.
#[derive(Debug)]
pub struct Pipeline {
    view: TableView,
    debug_key: OnceLock<String>,
    threshold_key: OnceLock<String>,
}

impl Pipeline {
    pub fn is_enabled(&self) -> bool {
        self.view.flag(ENABLE_PROCESSING)
    }

    pub fn set_enabled(&self, enabled: bool) -> bool {
        self.view.set_flag(ENABLE_PROCESSING, enabled)
    }

    /// The pipeline's input, decoded with the pipeline convention.
    pub fn source(&self) -> SourceReference {
        SourceField::Pipeline.decode(self.view.int(SOURCE_INDEX))
    }

    pub fn set_source(&self, source: SourceReference) -> Result<bool, CoreError> {
        let raw = SourceField::Pipeline.encode(source)?;
        Ok(self.view.set_int(SOURCE_INDEX, raw))
    }

    pub fn verbosity(&self) -> i32 {
        self.view.int(STATISTICS_VERBOSITY)
    }

    pub fn set_verbosity(&self, level: i32) -> bool {
        self.view.set_int(STATISTICS_VERBOSITY, level)
    }

    /// Every entry currently published by the pipeline.
    pub fn entries(&self) -> Vec<(String, TableValue)> {
        self.view
            .keys()
            .into_iter()
            .filter_map(|key| self.view.value(&key).map(|value| (key, value)))
            .collect()
    }

    /// First key containing `segment`, case-insensitively.
    pub fn search_entry(&self, segment: &str) -> Option<String> {
        let needle = segment.to_lowercase();
        self.view
            .keys()
            .into_iter()
            .find(|key| key.to_lowercase().contains(&needle))
    }

    /// One scan for several segments. A later key overrides an earlier one
    /// for the same segment.
    pub fn search_entries(&self, segments: &[&str]) -> Vec<Option<String>> {
        let needles: Vec<String> = segments.iter().map(|s| s.to_lowercase()).collect();
        let mut found = vec![None; needles.len()];
        for key in self.view.keys() {
            let lower = key.to_lowercase();
            for (slot, needle) in found.iter_mut().zip(&needles) {
                if lower.contains(needle.as_str()) {
                    *slot = Some(key.clone());
                }
            }
        }
        found
    }

    pub fn debug_key(&self) -> Option<&str> {
        self.discover(&self.debug_key, DEBUG_SEGMENT)
    }

    pub fn threshold_key(&self) -> Option<&str> {
        self.discover(&self.threshold_key, THRESHOLD_SEGMENT)
    }

    pub fn has_debug(&self) -> bool {
        self.debug_key().is_some()
    }

    pub fn has_threshold(&self) -> bool {
        self.threshold_key().is_some()
    }

    pub fn set_debug(&self, enabled: bool) -> bool {
        self.debug_key()
            .is_some_and(|key| self.view.set_flag(key, enabled))
    }

    pub fn set_threshold(&self, enabled: bool) -> bool {
        self.threshold_key()
            .is_some_and(|key| self.view.set_flag(key, enabled))
    }

    /// Apply each option whose key exists. Returns how many were written.
    pub fn apply_options(&self, options: &[EntryOption]) -> usize {
        options.iter().filter(|opt| opt.apply(&self.view)).count()
    }

    fn discover<'a>(&self, cell: &'a OnceLock<String>, segment: &str) -> Option<&'a str> {
        if let Some(key) = cell.get() {
            return Some(key.as_str());
        }
        let found = self.search_entries(&[segment]).pop().flatten()?;
        Some(cell.get_or_init(|| found).as_str())
    }
}

impl Descriptor for Pipeline {
    const KIND: EntityKind = EntityKind::Pipeline;

    fn from_view(view: TableView) -> Self {
        Self {
            view,
            debug_key: OnceLock::new(),
            threshold_key: OnceLock::new(),
        }
    }

    fn view(&self) -> &TableView {
        &self.view
    }
}
