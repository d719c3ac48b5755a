// ── Mirror configuration ──
//
// Where the vision server publishes its tables and how fresh a target
// must be to count as updated. The core never reads files for this:
// the CLI builds a `MirrorConfig` from its own config layer.

use std::time::Duration;

use crate::model::EntityKind;
use crate::tables::TablePath;

pub const DEFAULT_ROOT_TABLE: &str = "Vision Server";
pub const DEFAULT_TARGETS_TABLE: &str = "Targets";
pub const DEFAULT_TARGET_FRESHNESS: Duration = Duration::from_millis(100);

/// Table layout and tuning for one mirrored vision server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorConfig {
    /// Top-level table holding the server's settings and the Cameras,
    /// Pipelines and Streams sub-tables.
    pub root_table: String,
    /// Top-level table holding one sub-table per target.
    pub targets_table: String,
    /// Default window for [`ActiveTarget::is_updated`](crate::ActiveTarget::is_updated).
    pub target_freshness: Duration,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            root_table: DEFAULT_ROOT_TABLE.into(),
            targets_table: DEFAULT_TARGETS_TABLE.into(),
            target_freshness: DEFAULT_TARGET_FRESHNESS,
        }
    }
}

impl MirrorConfig {
    pub fn root_path(&self) -> TablePath {
        TablePath::root().child(&self.root_table)
    }

    pub fn targets_path(&self) -> TablePath {
        TablePath::root().child(&self.targets_table)
    }

    /// Table whose children are the entities of `kind`.
    pub fn kind_path(&self, kind: EntityKind) -> TablePath {
        match kind {
            EntityKind::Target => self.targets_path(),
            EntityKind::Camera | EntityKind::Pipeline | EntityKind::Stream => {
                self.root_path().child(kind.table_name())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout() {
        let config = MirrorConfig::default();
        assert_eq!(config.root_path().as_str(), "/Vision Server");
        assert_eq!(
            config.kind_path(EntityKind::Camera).as_str(),
            "/Vision Server/Cameras"
        );
        assert_eq!(
            config.kind_path(EntityKind::Stream).as_str(),
            "/Vision Server/Streams"
        );
        assert_eq!(config.kind_path(EntityKind::Target).as_str(), "/Targets");
    }

    #[test]
    fn custom_tables_are_normalized() {
        let config = MirrorConfig {
            root_table: "/Vision Two/".into(),
            targets_table: "Goals".into(),
            ..MirrorConfig::default()
        };
        assert_eq!(
            config.kind_path(EntityKind::Pipeline).as_str(),
            "/Vision Two/Pipelines"
        );
        assert_eq!(config.targets_path().as_str(), "/Goals");
    }
}
