// ── Core error types ──
//
// Almost nothing in the mirror is allowed to fail: absent keys read as
// defaults, out-of-range selections return `false`, stale caches are a
// query. The variants here cover the few paths that are genuinely caller
// errors or touch the filesystem.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::EntityKind;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Reference encoding ───────────────────────────────────────────
    #[error("{kind} index {index} cannot be encoded into a source field")]
    SourceIndexOutOfRange { kind: EntityKind, index: usize },

    #[error("{kind} entities have no source field")]
    NoSourceField { kind: EntityKind },

    // ── Snapshot files ───────────────────────────────────────────────
    #[error("Snapshot I/O failed for {}: {source}", path.display())]
    SnapshotIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid snapshot: {message}")]
    InvalidSnapshot { message: String },
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::InvalidSnapshot {
            message: err.to_string(),
        }
    }
}
