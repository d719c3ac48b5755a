//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use visionlink_config::ConfigError;
use visionlink_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const REJECTED: i32 = 6;
    pub const STALE: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Snapshot ─────────────────────────────────────────────────────
    #[error("No snapshot file given")]
    #[diagnostic(
        code(visionlink::no_snapshot),
        help(
            "Pass --snapshot FILE, set VISIONLINK_SNAPSHOT,\n\
             or add `snapshot = \"...\"` to {config_path}"
        )
    )]
    NoSnapshot { config_path: String },

    #[error("Could not read or write snapshot {path}")]
    #[diagnostic(
        code(visionlink::snapshot_io),
        help("Check that the file exists and is readable.")
    )]
    SnapshotIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot is not a valid table tree: {message}")]
    #[diagnostic(
        code(visionlink::invalid_snapshot),
        help("A snapshot is a JSON object: nested objects are tables, scalars are entries.")
    )]
    InvalidSnapshot { message: String },

    // ── Entities ─────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(visionlink::not_found),
        help("Run: visionlink {list_command} to see what the server publishes")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{resource_type} index {index} is out of range (server advertises {count})")]
    #[diagnostic(
        code(visionlink::out_of_range),
        help("Valid indices are 0 through {count} minus one.")
    )]
    OutOfRange {
        resource_type: String,
        index: i64,
        count: i32,
    },

    #[error("'{owner}' has no {entry} entry")]
    #[diagnostic(
        code(visionlink::missing_entry),
        help("The server only accepts writes to entries it already publishes.")
    )]
    MissingEntry { owner: String, entry: String },

    #[error("The table store rejected the write: {action}")]
    #[diagnostic(
        code(visionlink::rejected),
        help("The existing entry probably holds a value of a different type.")
    )]
    Rejected { action: String },

    // ── Target ───────────────────────────────────────────────────────
    #[error("No active target")]
    #[diagnostic(code(visionlink::no_target))]
    NoTarget,

    #[error("Active target is '{actual}', expected '{expected}'")]
    #[diagnostic(code(visionlink::target_mismatch))]
    TargetMismatch { expected: String, actual: String },

    #[error("Target '{name}' has not been updated in the last {max_age_ms} ms")]
    #[diagnostic(code(visionlink::stale_target))]
    StaleTarget { name: String, max_age_ms: u64 },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(visionlink::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(visionlink::config),
        help("Check the config file (visionlink config path) and VISIONLINK_* variables.")
    )]
    Config(#[from] ConfigError),

    #[error("Config file already exists at {path}")]
    #[diagnostic(
        code(visionlink::config_exists),
        help("Use --force to overwrite it.")
    )]
    ConfigExists { path: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(visionlink::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(visionlink::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoSnapshot { .. }
            | Self::OutOfRange { .. }
            | Self::Validation { .. }
            | Self::ConfigExists { .. } => exit_code::USAGE,
            Self::NotFound { .. }
            | Self::MissingEntry { .. }
            | Self::NoTarget
            | Self::TargetMismatch { .. } => exit_code::NOT_FOUND,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::StaleTarget { .. } => exit_code::STALE,
            _ => exit_code::GENERAL,
        }
    }

    pub fn not_found(resource_type: &str, identifier: &str, list_command: &str) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            identifier: identifier.into(),
            list_command: list_command.into(),
        }
    }

    pub fn rejected(action: impl Into<String>) -> Self {
        Self::Rejected {
            action: action.into(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::SnapshotIo { path, source } => CliError::SnapshotIo {
                path: path.display().to_string(),
                source,
            },
            CoreError::InvalidSnapshot { message } => CliError::InvalidSnapshot { message },
            err @ (CoreError::SourceIndexOutOfRange { .. } | CoreError::NoSourceField { .. }) => {
                CliError::Validation {
                    field: "source".into(),
                    reason: err.to_string(),
                }
            }
        }
    }
}
