//! Shared configuration for visionlink tools.
//!
//! TOML file at the platform config directory, layered under
//! `VISIONLINK_`-prefixed environment variables, translated into
//! `visionlink_core::MirrorConfig`. The core never reads this file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use visionlink_core::MirrorConfig;
use visionlink_core::config::{DEFAULT_ROOT_TABLE, DEFAULT_TARGETS_TABLE};

pub const ENV_PREFIX: &str = "VISIONLINK_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config struct ──────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Table the vision server publishes under.
    #[serde(default = "default_root_table")]
    pub root_table: String,

    /// Table holding one sub-table per target.
    #[serde(default = "default_targets_table")]
    pub targets_table: String,

    /// How recently a target must have been written to count as updated.
    #[serde(default = "default_target_freshness_ms")]
    pub target_freshness_ms: u64,

    /// Snapshot file used when `--snapshot` is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<PathBuf>,

    /// Default output format.
    #[serde(default = "default_output")]
    pub output: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_table: default_root_table(),
            targets_table: default_targets_table(),
            target_freshness_ms: default_target_freshness_ms(),
            snapshot: None,
            output: default_output(),
        }
    }
}

fn default_root_table() -> String {
    DEFAULT_ROOT_TABLE.into()
}
fn default_targets_table() -> String {
    DEFAULT_TARGETS_TABLE.into()
}
fn default_target_freshness_ms() -> u64 {
    100
}
fn default_output() -> String {
    "table".into()
}

impl Config {
    /// Translate into the core's table layout, rejecting empty table names.
    pub fn to_mirror_config(&self) -> Result<MirrorConfig, ConfigError> {
        Ok(MirrorConfig {
            root_table: table_name("root_table", &self.root_table)?,
            targets_table: table_name("targets_table", &self.targets_table)?,
            target_freshness: Duration::from_millis(self.target_freshness_ms),
        })
    }
}

fn table_name(field: &str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim_matches('/');
    if trimmed.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: field.into(),
            reason: "table name cannot be empty".into(),
        });
    }
    Ok(trimmed.to_owned())
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "visionlink", "visionlink").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("visionlink");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file path, still layering the environment on top.
/// A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
