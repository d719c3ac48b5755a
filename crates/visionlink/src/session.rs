//! Per-invocation state: the loaded snapshot, the vision context mirrored
//! from it, and the resolved output settings.
//!
//! Commands write straight into the in-memory tables. Nothing reaches the
//! snapshot file unless `--write` was given.

use std::cell::Cell;
use std::path::PathBuf;
use std::sync::Arc;

use clap::ValueEnum;
use tracing::{debug, info};

use visionlink_config::{self as config, Config};
use visionlink_core::{MemoryTables, RemoteTables, VisionContext};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

pub struct Session {
    ctx: VisionContext,
    tables: Arc<MemoryTables>,
    snapshot: PathBuf,
    format: OutputFormat,
    quiet: bool,
    write: bool,
    dirty: Cell<bool>,
}

impl Session {
    /// Load config and snapshot, then mirror the snapshot's tables.
    pub fn open(global: &GlobalOpts) -> Result<Self, CliError> {
        let cfg = config::load_config()?;
        let format = resolve_format(global, &cfg)?;

        let snapshot = global
            .snapshot
            .clone()
            .or_else(|| cfg.snapshot.clone())
            .ok_or_else(|| CliError::NoSnapshot {
                config_path: config::config_path().display().to_string(),
            })?;

        let tables = Arc::new(MemoryTables::load(&snapshot)?);
        let remote: Arc<dyn RemoteTables> = tables.clone();
        let ctx = VisionContext::init(remote, cfg.to_mirror_config()?);
        debug!(snapshot = %snapshot.display(), connected = ctx.is_connected(), "session opened");

        Ok(Self {
            ctx,
            tables,
            snapshot,
            format,
            quiet: global.quiet,
            write: global.write,
            dirty: Cell::new(false),
        })
    }

    pub fn ctx(&self) -> &VisionContext {
        &self.ctx
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn quiet(&self) -> bool {
        self.quiet
    }

    /// Record that the in-memory tables diverge from the snapshot file.
    pub fn mark_dirty(&self) {
        self.dirty.set(true);
    }

    /// Status line on stderr, suppressed by `--quiet`.
    pub fn note(&self, message: &str) {
        if !self.quiet {
            eprintln!("{message}");
        }
    }

    /// Stop mirroring and, with `--write`, persist any changes.
    pub fn finish(self) -> Result<(), CliError> {
        self.ctx.shutdown();
        if !self.dirty.get() {
            return Ok(());
        }
        if self.write {
            self.tables.save(&self.snapshot)?;
            info!(snapshot = %self.snapshot.display(), "snapshot updated");
        } else {
            self.note(&format!(
                "Changes not saved; pass --write to update {}",
                self.snapshot.display()
            ));
        }
        Ok(())
    }
}

/// `--output` wins, then the config file's `output`, then `table`.
pub fn resolve_format(global: &GlobalOpts, cfg: &Config) -> Result<OutputFormat, CliError> {
    if let Some(format) = global.output {
        return Ok(format);
    }
    OutputFormat::from_str(&cfg.output, true).map_err(|reason| CliError::Validation {
        field: "output".into(),
        reason,
    })
}
