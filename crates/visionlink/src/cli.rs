//! Clap derive structures for the `visionlink` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Kept free of crate-internal types so `build.rs` can compile it alone.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// visionlink -- inspect and drive a vision server's published tables
#[derive(Debug, Parser)]
#[command(
    name = "visionlink",
    version,
    about = "Inspect and drive a vision server's cameras, pipelines and targets",
    long_about = "Mirrors the tables a vision server publishes (cameras, pipelines,\n\
        streams, targets) from a JSON snapshot of the table tree, and lets you\n\
        select inputs, flip pipeline toggles and read the active target.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// JSON snapshot of the table tree (overrides config)
    #[arg(long, short = 's', env = "VISIONLINK_SNAPSHOT", global = true)]
    pub snapshot: Option<PathBuf>,

    /// Output format (overrides config)
    #[arg(long, short = 'o', env = "VISIONLINK_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// Save changes back to the snapshot file
    #[arg(long, short = 'w', global = true)]
    pub write: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Shared Enums ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one name per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    pub fn enabled(self) -> bool {
        self == Self::On
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List, select and tune cameras
    #[command(alias = "cam")]
    Cameras(CamerasArgs),

    /// List, select and toggle processing pipelines
    #[command(alias = "pipe")]
    Pipelines(PipelinesArgs),

    /// List output streams
    Streams(StreamsArgs),

    /// Show the active target
    Target(TargetArgs),

    /// Show or toggle the statistics overlay
    Stats(ToggleArgs),

    /// Show or toggle server-wide processing
    Processing(ToggleArgs),

    /// Summarize the mirrored server
    Status,

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CAMERAS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CamerasArgs {
    #[command(subcommand)]
    pub command: CamerasCommand,
}

#[derive(Debug, Subcommand)]
pub enum CamerasCommand {
    /// List cameras in enumeration order
    #[command(alias = "ls")]
    List,

    /// Select a camera by name or index
    Select {
        /// Camera name, or its index in the list
        camera: String,
    },

    /// Select the next camera, wrapping to the first
    Next,

    /// Select the previous camera, wrapping to the last
    Prev,

    /// Write brightness, exposure and white balance
    Preset {
        #[arg(long)]
        brightness: i32,

        #[arg(long)]
        exposure: i32,

        #[arg(long)]
        white_balance: i32,

        /// Only this camera (default: every camera)
        #[arg(long)]
        camera: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PIPELINES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct PipelinesArgs {
    #[command(subcommand)]
    pub command: PipelinesCommand,
}

#[derive(Debug, Subcommand)]
pub enum PipelinesCommand {
    /// List pipelines in enumeration order
    #[command(alias = "ls")]
    List,

    /// Show every entry a pipeline publishes
    Show {
        /// Pipeline name
        pipeline: String,
    },

    /// Select a pipeline by name or index
    Select {
        /// Pipeline name, or its index in the list
        pipeline: String,
    },

    /// Select the next pipeline, wrapping to the first
    Next,

    /// Select the previous pipeline, wrapping to the last
    Prev,

    /// Turn a pipeline's debug view on or off
    Debug {
        /// Pipeline name
        pipeline: String,
        state: Switch,
    },

    /// Turn a pipeline's threshold view on or off
    Threshold {
        /// Pipeline name
        pipeline: String,
        state: Switch,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  STREAMS / TARGET / TOGGLES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct StreamsArgs {
    #[command(subcommand)]
    pub command: StreamsCommand,
}

#[derive(Debug, Subcommand)]
pub enum StreamsCommand {
    /// List streams in enumeration order
    #[command(alias = "ls")]
    List,
}

#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Fail unless this is the active target
    #[arg(long)]
    pub expect: Option<String>,

    /// Fail unless the target was written within this many milliseconds
    #[arg(long)]
    pub max_age_ms: Option<u64>,
}

#[derive(Debug, Args)]
pub struct ToggleArgs {
    #[command(subcommand)]
    pub command: ToggleCommand,
}

#[derive(Debug, Subcommand)]
pub enum ToggleCommand {
    /// Print the current value
    Show,

    /// Flip the current value
    Toggle,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG / COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,

    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
