//! Pipeline command handlers.

use serde::Serialize;
use tabled::Tabled;

use visionlink_core::{Descriptor, Pipeline, Selectable, SourceReference, TableValue};

use crate::cli::{PipelinesArgs, PipelinesCommand, Switch};
use crate::error::CliError;
use crate::output;
use crate::session::Session;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct PipelineRow {
    #[tabled(rename = "#")]
    index: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Selected")]
    selected: String,
    #[tabled(rename = "Enabled")]
    enabled: bool,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Debug")]
    debug: String,
    #[tabled(rename = "Threshold")]
    threshold: String,
}

#[derive(Serialize)]
struct PipelineInfo {
    index: Option<usize>,
    name: String,
    selected: bool,
    enabled: bool,
    source: SourceReference,
    source_name: String,
    verbosity: i32,
    debug_key: Option<String>,
    threshold_key: Option<String>,
}

impl PipelineInfo {
    fn from_pipeline(session: &Session, pipeline: &Pipeline) -> Self {
        let index = pipeline.position_index();
        let source = pipeline.source();
        Self {
            index,
            name: pipeline.name().to_owned(),
            selected: util::is_selected(session.ctx(), Selectable::Pipeline, index),
            enabled: pipeline.is_enabled(),
            source,
            source_name: util::source_label(session.ctx().cache(), source),
            verbosity: pipeline.verbosity(),
            debug_key: pipeline.debug_key().map(str::to_owned),
            threshold_key: pipeline.threshold_key().map(str::to_owned),
        }
    }
}

impl PipelineRow {
    fn from_info(p: &PipelineInfo) -> Self {
        Self {
            index: p.index.map_or_else(|| "-".into(), |i| i.to_string()),
            name: p.name.clone(),
            selected: if p.selected { "*".into() } else { String::new() },
            enabled: p.enabled,
            source: p.source_name.clone(),
            debug: p.debug_key.clone().unwrap_or_default(),
            threshold: p.threshold_key.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct EntryInfo {
    key: String,
    value: TableValue,
}

impl EntryRow {
    fn from_info(e: &EntryInfo) -> Self {
        Self {
            key: e.key.clone(),
            value: e.value.to_string(),
            kind: e.value.type_name(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(session: &Session, args: PipelinesArgs) -> Result<(), CliError> {
    match args.command {
        PipelinesCommand::List => {
            let pipelines = session.ctx().cache().pipelines();
            let infos: Vec<PipelineInfo> = pipelines
                .iter()
                .map(|p| PipelineInfo::from_pipeline(session, p))
                .collect();
            let out = output::render_list(
                session.format(),
                &infos,
                PipelineRow::from_info,
                |p| p.name.clone(),
            )?;
            output::print_output(&out, session.quiet());
            Ok(())
        }

        PipelinesCommand::Show { pipeline } => {
            let pipeline = util::find_pipeline(session.ctx(), &pipeline)?;
            let entries: Vec<EntryInfo> = pipeline
                .entries()
                .into_iter()
                .map(|(key, value)| EntryInfo { key, value })
                .collect();
            let out = output::render_list(
                session.format(),
                &entries,
                EntryRow::from_info,
                |e| format!("{}={}", e.key, e.value),
            )?;
            output::print_output(&out, session.quiet());
            Ok(())
        }

        PipelinesCommand::Select { pipeline } => {
            util::select(session, Selectable::Pipeline, &pipeline)
        }

        PipelinesCommand::Next => util::step(session, Selectable::Pipeline, true),

        PipelinesCommand::Prev => util::step(session, Selectable::Pipeline, false),

        PipelinesCommand::Debug { pipeline, state } => {
            set_view(session, &pipeline, state, View::Debug)
        }

        PipelinesCommand::Threshold { pipeline, state } => {
            set_view(session, &pipeline, state, View::Threshold)
        }
    }
}

#[derive(Clone, Copy)]
enum View {
    Debug,
    Threshold,
}

/// Flip one of the pipeline's discovered view entries.
fn set_view(session: &Session, name: &str, state: Switch, view: View) -> Result<(), CliError> {
    let pipeline = util::find_pipeline(session.ctx(), name)?;
    let (present, label) = match view {
        View::Debug => (pipeline.has_debug(), "debug"),
        View::Threshold => (pipeline.has_threshold(), "threshold"),
    };
    if !present {
        return Err(CliError::MissingEntry {
            owner: name.into(),
            entry: label.into(),
        });
    }

    let written = match view {
        View::Debug => pipeline.set_debug(state.enabled()),
        View::Threshold => pipeline.set_threshold(state.enabled()),
    };
    if !written {
        return Err(CliError::rejected(format!("{label} view on '{name}'")));
    }
    session.mark_dirty();
    let word = if state.enabled() { "on" } else { "off" };
    session.note(&format!("Turned {label} view {word} for '{name}'"));
    Ok(())
}
