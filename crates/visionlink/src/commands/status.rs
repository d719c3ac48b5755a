//! Server summary handler.

use serde::Serialize;

use visionlink_core::{EntityKind, Selectable};

use crate::error::CliError;
use crate::output;
use crate::session::Session;

use super::util;

#[derive(Serialize)]
struct StatusInfo {
    root: String,
    link: String,
    cameras: usize,
    pipelines: usize,
    streams: usize,
    targets: usize,
    /// Cached counts agree with what the server advertises.
    in_sync: bool,
    selected_camera: Option<String>,
    selected_pipeline: Option<String>,
    active_target: Option<String>,
    statistics: bool,
    processing: bool,
}

pub fn handle(session: &Session) -> Result<(), CliError> {
    let ctx = session.ctx();
    let cache = ctx.cache();
    let selected = |kind: Selectable| {
        (ctx.selection().get_index(kind) >= 0).then(|| util::selection_label(ctx, kind))
    };
    let active = ctx.active_target();

    let info = StatusInfo {
        root: ctx.config().root_path().to_string(),
        link: (*ctx.link_state().borrow()).to_string(),
        cameras: cache.len(EntityKind::Camera),
        pipelines: cache.len(EntityKind::Pipeline),
        streams: cache.len(EntityKind::Stream),
        targets: cache.len(EntityKind::Target),
        in_sync: cache.is_fresh(EntityKind::Camera) && cache.is_fresh(EntityKind::Pipeline),
        selected_camera: selected(Selectable::Camera),
        selected_pipeline: selected(Selectable::Pipeline),
        active_target: active.has_target().then(|| active.current_name()),
        statistics: ctx.is_showing_statistics(),
        processing: ctx.is_processing_enabled(),
    };

    let out = output::render_single(session.format(), &info, detail, |s| s.link.clone())?;
    output::print_output(&out, session.quiet());
    Ok(())
}

fn detail(s: &StatusInfo) -> String {
    let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".into());
    output::detail_lines(&[
        ("Root", s.root.clone()),
        ("Link", s.link.clone()),
        ("Cameras", s.cameras.to_string()),
        ("Pipelines", s.pipelines.to_string()),
        ("Streams", s.streams.to_string()),
        ("Targets", s.targets.to_string()),
        ("In sync", s.in_sync.to_string()),
        ("Camera", or_dash(&s.selected_camera)),
        ("Pipeline", or_dash(&s.selected_pipeline)),
        ("Target", or_dash(&s.active_target)),
        ("Statistics", s.statistics.to_string()),
        ("Processing", s.processing.to_string()),
    ])
}
