//! Shared helpers for command handlers.

use std::sync::Arc;

use visionlink_core::{Camera, MirrorCache, Pipeline, Selectable, SourceReference, VisionContext};

use crate::error::CliError;
use crate::output;
use crate::session::Session;

fn list_command(kind: Selectable) -> &'static str {
    match kind {
        Selectable::Camera => "cameras list",
        Selectable::Pipeline => "pipelines list",
    }
}

fn resource_type(kind: Selectable) -> &'static str {
    match kind {
        Selectable::Camera => "camera",
        Selectable::Pipeline => "pipeline",
    }
}

/// Resolve a NAME|INDEX argument. Names win over indices, so a camera
/// literally named "1" is still reachable by name.
pub fn resolve_index(
    ctx: &VisionContext,
    kind: Selectable,
    identifier: &str,
) -> Result<i64, CliError> {
    if let Some(index) = ctx.cache().find_index(kind.kind(), identifier) {
        return i64::try_from(index).map_err(|_| CliError::Validation {
            field: resource_type(kind).into(),
            reason: format!("index {index} does not fit"),
        });
    }
    identifier
        .parse::<i64>()
        .map_err(|_| CliError::not_found(resource_type(kind), identifier, list_command(kind)))
}

pub fn find_camera(ctx: &VisionContext, name: &str) -> Result<Arc<Camera>, CliError> {
    ctx.cache()
        .lookup_by_name::<Camera>(name)
        .ok_or_else(|| CliError::not_found("camera", name, list_command(Selectable::Camera)))
}

pub fn find_pipeline(ctx: &VisionContext, name: &str) -> Result<Arc<Pipeline>, CliError> {
    ctx.cache()
        .lookup_by_name::<Pipeline>(name)
        .ok_or_else(|| CliError::not_found("pipeline", name, list_command(Selectable::Pipeline)))
}

/// Human label for a decoded source field: the referenced entity's name
/// when it is cached, otherwise its kind and position.
pub fn source_label(cache: &MirrorCache, source: SourceReference) -> String {
    if let Some(resolved) = cache.resolve_source(source) {
        return resolved.name().to_owned();
    }
    match source {
        SourceReference::None => "-".into(),
        SourceReference::Camera(i) => format!("camera #{i}"),
        SourceReference::Pipeline(i) => format!("pipeline #{i}"),
    }
}

/// Name of whatever sits at the selected index, or the bare index.
pub fn selection_label(ctx: &VisionContext, kind: Selectable) -> String {
    let selection = ctx.selection();
    selection.current(kind).map_or_else(
        || format!("#{}", selection.get_index(kind)),
        |entity| entity.name().to_owned(),
    )
}

/// Whether `position` is the selected index for `kind`.
pub fn is_selected(ctx: &VisionContext, kind: Selectable, position: Option<usize>) -> bool {
    let selected = usize::try_from(ctx.selection().get_index(kind)).ok();
    position.is_some() && position == selected
}

// ── Selection handlers shared by cameras and pipelines ─────────────

pub fn select(session: &Session, kind: Selectable, identifier: &str) -> Result<(), CliError> {
    let ctx = session.ctx();
    let index = resolve_index(ctx, kind, identifier)?;
    let accepted = i32::try_from(index)
        .ok()
        .is_some_and(|i| ctx.selection().set_index(kind, i));
    if !accepted {
        return Err(CliError::OutOfRange {
            resource_type: resource_type(kind).into(),
            index,
            count: ctx.selection().count(kind),
        });
    }
    session.mark_dirty();
    print_selection(session, kind);
    Ok(())
}

/// Step the selection; wrapping around is reported, not an error.
pub fn step(session: &Session, kind: Selectable, forward: bool) -> Result<(), CliError> {
    let ctx = session.ctx();
    if ctx.selection().count(kind) <= 0 {
        return Err(CliError::not_found(
            resource_type(kind),
            "any",
            list_command(kind),
        ));
    }
    let stepped = if forward {
        ctx.selection().increment(kind)
    } else {
        ctx.selection().decrement(kind)
    };
    session.mark_dirty();
    if !stepped {
        session.note(&format!("Wrapped around the {} list", resource_type(kind)));
    }
    print_selection(session, kind);
    Ok(())
}

fn print_selection(session: &Session, kind: Selectable) {
    output::print_output(&selection_label(session.ctx(), kind), session.quiet());
}
