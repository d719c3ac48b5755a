//! Active target handler.

use std::time::Duration;

use serde::Serialize;

use visionlink_core::{TargetData, TargetOffset};

use crate::cli::TargetArgs;
use crate::error::CliError;
use crate::output;
use crate::session::Session;

#[derive(Serialize)]
struct TargetInfo {
    name: String,
    distance: f64,
    up_down: f64,
    left_right: f64,
    offset: TargetOffset,
    updated: bool,
    age_ms: Option<u64>,
}

pub fn handle(session: &Session, args: &TargetArgs) -> Result<(), CliError> {
    let active = session.ctx().active_target();
    if !active.has_target() {
        return Err(CliError::NoTarget);
    }
    let name = active.current_name();

    let data: TargetData = match &args.expect {
        Some(expected) => {
            active
                .resolve_if_named(expected)
                .ok_or_else(|| CliError::TargetMismatch {
                    expected: expected.clone(),
                    actual: name.clone(),
                })?
        }
        None => active.resolve().ok_or(CliError::NoTarget)?,
    };

    if let Some(max_age_ms) = args.max_age_ms {
        if !active.is_updated_within(Duration::from_millis(max_age_ms)) {
            return Err(CliError::StaleTarget { name, max_age_ms });
        }
    }

    let age = active.descriptor().and_then(|t| t.last_update_age());
    let info = TargetInfo {
        name,
        distance: data.distance,
        up_down: data.up_down,
        left_right: data.left_right,
        offset: data.offset,
        updated: active.is_updated(),
        age_ms: age.and_then(|a| u64::try_from(a.as_millis()).ok()),
    };

    let out = output::render_single(session.format(), &info, detail, |t| t.name.clone())?;
    output::print_output(&out, session.quiet());
    Ok(())
}

fn detail(t: &TargetInfo) -> String {
    output::detail_lines(&[
        ("Target", t.name.clone()),
        ("Distance", t.distance.to_string()),
        ("Up/Down", t.up_down.to_string()),
        ("Left/Right", t.left_right.to_string()),
        (
            "Offset",
            format!("x={} y={} z={}", t.offset.x, t.offset.y, t.offset.z),
        ),
        ("Updated", t.updated.to_string()),
        (
            "Age",
            t.age_ms.map_or_else(|| "-".into(), |ms| format!("{ms} ms")),
        ),
    ])
}
