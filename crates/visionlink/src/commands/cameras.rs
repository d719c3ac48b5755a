//! Camera command handlers.

use serde::Serialize;
use tabled::Tabled;

use visionlink_core::{Camera, CameraPreset, Descriptor, Selectable};

use crate::cli::{CamerasArgs, CamerasCommand};
use crate::error::CliError;
use crate::output;
use crate::session::Session;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct CameraRow {
    #[tabled(rename = "#")]
    index: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Selected")]
    selected: String,
    #[tabled(rename = "Exposure")]
    exposure: i32,
    #[tabled(rename = "Brightness")]
    brightness: i32,
    #[tabled(rename = "White Balance")]
    white_balance: i32,
}

#[derive(Serialize)]
struct CameraInfo {
    index: Option<usize>,
    name: String,
    selected: bool,
    exposure: i32,
    brightness: i32,
    white_balance: i32,
}

impl CameraInfo {
    fn from_camera(session: &Session, camera: &Camera) -> Self {
        let index = camera.position_index();
        Self {
            index,
            name: camera.name().to_owned(),
            selected: util::is_selected(session.ctx(), Selectable::Camera, index),
            exposure: camera.exposure(),
            brightness: camera.brightness(),
            white_balance: camera.white_balance(),
        }
    }
}

impl CameraRow {
    fn from_info(c: &CameraInfo) -> Self {
        Self {
            index: c.index.map_or_else(|| "-".into(), |i| i.to_string()),
            name: c.name.clone(),
            selected: if c.selected { "*".into() } else { String::new() },
            exposure: c.exposure,
            brightness: c.brightness,
            white_balance: c.white_balance,
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(session: &Session, args: CamerasArgs) -> Result<(), CliError> {
    match args.command {
        CamerasCommand::List => {
            let cameras = session.ctx().cache().cameras();
            let infos: Vec<CameraInfo> = cameras
                .iter()
                .map(|c| CameraInfo::from_camera(session, c))
                .collect();
            let out = output::render_list(
                session.format(),
                &infos,
                CameraRow::from_info,
                |c| c.name.clone(),
            )?;
            output::print_output(&out, session.quiet());
            Ok(())
        }

        CamerasCommand::Select { camera } => util::select(session, Selectable::Camera, &camera),

        CamerasCommand::Next => util::step(session, Selectable::Camera, true),

        CamerasCommand::Prev => util::step(session, Selectable::Camera, false),

        CamerasCommand::Preset {
            brightness,
            exposure,
            white_balance,
            camera,
        } => {
            let preset = CameraPreset::new(brightness, exposure, white_balance);
            let ctx = session.ctx();
            let (applied, target) = if let Some(name) = camera {
                let cam = util::find_camera(ctx, &name)?;
                (cam.apply_preset(&preset), format!("camera '{name}'"))
            } else {
                if ctx.cache().cameras().is_empty() {
                    return Err(CliError::not_found("camera", "any", "cameras list"));
                }
                (ctx.apply_camera_preset(&preset), "every camera".into())
            };
            // A partial preset still changed the tables.
            session.mark_dirty();
            if !applied {
                return Err(CliError::rejected(format!("camera preset on {target}")));
            }
            session.note(&format!("Preset applied to {target}"));
            Ok(())
        }
    }
}
