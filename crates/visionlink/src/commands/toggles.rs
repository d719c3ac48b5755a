//! Root-level boolean toggles: statistics overlay and server processing.

use serde::Serialize;

use visionlink_core::keys;

use crate::cli::{ToggleArgs, ToggleCommand};
use crate::error::CliError;
use crate::output;
use crate::session::Session;

#[derive(Serialize)]
struct ToggleInfo {
    setting: &'static str,
    enabled: bool,
}

fn print_state(session: &Session, setting: &'static str, enabled: bool) -> Result<(), CliError> {
    let info = ToggleInfo { setting, enabled };
    let out = output::render_single(
        session.format(),
        &info,
        |t| format!("{}: {}", t.setting, if t.enabled { "on" } else { "off" }),
        |t| t.enabled.to_string(),
    )?;
    output::print_output(&out, session.quiet());
    Ok(())
}

pub fn handle_statistics(session: &Session, args: &ToggleArgs) -> Result<(), CliError> {
    let ctx = session.ctx();
    if matches!(args.command, ToggleCommand::Toggle) {
        if !ctx.toggle_statistics() {
            return Err(CliError::rejected(keys::SHOW_STATISTICS));
        }
        session.mark_dirty();
    }
    print_state(session, keys::SHOW_STATISTICS, ctx.is_showing_statistics())
}

pub fn handle_processing(session: &Session, args: &ToggleArgs) -> Result<(), CliError> {
    let ctx = session.ctx();
    if matches!(args.command, ToggleCommand::Toggle) {
        if !ctx.toggle_processing_enabled() {
            let published = ctx
                .cache()
                .tables()
                .contains_key(&ctx.config().root_path(), keys::ENABLE_PROCESSING);
            if !published {
                return Err(CliError::MissingEntry {
                    owner: ctx.config().root_table.clone(),
                    entry: keys::ENABLE_PROCESSING.into(),
                });
            }
            return Err(CliError::rejected(keys::ENABLE_PROCESSING));
        }
        session.mark_dirty();
    }
    print_state(session, keys::ENABLE_PROCESSING, ctx.is_processing_enabled())
}
