//! Command dispatch: bridges CLI args -> vision context -> output formatting.

pub mod cameras;
pub mod config_cmd;
pub mod pipelines;
pub mod status;
pub mod streams;
pub mod target;
pub mod toggles;
pub mod util;

use crate::cli::Command;
use crate::error::CliError;
use crate::session::Session;

/// Dispatch a snapshot-bound command to the appropriate handler.
pub fn dispatch(cmd: Command, session: &Session) -> Result<(), CliError> {
    match cmd {
        Command::Cameras(args) => cameras::handle(session, args),
        Command::Pipelines(args) => pipelines::handle(session, args),
        Command::Streams(args) => streams::handle(session, &args),
        Command::Target(args) => target::handle(session, &args),
        Command::Stats(args) => toggles::handle_statistics(session, &args),
        Command::Processing(args) => toggles::handle_processing(session, &args),
        Command::Status => status::handle(session),
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
