//! Stream command handlers.

use serde::Serialize;
use tabled::Tabled;

use visionlink_core::{Descriptor, SourceReference};

use crate::cli::{StreamsArgs, StreamsCommand};
use crate::error::CliError;
use crate::output;
use crate::session::Session;

use super::util;

#[derive(Tabled)]
struct StreamRow {
    #[tabled(rename = "#")]
    index: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Port")]
    port: u16,
    #[tabled(rename = "Source")]
    source: String,
}

#[derive(Serialize)]
struct StreamInfo {
    index: Option<usize>,
    name: String,
    port: u16,
    source: SourceReference,
    source_name: String,
}

impl StreamRow {
    fn from_info(s: &StreamInfo) -> Self {
        Self {
            index: s.index.map_or_else(|| "-".into(), |i| i.to_string()),
            name: s.name.clone(),
            port: s.port,
            source: s.source_name.clone(),
        }
    }
}

pub fn handle(session: &Session, args: &StreamsArgs) -> Result<(), CliError> {
    match args.command {
        StreamsCommand::List => {
            let cache = session.ctx().cache();
            let infos: Vec<StreamInfo> = cache
                .streams()
                .iter()
                .map(|s| {
                    let source = s.source();
                    StreamInfo {
                        index: s.position_index(),
                        name: s.name().to_owned(),
                        port: s.port(),
                        source,
                        source_name: util::source_label(cache, source),
                    }
                })
                .collect();
            let out = output::render_list(
                session.format(),
                &infos,
                StreamRow::from_info,
                |s| s.name.clone(),
            )?;
            output::print_output(&out, session.quiet());
            Ok(())
        }
    }
}
