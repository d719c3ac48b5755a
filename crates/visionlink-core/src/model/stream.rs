use super::{Descriptor, EntityKind, TableView};
use crate::error::CoreError;
use crate::reference::{SourceField, SourceReference};

pub const PORT: &str = "Port";
pub const SOURCE_INDEX: &str = "Source Index";

/// An output stream published under `<root>/Streams/<name>`.
#[derive(Debug, Clone)]
pub struct Stream {
    view: TableView,
}

impl Stream {
    /// Port the stream is served on, `0` if unpublished or out of range.
    pub fn port(&self) -> u16 {
        u16::try_from(self.view.int(PORT)).unwrap_or(0)
    }

    pub fn set_port(&self, port: u16) -> bool {
        self.view.set_int(PORT, i32::from(port))
    }

    /// The stream's input, decoded with the stream convention.
    pub fn source(&self) -> SourceReference {
        SourceField::Stream.decode(self.view.int(SOURCE_INDEX))
    }

    pub fn set_source(&self, source: SourceReference) -> Result<bool, CoreError> {
        let raw = SourceField::Stream.encode(source)?;
        Ok(self.view.set_int(SOURCE_INDEX, raw))
    }
}

impl Descriptor for Stream {
    const KIND: EntityKind = EntityKind::Stream;

    fn from_view(view: TableView) -> Self {
        Self { view }
    }

    fn view(&self) -> &TableView {
        &self.view
    }
}
