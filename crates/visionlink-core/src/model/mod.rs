// ── Entity descriptors ──
//
// Typed read-through views over the child tables the vision server
// publishes. Descriptors cache only their identity (name, position);
// every attribute read goes back to the remote tables.

pub mod camera;
pub mod pipeline;
pub mod stream;
pub mod target;
mod view;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

pub use camera::{Camera, CameraPreset};
pub use pipeline::{EntryOption, Pipeline};
pub use stream::Stream;
pub use target::{Target, TargetData, TargetOffset};
pub use view::TableView;

use crate::tables::TablePath;

/// The four kinds of child table mirrored from the remote store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, IntoStaticStr,
)]
pub enum EntityKind {
    Camera,
    Pipeline,
    Stream,
    Target,
}

impl EntityKind {
    /// Name of the table that holds every entity of this kind.
    pub fn table_name(self) -> &'static str {
        match self {
            Self::Camera => "Cameras",
            Self::Pipeline => "Pipelines",
            Self::Stream => "Streams",
            Self::Target => "Targets",
        }
    }
}

/// Shared shape of every descriptor kind.
pub trait Descriptor: Send + Sync + 'static {
    const KIND: EntityKind;

    fn from_view(view: TableView) -> Self;

    fn view(&self) -> &TableView;

    fn name(&self) -> &str {
        self.view().name()
    }

    /// Ordinal among siblings at the last rebuild, `None` for a descriptor
    /// built outside a rebuild.
    fn position_index(&self) -> Option<usize> {
        self.view().position_index()
    }

    fn path(&self) -> &TablePath {
        self.view().path()
    }
}
