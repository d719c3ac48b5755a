// visionlink-core: Typed mirror of a vision server's remote tables.
//
// The server publishes cameras, pipelines, streams and targets as child
// tables of a shared key/value store. This crate keeps an always-rebuilt
// snapshot of each kind and layers selection and target tracking on top.

pub mod config;
pub mod context;
pub mod error;
pub mod keys;
pub mod model;
pub mod reference;
pub mod selection;
pub mod store;
pub mod stream;
pub mod tables;
pub mod target;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::MirrorConfig;
pub use context::{LinkState, VisionContext};
pub use error::CoreError;
pub use reference::{SourceField, SourceReference};
pub use selection::{Selectable, SelectionController};
pub use store::{MirrorCache, Mirrored, ResolvedSource};
pub use stream::EntityStream;
pub use tables::{MemoryTables, RemoteTables, TablePath, TableValue};
pub use target::ActiveTarget;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Camera, CameraPreset, Descriptor, EntityKind, EntryOption, Pipeline, Stream, TableView,
    Target, TargetData, TargetOffset,
};
