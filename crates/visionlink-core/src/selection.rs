// ── Selection controller ──
//
// Reads and writes the server's "which camera / which pipeline" indices.
// Counts come from the server's advertised totals, names are resolved
// through the mirror cache.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use tracing::debug;

use crate::keys;
use crate::model::{Camera, Descriptor, EntityKind, Pipeline};
use crate::store::{MirrorCache, ResolvedSource};
use crate::tables::TablePath;

/// Value read back when no index has been published.
pub const NO_SELECTION: i32 = -1;

/// The two kinds the server lets a client select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum Selectable {
    Camera,
    Pipeline,
}

impl Selectable {
    pub fn kind(self) -> EntityKind {
        match self {
            Self::Camera => EntityKind::Camera,
            Self::Pipeline => EntityKind::Pipeline,
        }
    }

    fn count_key(self) -> &'static str {
        match self {
            Self::Camera => keys::CAMERAS_AVAILABLE,
            Self::Pipeline => keys::PIPELINES_AVAILABLE,
        }
    }

    fn index_key(self) -> &'static str {
        match self {
            Self::Camera => keys::CAMERA_INDEX,
            Self::Pipeline => keys::PIPELINE_INDEX,
        }
    }
}

impl TryFrom<EntityKind> for Selectable {
    type Error = EntityKind;

    fn try_from(kind: EntityKind) -> Result<Self, Self::Error> {
        match kind {
            EntityKind::Camera => Ok(Self::Camera),
            EntityKind::Pipeline => Ok(Self::Pipeline),
            other => Err(other),
        }
    }
}

/// Camera and pipeline selection against the server's root table.
///
/// Not transactional: an index validated against the advertised count
/// may be stale by the time the write lands if the server republishes in
/// between. Callers that care re-read [`get_index`](Self::get_index).
#[derive(Clone)]
pub struct SelectionController {
    cache: Arc<MirrorCache>,
    root: TablePath,
}

impl SelectionController {
    pub fn new(cache: Arc<MirrorCache>) -> Self {
        let root = cache.config().root_path();
        Self { cache, root }
    }

    /// Number of entities the server advertises, `0` if unpublished.
    pub fn count(&self, kind: Selectable) -> i32 {
        self.cache
            .tables()
            .get_int(&self.root, kind.count_key(), 0)
    }

    /// Selected index, [`NO_SELECTION`] if unpublished.
    pub fn get_index(&self, kind: Selectable) -> i32 {
        self.cache
            .tables()
            .get_int(&self.root, kind.index_key(), NO_SELECTION)
    }

    /// Select `index` if it lies in `[0, count)`. Out-of-range requests
    /// leave the stored index untouched.
    pub fn set_index(&self, kind: Selectable, index: i32) -> bool {
        if index < 0 || index >= self.count(kind) {
            return false;
        }
        self.write_index(kind, index)
    }

    /// Step forward. At the end, wraps to `0` and returns `false`.
    pub fn increment(&self, kind: Selectable) -> bool {
        let next = self.get_index(kind).saturating_add(1);
        if next < self.count(kind) {
            return self.write_index(kind, next);
        }
        debug!(%kind, "selection wrapped to first");
        self.write_index(kind, 0);
        false
    }

    /// Step back. At the start, wraps to `count - 1` and returns `false`.
    pub fn decrement(&self, kind: Selectable) -> bool {
        let previous = self.get_index(kind).saturating_sub(1);
        if previous >= 0 {
            return self.write_index(kind, previous);
        }
        debug!(%kind, "selection wrapped to last");
        self.write_index(kind, self.count(kind).saturating_sub(1));
        false
    }

    /// Select the first cached entity named `name`.
    pub fn select_by_name(&self, kind: Selectable, name: &str) -> bool {
        self.cache
            .find_index(kind.kind(), name)
            .and_then(|i| i32::try_from(i).ok())
            .is_some_and(|i| self.set_index(kind, i))
    }

    pub fn select_camera(&self, camera: &Camera) -> bool {
        self.select_by_name(Selectable::Camera, camera.name())
    }

    pub fn select_pipeline(&self, pipeline: &Pipeline) -> bool {
        self.select_by_name(Selectable::Pipeline, pipeline.name())
    }

    /// Select whichever entity a resolved source reference points at.
    pub fn select_entity(&self, entity: &ResolvedSource) -> bool {
        match entity {
            ResolvedSource::Camera(c) => self.select_camera(c),
            ResolvedSource::Pipeline(p) => self.select_pipeline(p),
        }
    }

    /// Cached descriptor at the selected index, if any.
    pub fn current(&self, kind: Selectable) -> Option<ResolvedSource> {
        let index = usize::try_from(self.get_index(kind)).ok()?;
        match kind {
            Selectable::Camera => self
                .cache
                .lookup_by_index::<Camera>(index)
                .map(ResolvedSource::Camera),
            Selectable::Pipeline => self
                .cache
                .lookup_by_index::<Pipeline>(index)
                .map(ResolvedSource::Pipeline),
        }
    }

    pub fn current_camera(&self) -> Option<Arc<Camera>> {
        let index = usize::try_from(self.get_index(Selectable::Camera)).ok()?;
        self.cache.lookup_by_index(index)
    }

    pub fn current_pipeline(&self) -> Option<Arc<Pipeline>> {
        let index = usize::try_from(self.get_index(Selectable::Pipeline)).ok()?;
        self.cache.lookup_by_index(index)
    }

    fn write_index(&self, kind: Selectable, index: i32) -> bool {
        self.cache
            .tables()
            .set_int(&self.root, kind.index_key(), index)
    }
}
