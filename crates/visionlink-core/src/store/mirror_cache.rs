// ── Central mirror cache ──
//
// Holds one `MirrorCollection` per entity kind. Typed lookups go
// through the `Mirrored` trait; kind-keyed queries dispatch with
// `with_collection!`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use super::collection::MirrorCollection;
use crate::config::MirrorConfig;
use crate::keys;
use crate::model::{Camera, Descriptor, EntityKind, Pipeline, Stream, Target};
use crate::reference::SourceReference;
use crate::stream::EntityStream;
use crate::tables::RemoteTables;

/// Run `$body` with `$c` bound to the collection for `$kind`.
macro_rules! with_collection {
    ($cache:expr, $kind:expr, |$c:ident| $body:expr) => {
        match $kind {
            EntityKind::Camera => {
                let $c = &$cache.cameras;
                $body
            }
            EntityKind::Pipeline => {
                let $c = &$cache.pipelines;
                $body
            }
            EntityKind::Stream => {
                let $c = &$cache.streams;
                $body
            }
            EntityKind::Target => {
                let $c = &$cache.targets;
                $body
            }
        }
    };
}

mod sealed {
    use super::{Descriptor, MirrorCache, MirrorCollection};

    pub trait Sealed: Descriptor + Sized {
        fn collection(cache: &MirrorCache) -> &MirrorCollection<Self>;
    }
}

/// A descriptor kind the cache keeps a collection for.
pub trait Mirrored: sealed::Sealed {}

impl<T: sealed::Sealed> Mirrored for T {}

macro_rules! mirrored {
    ($ty:ty, $field:ident) => {
        impl sealed::Sealed for $ty {
            fn collection(cache: &MirrorCache) -> &MirrorCollection<Self> {
                &cache.$field
            }
        }
    };
}

mirrored!(Camera, cameras);
mirrored!(Pipeline, pipelines);
mirrored!(Stream, streams);
mirrored!(Target, targets);

/// The descriptor a [`SourceReference`] points at.
#[derive(Debug, Clone)]
pub enum ResolvedSource {
    Camera(Arc<Camera>),
    Pipeline(Arc<Pipeline>),
}

impl ResolvedSource {
    pub fn name(&self) -> &str {
        match self {
            Self::Camera(c) => c.name(),
            Self::Pipeline(p) => p.name(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Camera(_) => EntityKind::Camera,
            Self::Pipeline(_) => EntityKind::Pipeline,
        }
    }
}

/// Typed, read-through mirror of every child table the vision server
/// publishes.
///
/// Collections start empty and are only ever replaced by
/// [`rebuild`](Self::rebuild). Indices handed out by one generation are
/// meaningless after the next rebuild of the same kind.
pub struct MirrorCache {
    pub(crate) tables: Arc<dyn RemoteTables>,
    pub(crate) config: MirrorConfig,
    pub(crate) cameras: MirrorCollection<Camera>,
    pub(crate) pipelines: MirrorCollection<Pipeline>,
    pub(crate) streams: MirrorCollection<Stream>,
    pub(crate) targets: MirrorCollection<Target>,
}

impl MirrorCache {
    pub fn new(tables: Arc<dyn RemoteTables>, config: MirrorConfig) -> Self {
        Self {
            tables,
            config,
            cameras: MirrorCollection::new(),
            pipelines: MirrorCollection::new(),
            streams: MirrorCollection::new(),
            targets: MirrorCollection::new(),
        }
    }

    pub fn tables(&self) -> &Arc<dyn RemoteTables> {
        &self.tables
    }

    pub fn config(&self) -> &MirrorConfig {
        &self.config
    }

    // ── Typed lookups ────────────────────────────────────────────────

    /// Descriptor at `index`, `None` outside `[0, len)`.
    pub fn lookup_by_index<T: Mirrored>(&self, index: usize) -> Option<Arc<T>> {
        T::collection(self).get(index)
    }

    /// First descriptor named `name`, in enumeration order.
    pub fn lookup_by_name<T: Mirrored>(&self, name: &str) -> Option<Arc<T>> {
        T::collection(self).by_name(name)
    }

    pub fn snapshot<T: Mirrored>(&self) -> Arc<Vec<Arc<T>>> {
        T::collection(self).snapshot()
    }

    pub fn subscribe<T: Mirrored>(&self) -> EntityStream<T> {
        EntityStream::new(T::collection(self).subscribe())
    }

    pub fn cameras(&self) -> Arc<Vec<Arc<Camera>>> {
        self.cameras.snapshot()
    }

    pub fn pipelines(&self) -> Arc<Vec<Arc<Pipeline>>> {
        self.pipelines.snapshot()
    }

    pub fn streams(&self) -> Arc<Vec<Arc<Stream>>> {
        self.streams.snapshot()
    }

    pub fn targets(&self) -> Arc<Vec<Arc<Target>>> {
        self.targets.snapshot()
    }

    /// Range-check a decoded reference against the live cache.
    pub fn resolve_source(&self, reference: SourceReference) -> Option<ResolvedSource> {
        match reference {
            SourceReference::None => None,
            SourceReference::Camera(i) => self.cameras.get(i).map(ResolvedSource::Camera),
            SourceReference::Pipeline(i) => self.pipelines.get(i).map(ResolvedSource::Pipeline),
        }
    }

    // ── Kind-keyed queries ───────────────────────────────────────────

    /// Position of the first entity named `name`, `None` on a miss.
    pub fn find_index(&self, kind: EntityKind, name: &str) -> Option<usize> {
        with_collection!(self, kind, |c| c.find_index(name))
    }

    pub fn names(&self, kind: EntityKind) -> Vec<String> {
        with_collection!(self, kind, |c| c.names())
    }

    pub fn len(&self, kind: EntityKind) -> usize {
        with_collection!(self, kind, |c| c.len())
    }

    pub fn is_empty(&self, kind: EntityKind) -> bool {
        self.len(kind) == 0
    }

    pub fn generation(&self, kind: EntityKind) -> u64 {
        with_collection!(self, kind, |c| c.generation())
    }

    /// Receiver that changes once per published rebuild of `kind`.
    pub fn watch_generation(&self, kind: EntityKind) -> watch::Receiver<u64> {
        with_collection!(self, kind, |c| c.watch_generation())
    }

    pub fn last_rebuild(&self, kind: EntityKind) -> Option<DateTime<Utc>> {
        with_collection!(self, kind, |c| c.last_rebuild())
    }

    /// Compare the cached length with the count the server advertises.
    ///
    /// A heuristic: the two are written independently and may disagree
    /// briefly. Kinds without an advertised count are always fresh.
    pub fn is_fresh(&self, kind: EntityKind) -> bool {
        let Some(key) = advertised_count_key(kind) else {
            return true;
        };
        let advertised = self.tables.get_int(&self.config.root_path(), key, 0);
        usize::try_from(advertised).is_ok_and(|n| n == self.len(kind))
    }
}

/// Root key holding the server's own count for `kind`, if it has one.
pub(crate) fn advertised_count_key(kind: EntityKind) -> Option<&'static str> {
    match kind {
        EntityKind::Camera => Some(keys::CAMERAS_AVAILABLE),
        EntityKind::Pipeline => Some(keys::PIPELINES_AVAILABLE),
        EntityKind::Stream | EntityKind::Target => None,
    }
}
