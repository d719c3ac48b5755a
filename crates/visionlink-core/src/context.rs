// ── Vision context ──
//
// Lifecycle owner for one mirrored vision server: wires child-created
// listeners to cache rebuilds and exposes the root-level toggles.

use std::sync::{Arc, Weak};

use dashmap::DashMap;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::config::MirrorConfig;
use crate::keys;
use crate::model::{CameraPreset, EntityKind};
use crate::selection::SelectionController;
use crate::store::MirrorCache;
use crate::tables::{ChildCallback, ListenerId, RemoteTables, TablePath};
use crate::target::ActiveTarget;

// ── LinkState ────────────────────────────────────────────────────

/// Whether the vision server has been seen, observable by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum LinkState {
    /// No listeners registered.
    Disconnected,
    /// Listening, but the Cameras table has not been observed yet.
    Connecting,
    /// The Cameras table has been rebuilt at least once.
    Connected,
}

// ── VisionContext ────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ContextInner>`. The mirror cache is filled
/// only by child-created notifications: children that already exist are
/// delivered during [`init`](Self::init), later ones as they appear.
#[derive(Clone)]
pub struct VisionContext {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    cache: Arc<MirrorCache>,
    selection: SelectionController,
    target: ActiveTarget,
    link_state: watch::Sender<LinkState>,
    listeners: DashMap<ListenerId, EntityKind>,
}

impl VisionContext {
    /// Build the cache and start listening for every kind's child tables.
    pub fn init(tables: Arc<dyn RemoteTables>, config: MirrorConfig) -> Self {
        let cache = Arc::new(MirrorCache::new(tables, config));
        let (link_state, _) = watch::channel(LinkState::Connecting);

        let inner = Arc::new(ContextInner {
            selection: SelectionController::new(Arc::clone(&cache)),
            target: ActiveTarget::new(Arc::clone(&cache)),
            cache,
            link_state,
            listeners: DashMap::new(),
        });

        for kind in [
            EntityKind::Camera,
            EntityKind::Pipeline,
            EntityKind::Stream,
            EntityKind::Target,
        ] {
            let path = inner.cache.config().kind_path(kind);
            let callback = child_callback(Arc::downgrade(&inner), kind);
            let id = inner.cache.tables().on_child_created(&path, callback);
            inner.listeners.insert(id, kind);
        }

        let link = *inner.link_state.borrow();
        info!(
            root = %inner.cache.config().root_path(),
            cameras = inner.cache.len(EntityKind::Camera),
            pipelines = inner.cache.len(EntityKind::Pipeline),
            %link,
            "vision context initialized"
        );
        Self { inner }
    }

    /// Stop listening and mark the link down. Safe to call repeatedly.
    pub fn shutdown(&self) {
        let ids: Vec<ListenerId> = self.inner.listeners.iter().map(|e| *e.key()).collect();
        if ids.is_empty() {
            return;
        }
        for id in ids {
            self.inner.listeners.remove(&id);
            self.inner.cache.tables().remove_listener(id);
        }
        self.inner.link_state.send_replace(LinkState::Disconnected);
        info!("vision context shut down");
    }

    pub fn link_state(&self) -> watch::Receiver<LinkState> {
        self.inner.link_state.subscribe()
    }

    pub fn is_connected(&self) -> bool {
        *self.inner.link_state.borrow() == LinkState::Connected
    }

    pub fn cache(&self) -> &Arc<MirrorCache> {
        &self.inner.cache
    }

    pub fn config(&self) -> &MirrorConfig {
        self.inner.cache.config()
    }

    pub fn selection(&self) -> &SelectionController {
        &self.inner.selection
    }

    pub fn active_target(&self) -> &ActiveTarget {
        &self.inner.target
    }

    // ── Root toggles ─────────────────────────────────────────────

    pub fn is_showing_statistics(&self) -> bool {
        self.tables()
            .get_bool(&self.root(), keys::SHOW_STATISTICS, false)
    }

    pub fn set_statistics(&self, show: bool) -> bool {
        self.tables()
            .set_bool(&self.root(), keys::SHOW_STATISTICS, show)
    }

    pub fn toggle_statistics(&self) -> bool {
        self.set_statistics(!self.is_showing_statistics())
    }

    pub fn is_processing_enabled(&self) -> bool {
        self.tables()
            .get_bool(&self.root(), keys::ENABLE_PROCESSING, false)
    }

    /// No-op returning `false` unless the server publishes the key.
    pub fn set_processing_enabled(&self, enabled: bool) -> bool {
        let root = self.root();
        self.tables().contains_key(&root, keys::ENABLE_PROCESSING)
            && self
                .tables()
                .set_bool(&root, keys::ENABLE_PROCESSING, enabled)
    }

    pub fn toggle_processing_enabled(&self) -> bool {
        self.set_processing_enabled(!self.is_processing_enabled())
    }

    /// Apply `preset` to every cached camera. `false` if there are none or
    /// any camera rejected a write; the remaining cameras are still tried.
    pub fn apply_camera_preset(&self, preset: &CameraPreset) -> bool {
        let cameras = self.inner.cache.cameras();
        if cameras.is_empty() {
            return false;
        }
        cameras
            .iter()
            .fold(true, |ok, camera| camera.apply_preset(preset) && ok)
    }

    // ── Private helpers ──────────────────────────────────────────

    fn tables(&self) -> &Arc<dyn RemoteTables> {
        self.inner.cache.tables()
    }

    fn root(&self) -> TablePath {
        self.inner.cache.config().root_path()
    }
}

impl ContextInner {
    fn on_child_created(&self, kind: EntityKind, child: &str) {
        debug!(%kind, child, "child table created");
        self.cache.rebuild(kind);

        if kind == EntityKind::Camera {
            let linked = self.link_state.send_if_modified(|state| {
                if *state == LinkState::Connecting {
                    *state = LinkState::Connected;
                    return true;
                }
                false
            });
            if linked {
                info!("vision server link up");
            }
        }
    }
}

/// Listener that rebuilds `kind` for as long as the context is alive.
fn child_callback(inner: Weak<ContextInner>, kind: EntityKind) -> ChildCallback {
    Arc::new(move |_parent: &TablePath, child: &str| {
        if let Some(inner) = inner.upgrade() {
            inner.on_child_created(kind, child);
        }
    })
}
