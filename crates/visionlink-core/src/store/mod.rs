// ── Mirror cache ──
//
// Per-kind snapshots of the remote child tables, rebuilt wholesale on
// every child-created notification.

mod collection;
mod mirror_cache;
mod rebuild;

pub use mirror_cache::{MirrorCache, Mirrored, ResolvedSource};
