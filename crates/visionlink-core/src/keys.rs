// ── Root table keys ──
//
// Entries the vision server publishes directly under its root table.
// Per-entity keys live next to their descriptor in `model`.

pub const CAMERAS_AVAILABLE: &str = "Cameras Available";
pub const CAMERA_INDEX: &str = "Camera Index";
pub const PIPELINES_AVAILABLE: &str = "Pipelines Available";
pub const PIPELINE_INDEX: &str = "Pipeline Index";
pub const ACTIVE_TARGET: &str = "Active Target";
pub const SHOW_STATISTICS: &str = "Show Statistics";
pub const ENABLE_PROCESSING: &str = "Enable Processing";

/// Value of [`ACTIVE_TARGET`] when nothing is being tracked.
pub const NO_TARGET: &str = "none";
