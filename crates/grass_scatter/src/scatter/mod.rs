//! Scatter pipeline: configure a request, lay out patches, resolve probe
//! results into placements and feed them to the selected output strategy.
pub mod config;
pub mod events;
pub mod patch;
pub mod placement;
pub mod prefab;
pub mod runner;

/// Probe height used by patch layouts unless configured otherwise.
pub const DEFAULT_PROBE_HEIGHT: f32 = 10_000.0;

/// Maximum random tilt about the local X axis, in degrees.
pub const DEFAULT_MAX_TILT_DEG: f32 = 30.0;

/// Maximum random yaw about the local Y axis, in degrees.
pub const DEFAULT_MAX_YAW_DEG: f32 = 360.0;
