//! Placement request configuration.
use glam::{Quat, Vec2, Vec3};

use crate::batch::OutputStrategy;
use crate::error::{Error, Result};
use crate::scatter::patch::PatchGrid;
use crate::scatter::{DEFAULT_MAX_TILT_DEG, DEFAULT_MAX_YAW_DEG, DEFAULT_PROBE_HEIGHT};

/// Placement frame of the host object. Samples are laid out in its local XZ
/// plane and probes travel along its local down axis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    pub origin: Vec3,
    pub rotation: Quat,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Frame {
    pub fn new(origin: Vec3, rotation: Quat) -> Self {
        Self { origin, rotation }
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    #[inline]
    pub fn down(&self) -> Vec3 {
        -self.up()
    }

    /// World position of a local point.
    #[inline]
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.origin + self.rotation * local
    }
}

/// Where candidate samples come from.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Layout {
    /// `quantity` uniform random samples inside a box, batched as one scope.
    ///
    /// Probes start at the top of the box and travel its full height.
    Area {
        quantity: usize,
        /// Box center in the frame's local space.
        center: Vec3,
        /// Box size; `y` is the vertical extent.
        size: Vec3,
    },
    /// A centered grid of square patches, each sampled on a regular
    /// `instances_per_patch` grid and batched as its own scope.
    ///
    /// Probes start `probe_height` above the frame and travel twice that.
    Patches {
        patch_resolution: u32,
        patch_size: f32,
        instances_per_patch: usize,
        probe_height: f32,
    },
}

impl Layout {
    pub fn area(quantity: usize, size: Vec3) -> Self {
        Layout::Area {
            quantity,
            center: Vec3::ZERO,
            size,
        }
    }

    pub fn patches(patch_resolution: u32, patch_size: f32, instances_per_patch: usize) -> Self {
        Layout::Patches {
            patch_resolution,
            patch_size,
            instances_per_patch,
            probe_height: DEFAULT_PROBE_HEIGHT,
        }
    }

    /// Distance from the sampling plane up to the probe origins.
    pub fn probe_height(&self) -> f32 {
        match *self {
            Layout::Area { size, .. } => size.y * 0.5,
            Layout::Patches { probe_height, .. } => probe_height,
        }
    }

    /// Maximum probe distance: twice the probe height.
    pub fn probe_distance(&self) -> f32 {
        self.probe_height() * 2.0
    }

    /// Horizontal extent sampled per scope.
    pub fn scope_extent(&self) -> Vec2 {
        match *self {
            Layout::Area { size, .. } => Vec2::new(size.x, size.z),
            Layout::Patches { patch_size, .. } => Vec2::splat(patch_size),
        }
    }

    pub fn patch_grid(&self) -> Option<PatchGrid> {
        match *self {
            Layout::Patches {
                patch_resolution,
                patch_size,
                ..
            } => Some(PatchGrid::new(patch_resolution, patch_size)),
            Layout::Area { .. } => None,
        }
    }

    /// Total samples the layout produces, saturating at `usize::MAX`.
    pub fn expected_samples(&self) -> usize {
        self.checked_samples().unwrap_or(usize::MAX)
    }

    /// Total samples, or `None` when the count does not fit in `usize`.
    pub fn checked_samples(&self) -> Option<usize> {
        match *self {
            Layout::Area { quantity, size, .. } => {
                Some(if size.x > 0.0 && size.z > 0.0 { quantity } else { 0 })
            }
            Layout::Patches {
                patch_resolution,
                patch_size,
                instances_per_patch,
                ..
            } => {
                if !(patch_size > 0.0) {
                    return Some(0);
                }
                let p = usize::try_from(patch_resolution).ok()?;
                p.checked_mul(p)?
                    .checked_mul(instances_per_patch)?
                    .checked_mul(instances_per_patch)
            }
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Layout::patches(10, 10.0, 100)
    }
}

/// Random rotation applied on top of the surface alignment, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrientationJitter {
    /// Tilt about the local X axis, drawn uniformly between 0 and this value.
    pub max_tilt_deg: f32,
    /// Yaw about the local Y axis, drawn uniformly between 0 and this value.
    pub max_yaw_deg: f32,
}

impl Default for OrientationJitter {
    fn default() -> Self {
        Self {
            max_tilt_deg: DEFAULT_MAX_TILT_DEG,
            max_yaw_deg: DEFAULT_MAX_YAW_DEG,
        }
    }
}

impl OrientationJitter {
    pub const NONE: Self = Self {
        max_tilt_deg: 0.0,
        max_yaw_deg: 0.0,
    };

    pub fn new(max_tilt_deg: f32, max_yaw_deg: f32) -> Self {
        Self {
            max_tilt_deg,
            max_yaw_deg,
        }
    }
}

/// What happens when a probe finds no surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MissPolicy {
    /// Place an unrotated instance halfway along the probe.
    #[default]
    Fallback,
    /// Drop the sample.
    Skip,
}

/// Scale assigned to every placement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScaleSource {
    /// The prefab's authored scale.
    #[default]
    Prefab,
    Fixed(Vec3),
}

impl ScaleSource {
    pub fn resolve(&self, prefab_scale: Vec3) -> Vec3 {
        match *self {
            ScaleSource::Prefab => prefab_scale,
            ScaleSource::Fixed(scale) => scale,
        }
    }
}

/// Configuration for a placement run.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScatterConfig {
    /// Host frame the layout is expressed in.
    pub frame: Frame,
    pub layout: Layout,
    pub orientation: OrientationJitter,
    pub miss_policy: MissPolicy,
    pub scale: ScaleSource,
    pub strategy: OutputStrategy,
}

impl ScatterConfig {
    /// Creates a new [`ScatterConfig`] with the given layout and defaults elsewhere.
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            ..Default::default()
        }
    }

    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.frame = frame;
        self
    }

    pub fn with_orientation(mut self, orientation: OrientationJitter) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_miss_policy(mut self, miss_policy: MissPolicy) -> Self {
        self.miss_policy = miss_policy;
        self
    }

    pub fn with_scale(mut self, scale: ScaleSource) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_strategy(mut self, strategy: OutputStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(Error::InvalidConfig(msg.into()));

        if !self.frame.origin.is_finite() || !self.frame.rotation.is_finite() {
            return invalid("frame must be finite");
        }
        if !self.frame.rotation.is_normalized() {
            return invalid("frame rotation must be a unit quaternion");
        }

        match self.layout {
            Layout::Area {
                quantity,
                center,
                size,
            } => {
                if quantity == 0 {
                    return invalid("quantity must be > 0");
                }
                if !center.is_finite() || !size.is_finite() {
                    return invalid("area bounds must be finite");
                }
                if size.x <= 0.0 || size.y <= 0.0 || size.z <= 0.0 {
                    return invalid("area size must be > 0 in all components");
                }
            }
            Layout::Patches {
                patch_resolution,
                patch_size,
                instances_per_patch,
                probe_height,
            } => {
                if patch_resolution == 0 {
                    return invalid("patch_resolution must be > 0");
                }
                if instances_per_patch == 0 {
                    return invalid("instances_per_patch must be > 0");
                }
                if !(patch_size.is_finite() && patch_size > 0.0) {
                    return invalid("patch_size must be > 0");
                }
                if !(probe_height.is_finite() && probe_height > 0.0) {
                    return invalid("probe_height must be > 0");
                }
            }
        }
        if self.layout.checked_samples().is_none() {
            return invalid("sample count overflows usize");
        }

        let OrientationJitter {
            max_tilt_deg,
            max_yaw_deg,
        } = self.orientation;
        if !(max_tilt_deg.is_finite() && max_tilt_deg >= 0.0)
            || !(max_yaw_deg.is_finite() && max_yaw_deg >= 0.0)
        {
            return invalid("orientation jitter must be finite and >= 0");
        }

        if let ScaleSource::Fixed(scale) = self.scale {
            if !scale.is_finite() {
                return invalid("fixed scale must be finite");
            }
        }

        if let OutputStrategy::MeshMerge {
            lod_cutoff: Some(cutoff),
        } = self.strategy
        {
            if !(cutoff > 0.0 && cutoff <= 1.0) {
                return invalid("lod_cutoff must be in (0, 1]");
            }
        }

        Ok(())
    }
}
