//! Turning a probe origin into a placement.
use glam::{Mat4, Quat, Vec3};
use rand::Rng;

use crate::geometry::{surface_rotation, Transform};
use crate::probe::SurfaceProbe;
use crate::sampling::rand_range;
use crate::scatter::config::{MissPolicy, OrientationJitter};

/// A resolved instance transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// World position.
    pub position: Vec3,
    /// World rotation.
    pub rotation: Quat,
    pub scale: Vec3,
    /// `true` when the probe hit the surface, `false` for a miss fallback.
    pub grounded: bool,
}

impl Placement {
    #[inline]
    pub fn to_transform(&self) -> Transform {
        Transform::new(self.position, self.rotation, self.scale)
    }

    #[inline]
    pub fn to_matrix(&self) -> Mat4 {
        self.to_transform().to_matrix()
    }
}

/// Result of resolving one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProbeOutcome {
    Hit(Placement),
    /// The probe missed and [`MissPolicy::Fallback`] produced a placement.
    Fallback(Placement),
    /// The probe missed and [`MissPolicy::Skip`] dropped the sample.
    Skipped,
}

impl ProbeOutcome {
    pub fn placement(self) -> Option<Placement> {
        match self {
            ProbeOutcome::Hit(p) | ProbeOutcome::Fallback(p) => Some(p),
            ProbeOutcome::Skipped => None,
        }
    }

    pub fn is_miss(&self) -> bool {
        !matches!(self, ProbeOutcome::Hit(_))
    }
}

/// Probes the surface below a sample and builds the placement.
pub struct PlacementResolver<'a> {
    probe: &'a dyn SurfaceProbe,
    direction: Vec3,
    max_distance: f32,
    orientation: OrientationJitter,
    miss_policy: MissPolicy,
    scale: Vec3,
}

impl<'a> PlacementResolver<'a> {
    /// `direction` is normalized; `max_distance` bounds every probe.
    pub fn new(
        probe: &'a dyn SurfaceProbe,
        direction: Vec3,
        max_distance: f32,
        orientation: OrientationJitter,
        miss_policy: MissPolicy,
        scale: Vec3,
    ) -> Self {
        Self {
            probe,
            direction: direction.normalize_or_zero(),
            max_distance,
            orientation,
            miss_policy,
            scale,
        }
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    /// Where a missed probe from `origin` places its fallback instance.
    #[inline]
    pub fn fallback_position(&self, origin: Vec3) -> Vec3 {
        origin + self.direction * (self.max_distance * 0.5)
    }

    /// Probe from `origin`. Hits consume two random draws (tilt, then yaw);
    /// misses consume none.
    pub fn resolve(&self, origin: Vec3, rng: &mut dyn Rng) -> ProbeOutcome {
        match self.probe.probe(origin, self.direction, self.max_distance) {
            Some(hit) => {
                let tilt = rand_range(rng, 0.0, self.orientation.max_tilt_deg);
                let yaw = rand_range(rng, 0.0, self.orientation.max_yaw_deg);
                ProbeOutcome::Hit(Placement {
                    position: hit.point,
                    rotation: surface_rotation(hit.normal, yaw, tilt),
                    scale: self.scale,
                    grounded: true,
                })
            }
            None => match self.miss_policy {
                MissPolicy::Fallback => ProbeOutcome::Fallback(Placement {
                    position: self.fallback_position(origin),
                    rotation: Quat::IDENTITY,
                    scale: self.scale,
                    grounded: false,
                }),
                MissPolicy::Skip => ProbeOutcome::Skipped,
            },
        }
    }
}
