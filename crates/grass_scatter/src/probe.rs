//! Surface queries used to drop candidate samples onto the ground.
//!
//! The host engine normally provides the [`SurfaceProbe`] (a physics raycast
//! against a terrain collider). [`PlaneProbe`] and [`HeightFnProbe`] cover
//! tests, benchmarks and previews, and `()` is a surface that never hits.
use glam::{Vec2, Vec3};

/// Nearest intersection returned by a probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    pub point: Vec3,
    /// Unit surface normal at `point`.
    pub normal: Vec3,
}

impl SurfaceHit {
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self { point, normal }
    }
}

/// Ray query against a surface.
pub trait SurfaceProbe {
    /// Cast a ray from `origin` along the unit `direction`, returning the
    /// nearest hit within `max_distance`, or `None` on a miss.
    fn probe(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<SurfaceHit>;
}

/// A surface that is never hit.
impl SurfaceProbe for () {
    #[inline]
    fn probe(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32) -> Option<SurfaceHit> {
        None
    }
}

impl<P: SurfaceProbe + ?Sized> SurfaceProbe for &P {
    #[inline]
    fn probe(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<SurfaceHit> {
        (**self).probe(origin, direction, max_distance)
    }
}

/// Infinite plane through `point` with the given `normal`.
#[derive(Debug, Clone, Copy)]
pub struct PlaneProbe {
    pub point: Vec3,
    pub normal: Vec3,
}

impl PlaneProbe {
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self {
            point,
            normal: normal.normalize_or_zero(),
        }
    }

    /// Horizontal ground plane at height `y`.
    pub fn horizontal(y: f32) -> Self {
        Self::new(Vec3::new(0.0, y, 0.0), Vec3::Y)
    }
}

impl SurfaceProbe for PlaneProbe {
    fn probe(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<SurfaceHit> {
        let denom = self.normal.dot(direction);
        if denom.abs() <= f32::EPSILON {
            return None;
        }
        let t = self.normal.dot(self.point - origin) / denom;
        if !(0.0..=max_distance).contains(&t) {
            return None;
        }
        // Report the side facing the ray.
        let normal = if denom > 0.0 {
            -self.normal
        } else {
            self.normal
        };
        Some(SurfaceHit::new(origin + direction * t, normal))
    }
}

/// Heightfield surface `y = height(x, z)`, optionally limited to a
/// rectangular footprint. Only rays with a downward component are answered.
pub struct HeightFnProbe<F>
where
    F: Fn(f32, f32) -> f32,
{
    height: F,
    footprint: Option<(Vec2, Vec2)>,
    normal_eps: f32,
}

impl<F> HeightFnProbe<F>
where
    F: Fn(f32, f32) -> f32,
{
    pub fn new(height: F) -> Self {
        Self {
            height,
            footprint: None,
            normal_eps: 0.05,
        }
    }

    /// Restrict the surface to `min..=max` on the XZ plane; rays outside miss.
    pub fn with_footprint(mut self, min: Vec2, max: Vec2) -> Self {
        self.footprint = Some((min, max));
        self
    }

    /// Step used for the central-difference normal estimate.
    pub fn with_normal_eps(mut self, eps: f32) -> Self {
        self.normal_eps = eps.max(1e-4);
        self
    }

    #[inline]
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        (self.height)(x, z)
    }

    pub fn normal_at(&self, x: f32, z: f32) -> Vec3 {
        let e = self.normal_eps;
        let dx = self.height_at(x + e, z) - self.height_at(x - e, z);
        let dz = self.height_at(x, z + e) - self.height_at(x, z - e);
        Vec3::new(-dx, 2.0 * e, -dz).normalize_or_zero()
    }

    fn in_footprint(&self, x: f32, z: f32) -> bool {
        match self.footprint {
            Some((min, max)) => x >= min.x && x <= max.x && z >= min.y && z <= max.y,
            None => true,
        }
    }
}

impl<F> SurfaceProbe for HeightFnProbe<F>
where
    F: Fn(f32, f32) -> f32,
{
    fn probe(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<SurfaceHit> {
        if direction.y >= 0.0 {
            return None;
        }
        // Vertical rays are the common case; slanted ones march along the ray.
        if direction.x == 0.0 && direction.z == 0.0 {
            if !self.in_footprint(origin.x, origin.z) {
                return None;
            }
            let h = self.height_at(origin.x, origin.z);
            let t = (origin.y - h) / -direction.y;
            if !(0.0..=max_distance).contains(&t) {
                return None;
            }
            let point = Vec3::new(origin.x, h, origin.z);
            return Some(SurfaceHit::new(point, self.normal_at(point.x, point.z)));
        }

        const STEPS: usize = 256;
        let step = max_distance / STEPS as f32;
        let mut prev_t = 0.0;
        for i in 1..=STEPS {
            let t = i as f32 * step;
            let p = origin + direction * t;
            if self.in_footprint(p.x, p.z) && p.y <= self.height_at(p.x, p.z) {
                let mut lo = prev_t;
                let mut hi = t;
                for _ in 0..16 {
                    let mid = 0.5 * (lo + hi);
                    let q = origin + direction * mid;
                    if q.y <= self.height_at(q.x, q.z) {
                        hi = mid;
                    } else {
                        lo = mid;
                    }
                }
                let q = origin + direction * hi;
                let point = Vec3::new(q.x, self.height_at(q.x, q.z), q.z);
                return Some(SurfaceHit::new(point, self.normal_at(q.x, q.z)));
            }
            prev_t = t;
        }
        None
    }
}
