//! Sampling strategies for generating candidate positions in a 2D domain.
//!
//! Positions are expressed in the domain's local frame, centered on the
//! origin, with `x` along the frame's right axis and `y` along its forward
//! (world Z) axis. The scatter runner lifts them into 3D probe origins.
use mint::Vector2;
use rand::Rng;

pub mod grid;
pub mod uniform_random;

pub use grid::GridSampling;
pub use uniform_random::UniformRandomSampling;

/// Trait for position sampling.
pub trait PositionSampling: Send + Sync {
    fn generate(&self, domain_extent: Vector2<f32>, rng: &mut dyn Rng) -> Vec<Vector2<f32>>;

    /// Number of positions [`PositionSampling::generate`] returns for this extent.
    fn expected_count(&self, domain_extent: Vector2<f32>) -> usize;
}

/// Uniform float in `[0, 1)` built from the top 24 bits of one draw.
#[inline]
pub(crate) fn rand01(rng: &mut dyn Rng) -> f32 {
    (rng.next_u32() >> 8) as f32 * (1.0 / 16_777_216.0)
}

/// Uniform float between `lo` and `hi`. Returns `lo` when the range is empty.
///
/// The upper end can be reached through rounding for wide ranges, the same
/// way an inclusive engine range behaves.
#[inline]
pub(crate) fn rand_range(rng: &mut dyn Rng, lo: f32, hi: f32) -> f32 {
    if hi <= lo {
        return lo;
    }
    lo + rand01(rng) * (hi - lo)
}
