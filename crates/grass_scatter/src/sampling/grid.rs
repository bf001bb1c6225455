//! Regular grid position sampling strategy.
use mint::Vector2;
use rand::Rng;

use crate::sampling::PositionSampling;

/// `resolution x resolution` samples with fixed spacing, starting at the
/// domain's bottom-left corner.
///
/// Spacing is `extent / resolution` per axis, so the first sample sits on the
/// corner and the last one a full step short of the opposite edge. Iteration
/// is outer `x`, inner `y`, both ascending. No randomness is consumed.
#[derive(Debug, Clone)]
pub struct GridSampling {
    /// Samples per axis.
    pub resolution: usize,
}

impl GridSampling {
    pub fn new(resolution: usize) -> Self {
        Self { resolution }
    }

    /// Distance between neighbouring samples for the given extent.
    pub fn spacing(&self, domain_extent: Vector2<f32>) -> Vector2<f32> {
        if self.resolution == 0 {
            return Vector2 { x: 0.0, y: 0.0 };
        }
        let n = self.resolution as f32;
        Vector2 {
            x: domain_extent.x / n,
            y: domain_extent.y / n,
        }
    }
}

impl PositionSampling for GridSampling {
    fn generate(&self, domain_extent: Vector2<f32>, _rng: &mut dyn Rng) -> Vec<Vector2<f32>> {
        let count = self.expected_count(domain_extent);
        if count == 0 {
            return Vec::new();
        }

        let spacing = self.spacing(domain_extent);
        let x0 = -domain_extent.x * 0.5;
        let y0 = -domain_extent.y * 0.5;

        let mut out = Vec::with_capacity(count);
        for i in 0..self.resolution {
            for j in 0..self.resolution {
                out.push(Vector2 {
                    x: x0 + i as f32 * spacing.x,
                    y: y0 + j as f32 * spacing.y,
                });
            }
        }
        out
    }

    /// `resolution²`, or zero when the extent is empty or the square does
    /// not fit in `usize`.
    fn expected_count(&self, domain_extent: Vector2<f32>) -> usize {
        if domain_extent.x <= 0.0 || domain_extent.y <= 0.0 {
            return 0;
        }
        self.resolution.checked_mul(self.resolution).unwrap_or(0)
    }
}
