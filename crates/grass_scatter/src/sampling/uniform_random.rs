//! Independent random draws over the placement area.
use mint::Vector2;
use rand::Rng;

use crate::sampling::{rand_range, PositionSampling};

/// Draws `count` positions, each axis uniformly over `[-half, half]` of the
/// area's extent.
///
/// No spacing is enforced between draws, so tufts may overlap. Per sample
/// the x coordinate is drawn before the y coordinate, which keeps a seeded
/// run reproducible.
#[derive(Debug, Clone)]
pub struct UniformRandomSampling {
    pub count: usize,
}

impl UniformRandomSampling {
    pub fn new(count: usize) -> Self {
        Self { count }
    }
}

impl PositionSampling for UniformRandomSampling {
    fn generate(&self, domain_extent: Vector2<f32>, rng: &mut dyn Rng) -> Vec<Vector2<f32>> {
        let count = self.expected_count(domain_extent);
        let half = Vector2 {
            x: domain_extent.x * 0.5,
            y: domain_extent.y * 0.5,
        };

        (0..count)
            .map(|_| {
                let x = rand_range(rng, -half.x, half.x);
                let y = rand_range(rng, -half.y, half.y);
                Vector2 { x, y }
            })
            .collect()
    }

    fn expected_count(&self, domain_extent: Vector2<f32>) -> usize {
        if domain_extent.x > 0.0 && domain_extent.y > 0.0 {
            self.count
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::sampling::tests::FixedRng;

    #[test]
    fn nothing_drawn_without_count_or_area() {
        let mut rng = StdRng::seed_from_u64(1);

        let none = UniformRandomSampling::new(0);
        assert!(none.generate(Vec2::new(10.0, 10.0).into(), &mut rng).is_empty());

        let ten = UniformRandomSampling::new(10);
        assert!(ten.generate(Vec2::new(0.0, 10.0).into(), &mut rng).is_empty());
        assert!(ten.generate(Vec2::new(-5.0, 2.0).into(), &mut rng).is_empty());
        assert_eq!(ten.expected_count(Vec2::new(0.0, 10.0).into()), 0);
    }

    #[test]
    fn draws_stay_inside_half_extents() {
        let mut rng = StdRng::seed_from_u64(42);
        let sampler = UniformRandomSampling::new(500);
        let pts = sampler.generate(Vec2::new(8.0, 6.0).into(), &mut rng);
        assert_eq!(pts.len(), 500);
        assert_eq!(sampler.expected_count(Vec2::new(8.0, 6.0).into()), 500);

        for p in &pts {
            assert!((-4.0..=4.0).contains(&p.x), "x = {}", p.x);
            assert!((-3.0..=3.0).contains(&p.y), "y = {}", p.y);
        }
        // Both halves of each axis get used.
        assert!(pts.iter().any(|p| p.x < 0.0) && pts.iter().any(|p| p.x > 0.0));
        assert!(pts.iter().any(|p| p.y < 0.0) && pts.iter().any(|p| p.y > 0.0));
    }

    #[test]
    fn zero_draws_land_on_the_low_corner() {
        let mut rng = FixedRng { value: 0 };
        let pts = UniformRandomSampling::new(2).generate(Vec2::new(20.0, 4.0).into(), &mut rng);
        assert_eq!(pts, vec![Vector2 { x: -10.0, y: -2.0 }; 2]);
    }

    #[test]
    fn same_seed_same_draws() {
        let sampler = UniformRandomSampling::new(32);

        let mut rng_a = StdRng::seed_from_u64(123);
        let mut rng_b = StdRng::seed_from_u64(123);
        let pa = sampler.generate(Vec2::new(10.0, 10.0).into(), &mut rng_a);
        let pb = sampler.generate(Vec2::new(10.0, 10.0).into(), &mut rng_b);
        assert_eq!(pa, pb);

        let mut rng_c = StdRng::seed_from_u64(456);
        let pc = sampler.generate(Vec2::new(10.0, 10.0).into(), &mut rng_c);
        assert_ne!(pa, pc);
    }
}
