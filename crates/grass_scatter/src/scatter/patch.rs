//! Patch grid layout for the tiled variant.
//!
//! A `resolution x resolution` grid of square patches of side `patch_size`
//! is centered on the host origin. Coordinates here are in the host frame's
//! local XZ plane.
use glam::Vec2;

/// Index of a patch within a [`PatchGrid`], `(x, z)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatchId(pub u32, pub u32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatchGrid {
    pub resolution: u32,
    pub patch_size: f32,
}

impl PatchGrid {
    pub fn new(resolution: u32, patch_size: f32) -> Self {
        Self {
            resolution,
            patch_size,
        }
    }

    /// Side length of the whole tiled area.
    pub fn total_size(&self) -> f32 {
        self.resolution as f32 * self.patch_size
    }

    /// Bottom-left corner of the whole area.
    pub fn bottom_corner(&self) -> Vec2 {
        Vec2::splat(self.total_size() * -0.5)
    }

    pub fn patch_count(&self) -> usize {
        (self.resolution as usize) * (self.resolution as usize)
    }

    /// Bottom-left corner of a patch.
    pub fn patch_origin(&self, id: PatchId) -> Vec2 {
        self.bottom_corner() + Vec2::new(id.0 as f32, id.1 as f32) * self.patch_size
    }

    pub fn patch_center(&self, id: PatchId) -> Vec2 {
        self.patch_origin(id) + Vec2::splat(self.patch_size * 0.5)
    }

    /// `(min, max)` corners of a patch.
    pub fn patch_bounds(&self, id: PatchId) -> (Vec2, Vec2) {
        let min = self.patch_origin(id);
        (min, min + Vec2::splat(self.patch_size))
    }

    /// All patch ids, outer `x` then inner `z`, both ascending.
    pub fn ids(&self) -> impl Iterator<Item = PatchId> {
        let n = self.resolution;
        (0..n).flat_map(move |x| (0..n).map(move |z| PatchId(x, z)))
    }

    /// Patch containing a local position, if any. Upper edges belong to the next patch.
    pub fn patch_for_position(&self, position: Vec2) -> Option<PatchId> {
        if self.resolution == 0 || self.patch_size <= 0.0 {
            return None;
        }
        let rel = (position - self.bottom_corner()) / self.patch_size;
        if rel.x < 0.0 || rel.y < 0.0 {
            return None;
        }
        let (ix, iz) = (rel.x.floor() as u32, rel.y.floor() as u32);
        if ix >= self.resolution || iz >= self.resolution {
            return None;
        }
        Some(PatchId(ix, iz))
    }
}

/// Creates a deterministic seed for a patch from a base seed.
///
/// Seeding each patch independently makes its output independent of the
/// order patches are generated in.
pub fn seed_for_patch(base_seed: u64, patch: PatchId) -> u64 {
    let px = patch.0 as u64;
    let pz = patch.1 as u64;
    let mixed =
        base_seed ^ px.wrapping_mul(0x9E3779B97F4A7C15) ^ pz.wrapping_mul(0xBF58476D1CE4E5B9);
    mix_u64(mixed)
}

#[inline]
fn mix_u64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58476D1CE4E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn single_patch_is_centered() {
        let grid = PatchGrid::new(1, 10.0);
        assert_eq!(grid.bottom_corner(), Vec2::new(-5.0, -5.0));
        assert_eq!(grid.patch_center(PatchId(0, 0)), Vec2::ZERO);
    }

    #[test]
    fn patch_origins_tile_the_area() {
        let grid = PatchGrid::new(3, 4.0);
        assert_eq!(grid.total_size(), 12.0);
        assert_eq!(grid.patch_origin(PatchId(0, 0)), Vec2::new(-6.0, -6.0));
        assert_eq!(grid.patch_origin(PatchId(2, 1)), Vec2::new(2.0, -2.0));
        let (min, max) = grid.patch_bounds(PatchId(1, 1));
        assert_eq!(min, Vec2::new(-2.0, -2.0));
        assert_eq!(max, Vec2::new(2.0, 2.0));
    }

    #[test]
    fn ids_iterate_outer_x_inner_z() {
        let grid = PatchGrid::new(2, 1.0);
        let ids: Vec<_> = grid.ids().collect();
        assert_eq!(
            ids,
            vec![PatchId(0, 0), PatchId(0, 1), PatchId(1, 0), PatchId(1, 1)]
        );
        assert_eq!(grid.patch_count(), 4);
        assert_eq!(PatchGrid::new(0, 1.0).ids().count(), 0);
    }

    #[test]
    fn position_lookup_inverts_origin() {
        let grid = PatchGrid::new(4, 2.5);
        for id in grid.ids() {
            let inside = grid.patch_center(id);
            assert_eq!(grid.patch_for_position(inside), Some(id));
        }
        assert_eq!(grid.patch_for_position(Vec2::new(-100.0, 0.0)), None);
        assert_eq!(grid.patch_for_position(Vec2::new(5.0, 0.0)), None);
    }

    #[test]
    fn patch_seeds_are_distinct_and_stable() {
        let grid = PatchGrid::new(8, 1.0);
        let seeds: HashSet<u64> = grid.ids().map(|id| seed_for_patch(42, id)).collect();
        assert_eq!(seeds.len(), grid.patch_count());
        assert_eq!(
            seed_for_patch(42, PatchId(3, 4)),
            seed_for_patch(42, PatchId(3, 4))
        );
        assert_ne!(
            seed_for_patch(1, PatchId(3, 4)),
            seed_for_patch(2, PatchId(3, 4))
        );
    }
}
