use std::sync::Arc;

use grass_scatter::prelude::{Mesh, Prefab};

/// Smooth heightfield used by the examples.
pub fn rolling_hills(x: f32, z: f32) -> f32 {
    (x * 0.11).sin() * 1.5 + (z * 0.07).cos() * 2.0 + (x * 0.03 + z * 0.05).sin() * 0.75
}

/// A crossed-quad grass tuft.
pub fn tuft_prefab(name: &str) -> Prefab {
    Prefab::new(name, Arc::new(Mesh::crossed_quads(0.4, 0.8)), "grass_blades")
}
