//! Fixtures shared by the sampling and scatter benches.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use criterion::{Criterion, Throughput};
use grass_scatter::prelude::{Mesh, Prefab};

/// Short runs: a full scatter pass is already milliseconds long.
pub fn scatter_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(15)
        .warm_up_time(Duration::from_millis(500))
        .measurement_time(Duration::from_secs(3))
}

/// Throughput in placements (or candidate positions) per iteration.
pub fn per_placement(count: usize) -> Throughput {
    Throughput::Elements(count.max(1) as u64)
}

pub fn rolling_hills(x: f32, z: f32) -> f32 {
    (x * 0.05).sin() * 3.0 + (z * 0.08).cos() * 2.0
}

pub fn tuft_prefab() -> Prefab {
    Prefab::new("tuft", Arc::new(Mesh::crossed_quads(0.4, 0.8)), "grass")
}
