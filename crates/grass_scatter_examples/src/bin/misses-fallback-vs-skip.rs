use glam::{Vec2, Vec3};
use grass_scatter::prelude::*;
use grass_scatter_examples::{
    init_tracing, render_placements_to_png, rolling_hills, tuft_prefab, RenderConfig,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Terrain only covers a square in the middle; probes outside it miss.
    let size = Vec3::new(50.0, 20.0, 50.0);
    let prefab = tuft_prefab("tuft");
    let probe = HeightFnProbe::new(rolling_hills)
        .with_footprint(Vec2::splat(-15.0), Vec2::splat(15.0));

    for (policy, out) in [
        (MissPolicy::Fallback, "misses-fallback.png"),
        (MissPolicy::Skip, "misses-skip.png"),
    ] {
        let config = ScatterConfig::new(Layout::area(1_500, size))
            .with_miss_policy(policy)
            .with_strategy(OutputStrategy::Discrete);
        let runner = ScatterRunner::try_new(config, &prefab, &probe)?;

        let mut sink = RecordingSink::new();
        let mut events = VecSink::only(&[ScatterEventKind::InstancePlaced]);
        let mut rng = StdRng::seed_from_u64(99);
        let result = runner.run_with_events(&mut rng, &mut sink, &mut events);
        println!(
            "{policy:?}: probed {}, missed {}, skipped {}, placed {}",
            result.samples_probed,
            result.probe_misses,
            result.samples_skipped,
            result.instances_placed
        );

        let rc = RenderConfig::new((600, 600), Vec2::new(size.x, size.z))
            .with_height_range(-4.0, 4.0);
        render_placements_to_png(events.placements(), &rc, out)?;
    }

    Ok(())
}
