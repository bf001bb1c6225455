use glam::Vec2;
use grass_scatter::prelude::*;
use grass_scatter_examples::{
    init_tracing, render_placements_to_png, rolling_hills, tuft_prefab, RenderConfig,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // 4 x 4 patches of 10 units, 12 x 12 samples per patch.
    let layout = Layout::patches(4, 10.0, 12);
    let prefab = tuft_prefab("tuft");
    let probe = HeightFnProbe::new(rolling_hills);

    let config = ScatterConfig::new(layout).with_strategy(OutputStrategy::MeshMerge {
        lod_cutoff: Some(0.02),
    });
    let runner = ScatterRunner::try_new(config, &prefab, &probe)?;

    let mut sink = RecordingSink::new();
    let mut events = VecSink::only(&[ScatterEventKind::InstancePlaced]);
    let mut rng = StdRng::seed_from_u64(7);
    let result = runner.run_with_events(&mut rng, &mut sink, &mut events);

    for artifact in &result.artifacts {
        if let ArtifactOutput::Merged {
            vertex_count,
            triangle_count,
            ..
        } = artifact.output
        {
            println!(
                "{}: {} instances, {} vertices, {} triangles",
                artifact.scope.label(),
                artifact.instance_count,
                vertex_count,
                triangle_count
            );
        }
    }

    let Some(grid) = layout.patch_grid() else {
        anyhow::bail!("patch layout has no grid");
    };
    let extent = Vec2::splat(grid.total_size());
    let rc = RenderConfig::new((800, 800), extent)
        .with_grid(grid, [60, 60, 70])
        .with_height_range(-4.0, 4.0);
    render_placements_to_png(events.placements(), &rc, "patches-grid-mesh-merge.png")?;

    Ok(())
}
