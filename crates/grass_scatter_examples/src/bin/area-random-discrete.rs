use glam::{Vec2, Vec3};
use grass_scatter::prelude::*;
use grass_scatter_examples::{
    init_tracing, render_placements_to_png, rolling_hills, tuft_prefab, RenderConfig,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // A 60 x 60 box, 20 units tall, over rolling terrain.
    let size = Vec3::new(60.0, 20.0, 60.0);
    let prefab = tuft_prefab("tuft");
    let probe = HeightFnProbe::new(rolling_hills);

    let config =
        ScatterConfig::new(Layout::area(2_000, size)).with_strategy(OutputStrategy::Discrete);
    let runner = ScatterRunner::try_new(config, &prefab, &probe)?;

    let mut sink = RecordingSink::new();
    let mut events = VecSink::only(&[ScatterEventKind::InstancePlaced]);
    let mut rng = StdRng::seed_from_u64(2025);
    let result = runner.run_with_events(&mut rng, &mut sink, &mut events);

    println!(
        "placed {} objects under {} root(s)",
        result.instances_placed,
        sink.objects().iter().filter(|o| o.parent.is_none()).count()
    );

    let rc =
        RenderConfig::new((800, 800), Vec2::new(size.x, size.z)).with_height_range(-4.0, 4.0);
    render_placements_to_png(events.placements(), &rc, "area-random-discrete.png")?;

    Ok(())
}
