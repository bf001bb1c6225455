use grass_scatter::prelude::*;
use grass_scatter_examples::{init_tracing, rolling_hills, tuft_prefab};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let prefab = tuft_prefab("tuft");
    let probe = HeightFnProbe::new(rolling_hills);
    let tag = StreamingTag::new(0x5EED_0000_0000_0001, 0);

    let config = ScatterConfig::new(Layout::patches(3, 10.0, 8)).with_strategy(
        OutputStrategy::InstancedEntity(EntityLayout::MergedPatch {
            streaming: Some(tag),
        }),
    );
    let runner = ScatterRunner::try_new(config, &prefab, &probe)?;

    // Per-patch seeding: every patch is reproducible on its own.
    let mut sink = RecordingSink::new();
    let mut events = FnSink::new(|event: ScatterEvent| {
        if let ScatterEvent::BatchFinalized { artifact } = event {
            println!(
                "{} -> {} instances",
                artifact.scope.label(),
                artifact.instance_count
            );
        }
    });
    let result = runner.run_seeded(42, &mut sink, &mut events);

    for entity in sink.entities() {
        println!(
            "entity {:?}: static={} streamed={:?} vertices={}",
            entity.handle,
            entity.is_static,
            entity.streaming,
            entity.mesh.as_ref().map_or(0, |m| m.vertex_count())
        );
    }
    println!(
        "{} entities for {} instances",
        sink.entities().len(),
        result.instances_placed
    );

    Ok(())
}
