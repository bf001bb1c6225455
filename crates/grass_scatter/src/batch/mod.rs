//! Output strategies that turn placements into renderable artifacts.
//!
//! A strategy is chosen once through [`OutputStrategy`]. [`BatchSession`]
//! then opens one [`InstanceBatcher`] per scope (the whole area, or one
//! patch); the batcher consumes each placement exactly once and is finalized
//! into a [`BatchArtifact`].
use crate::geometry::Aabb;
use crate::scatter::patch::PatchId;
use crate::scatter::placement::Placement;
use crate::scatter::prefab::Prefab;

pub mod discrete;
pub mod entity;
pub mod merge;
pub mod sink;

pub use discrete::DiscreteBatcher;
pub use entity::{InstancedEntityBatcher, MergedEntityBatcher};
pub use merge::MeshMergeBatcher;
use sink::{EntityHandle, GeometrySink, ObjectHandle, RenderableHandle};
use tracing::debug;

/// What a batch covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchScope {
    /// The whole placement area in one batch.
    Area,
    /// One tile of a patch grid.
    Patch(PatchId),
}

impl BatchScope {
    /// Suffix used when naming host objects for this scope.
    pub fn label(&self) -> String {
        match self {
            BatchScope::Area => "area".to_owned(),
            BatchScope::Patch(id) => format!("patch_{}_{}", id.0, id.1),
        }
    }
}

/// Streamed scene section an entity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StreamingTag {
    pub scene_id: u128,
    pub section_index: u32,
}

impl StreamingTag {
    pub fn new(scene_id: u128, section_index: u32) -> Self {
        Self {
            scene_id,
            section_index,
        }
    }
}

/// How the instanced-entity strategy lays out its records.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityLayout {
    /// One entity copy of the converted prefab per placement.
    PerInstance {
        /// Keep the per-instance culling component on the entity prefab.
        per_instance_culling: bool,
    },
    /// One static entity per scope, converted from a merged mesh.
    MergedPatch {
        /// Streamed scene section to register the entity with.
        streaming: Option<StreamingTag>,
    },
}

impl Default for EntityLayout {
    fn default() -> Self {
        EntityLayout::PerInstance {
            per_instance_culling: true,
        }
    }
}

/// Output strategy selector.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutputStrategy {
    /// Every placement becomes its own scene object under a spawn root.
    Discrete,
    /// Placements are merged into one mesh per scope.
    MeshMerge {
        /// Relative screen height below which the merged drawable is culled.
        lod_cutoff: Option<f32>,
    },
    /// Placements become entity records.
    InstancedEntity(EntityLayout),
}

impl Default for OutputStrategy {
    fn default() -> Self {
        OutputStrategy::MeshMerge { lod_cutoff: None }
    }
}

impl OutputStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            OutputStrategy::Discrete => "discrete",
            OutputStrategy::MeshMerge { .. } => "mesh_merge",
            OutputStrategy::InstancedEntity(EntityLayout::PerInstance { .. }) => "entity_instances",
            OutputStrategy::InstancedEntity(EntityLayout::MergedPatch { .. }) => "entity_patch",
        }
    }
}

/// Finished output of one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchArtifact {
    pub scope: BatchScope,
    /// Number of placements consumed into this artifact.
    pub instance_count: usize,
    pub output: ArtifactOutput,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactOutput {
    Objects {
        root: ObjectHandle,
        objects: Vec<ObjectHandle>,
    },
    Merged {
        renderable: RenderableHandle,
        vertex_count: usize,
        triangle_count: usize,
        bounds: Aabb,
        lod_cutoff: Option<f32>,
    },
    Entities {
        entities: Vec<EntityHandle>,
        streaming: Option<StreamingTag>,
    },
}

impl ArtifactOutput {
    /// Whether the host received nothing drawable for this batch.
    pub fn is_empty(&self) -> bool {
        match self {
            ArtifactOutput::Objects { objects, .. } => objects.is_empty(),
            ArtifactOutput::Merged { vertex_count, .. } => *vertex_count == 0,
            ArtifactOutput::Entities { entities, .. } => entities.is_empty(),
        }
    }
}

/// Accumulates placements for one scope.
pub trait InstanceBatcher {
    fn scope(&self) -> BatchScope;

    /// Take ownership of one placement.
    fn consume(&mut self, sink: &mut dyn GeometrySink, placement: Placement);

    /// Placements consumed so far.
    fn consumed(&self) -> usize;

    /// Realize everything consumed. Must not fail on an empty batch.
    fn finalize(self: Box<Self>, sink: &mut dyn GeometrySink) -> BatchArtifact;
}

/// A strategy bound to a prefab for the duration of one run.
pub struct BatchSession<'a> {
    strategy: OutputStrategy,
    prefab: &'a Prefab,
    prefab_entity: Option<EntityHandle>,
}

impl<'a> BatchSession<'a> {
    pub fn new(strategy: OutputStrategy, prefab: &'a Prefab) -> Self {
        Self {
            strategy,
            prefab,
            prefab_entity: None,
        }
    }

    pub fn strategy(&self) -> OutputStrategy {
        self.strategy
    }

    /// Open a batcher for `scope`, pre-sized for `expected` placements.
    pub fn begin(
        &mut self,
        scope: BatchScope,
        expected: usize,
        sink: &mut dyn GeometrySink,
    ) -> Box<dyn InstanceBatcher + 'a> {
        match self.strategy {
            OutputStrategy::Discrete => {
                Box::new(DiscreteBatcher::begin(self.prefab, scope, expected, sink))
            }
            OutputStrategy::MeshMerge { lod_cutoff } => Box::new(MeshMergeBatcher::new(
                self.prefab,
                scope,
                expected,
                lod_cutoff,
            )),
            OutputStrategy::InstancedEntity(EntityLayout::PerInstance {
                per_instance_culling,
            }) => {
                let prefab = self.prefab;
                let prefab_entity = *self.prefab_entity.get_or_insert_with(|| {
                    debug!("Converting prefab '{}' to an entity prefab.", prefab.name);
                    sink.convert_prefab_to_entity(prefab, per_instance_culling)
                });
                Box::new(InstancedEntityBatcher::new(prefab_entity, scope, expected))
            }
            OutputStrategy::InstancedEntity(EntityLayout::MergedPatch { streaming }) => Box::new(
                MergedEntityBatcher::new(self.prefab, scope, expected, streaming),
            ),
        }
    }

    /// Run-level post-processing once every batch is finalized.
    pub fn finish(self, sink: &mut dyn GeometrySink) {
        if self.prefab_entity.is_some() {
            sink.optimize_scene();
        }
    }
}
