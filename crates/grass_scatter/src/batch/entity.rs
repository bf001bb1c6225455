//! Instanced-entity strategy.
//!
//! Two layouts: [`InstancedEntityBatcher`] copies a converted entity prefab
//! once per placement, [`MergedEntityBatcher`] merges a whole scope into one
//! static entity and optionally registers it with a streamed scene section.
use glam::Mat4;
use tracing::{debug, warn};

use crate::batch::merge::merge_instances;
use crate::batch::sink::{EntityHandle, GeometrySink};
use crate::batch::{ArtifactOutput, BatchArtifact, BatchScope, InstanceBatcher, StreamingTag};
use crate::scatter::placement::Placement;
use crate::scatter::prefab::Prefab;

pub struct InstancedEntityBatcher {
    prefab_entity: EntityHandle,
    scope: BatchScope,
    entities: Vec<EntityHandle>,
}

impl InstancedEntityBatcher {
    pub fn new(prefab_entity: EntityHandle, scope: BatchScope, expected: usize) -> Self {
        Self {
            prefab_entity,
            scope,
            entities: Vec::with_capacity(expected),
        }
    }
}

impl InstanceBatcher for InstancedEntityBatcher {
    fn scope(&self) -> BatchScope {
        self.scope
    }

    fn consume(&mut self, sink: &mut dyn GeometrySink, placement: Placement) {
        let entity = sink.instantiate_entity(self.prefab_entity, &placement.to_transform());
        self.entities.push(entity);
    }

    fn consumed(&self) -> usize {
        self.entities.len()
    }

    fn finalize(self: Box<Self>, _sink: &mut dyn GeometrySink) -> BatchArtifact {
        debug!(
            "Scope {}: instantiated {} entities.",
            self.scope.label(),
            self.entities.len()
        );
        BatchArtifact {
            scope: self.scope,
            instance_count: self.entities.len(),
            output: ArtifactOutput::Entities {
                entities: self.entities,
                streaming: None,
            },
        }
    }
}

pub struct MergedEntityBatcher<'a> {
    prefab: &'a Prefab,
    scope: BatchScope,
    matrices: Vec<Mat4>,
    streaming: Option<StreamingTag>,
}

impl<'a> MergedEntityBatcher<'a> {
    pub fn new(
        prefab: &'a Prefab,
        scope: BatchScope,
        expected: usize,
        streaming: Option<StreamingTag>,
    ) -> Self {
        Self {
            prefab,
            scope,
            matrices: Vec::with_capacity(expected),
            streaming,
        }
    }
}

impl InstanceBatcher for MergedEntityBatcher<'_> {
    fn scope(&self) -> BatchScope {
        self.scope
    }

    fn consume(&mut self, _sink: &mut dyn GeometrySink, placement: Placement) {
        self.matrices.push(placement.to_matrix());
    }

    fn consumed(&self) -> usize {
        self.matrices.len()
    }

    fn finalize(self: Box<Self>, sink: &mut dyn GeometrySink) -> BatchArtifact {
        let mut entities = Vec::new();
        if self.matrices.is_empty() {
            warn!(
                "Scope {}: no placements to convert; skipping entity.",
                self.scope.label()
            );
        } else {
            let merged = merge_instances(&self.prefab.mesh, &self.matrices);
            let temp = sink.create_merged_renderable(
                merged,
                &self.prefab.material,
                self.prefab.shadow_mode,
            );
            let entity = sink.convert_renderable_to_entity(temp);
            sink.destroy_renderable(temp);

            sink.mark_static(entity);
            if let Some(tag) = self.streaming {
                sink.register_as_static_streamed(entity, tag);
            }
            debug!(
                "Scope {}: converted {} merged instances into entity {:?}.",
                self.scope.label(),
                self.matrices.len(),
                entity
            );
            entities.push(entity);
        }

        BatchArtifact {
            scope: self.scope,
            instance_count: self.matrices.len(),
            output: ArtifactOutput::Entities {
                entities,
                streaming: self.streaming,
            },
        }
    }
}
