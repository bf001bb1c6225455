//! Discrete-object strategy: one scene object per placement.
use tracing::debug;

use crate::batch::sink::{GeometrySink, ObjectHandle};
use crate::batch::{ArtifactOutput, BatchArtifact, BatchScope, InstanceBatcher};
use crate::scatter::placement::Placement;
use crate::scatter::prefab::Prefab;

pub struct DiscreteBatcher<'a> {
    prefab: &'a Prefab,
    scope: BatchScope,
    root: ObjectHandle,
    objects: Vec<ObjectHandle>,
}

impl<'a> DiscreteBatcher<'a> {
    /// Create the spawn root for `scope` and start collecting children under it.
    pub fn begin(
        prefab: &'a Prefab,
        scope: BatchScope,
        expected: usize,
        sink: &mut dyn GeometrySink,
    ) -> Self {
        let root = sink.create_spawn_root(&format!("{}_Spawn_{}", prefab.name, scope.label()));
        Self {
            prefab,
            scope,
            root,
            objects: Vec::with_capacity(expected),
        }
    }
}

impl InstanceBatcher for DiscreteBatcher<'_> {
    fn scope(&self) -> BatchScope {
        self.scope
    }

    fn consume(&mut self, sink: &mut dyn GeometrySink, placement: Placement) {
        let handle =
            sink.create_discrete_instance(self.prefab, &placement.to_transform(), self.root);
        self.objects.push(handle);
    }

    fn consumed(&self) -> usize {
        self.objects.len()
    }

    fn finalize(self: Box<Self>, _sink: &mut dyn GeometrySink) -> BatchArtifact {
        debug!(
            "Scope {}: spawned {} discrete '{}' objects.",
            self.scope.label(),
            self.objects.len(),
            self.prefab.name
        );
        BatchArtifact {
            scope: self.scope,
            instance_count: self.objects.len(),
            output: ArtifactOutput::Objects {
                root: self.root,
                objects: self.objects,
            },
        }
    }
}
