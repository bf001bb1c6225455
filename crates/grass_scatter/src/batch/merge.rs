//! Mesh-merge strategy: all placements of a scope become one drawable.
use glam::Mat4;
use tracing::debug;

use crate::batch::sink::GeometrySink;
use crate::batch::{ArtifactOutput, BatchArtifact, BatchScope, InstanceBatcher};
use crate::mesh::Mesh;
use crate::scatter::placement::Placement;
use crate::scatter::prefab::Prefab;

/// Merge one copy of `mesh` per matrix, then recompute bounds and optimize.
pub fn merge_instances(mesh: &Mesh, matrices: &[Mat4]) -> Mesh {
    let mut merged = Mesh::combine(matrices.iter().map(|m| (mesh, *m)));
    merged.recalculate_bounds();
    merged.optimize();
    merged
}

pub struct MeshMergeBatcher<'a> {
    prefab: &'a Prefab,
    scope: BatchScope,
    matrices: Vec<Mat4>,
    lod_cutoff: Option<f32>,
}

impl<'a> MeshMergeBatcher<'a> {
    pub fn new(
        prefab: &'a Prefab,
        scope: BatchScope,
        expected: usize,
        lod_cutoff: Option<f32>,
    ) -> Self {
        Self {
            prefab,
            scope,
            matrices: Vec::with_capacity(expected),
            lod_cutoff,
        }
    }
}

impl InstanceBatcher for MeshMergeBatcher<'_> {
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
        let merged = merge_instances(&self.prefab.mesh, &self.matrices);
        let vertex_count = merged.vertex_count();
        let triangle_count = merged.triangle_count();
        let bounds = merged.bounds;

        let renderable = sink.create_merged_renderable(
            merged,
            &self.prefab.material,
            self.prefab.shadow_mode,
        );
        if let Some(cutoff) = self.lod_cutoff {
            sink.attach_lod(renderable, cutoff);
        }

        debug!(
            "Scope {}: merged {} instances into {} vertices / {} triangles.",
            self.scope.label(),
            self.matrices.len(),
            vertex_count,
            triangle_count
        );

        BatchArtifact {
            scope: self.scope,
            instance_count: self.matrices.len(),
            output: ArtifactOutput::Merged {
                renderable,
                vertex_count,
                triangle_count,
                bounds,
                lod_cutoff: self.lod_cutoff,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::{Quat, Vec3};

    use super::*;
    use crate::batch::sink::RecordingSink;
    use crate::batch::tests::{placement_at, test_prefab};
    use crate::scatter::prefab::ShadowMode;

    #[test]
    fn empty_merge_yields_zero_vertex_drawable() {
        let prefab = test_prefab();
        let mut sink = RecordingSink::new();
        let batcher = Box::new(MeshMergeBatcher::new(&prefab, BatchScope::Area, 0, None));
        let artifact = batcher.finalize(&mut sink);

        let ArtifactOutput::Merged {
            renderable,
            vertex_count,
            ..
        } = artifact.output
        else {
            panic!("expected merged output");
        };
        assert_eq!(vertex_count, 0);
        let recorded = sink.renderable(renderable).expect("renderable recorded");
        assert!(recorded.mesh.is_empty());
    }

    #[test]
    fn merged_mesh_carries_material_shadow_and_lod() {
        let prefab = test_prefab().with_shadow_mode(ShadowMode::Off);
        let mut sink = RecordingSink::new();
        let mut batcher = Box::new(MeshMergeBatcher::new(
            &prefab,
            BatchScope::Area,
            2,
            Some(0.05),
        ));
        batcher.consume(&mut sink, placement_at(0.0, 0.0));
        batcher.consume(&mut sink, placement_at(10.0, 0.0));
        let artifact = batcher.finalize(&mut sink);

        let ArtifactOutput::Merged {
            renderable,
            vertex_count,
            triangle_count,
            bounds,
            lod_cutoff,
        } = artifact.output
        else {
            panic!("expected merged output");
        };
        assert_eq!(vertex_count, 8);
        assert_eq!(triangle_count, 4);
        assert_eq!(lod_cutoff, Some(0.05));
        assert_eq!(bounds.min.x, -0.5);
        assert_eq!(bounds.max.x, 10.5);

        let recorded = sink.renderable(renderable).expect("renderable recorded");
        assert_eq!(recorded.material.as_str(), "grass");
        assert_eq!(recorded.shadow_mode, ShadowMode::Off);
        assert_eq!(recorded.lod_cutoff, Some(0.05));
    }

    #[test]
    fn merge_applies_rotation_and_scale() {
        let mesh = Mesh::upright_quad(2.0, 1.0);
        let matrix = Mat4::from_scale_rotation_translation(
            Vec3::splat(2.0),
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            Vec3::new(0.0, 5.0, 0.0),
        );
        let merged = merge_instances(&mesh, &[matrix]);
        assert!(merged.bounds.min.abs_diff_eq(Vec3::new(0.0, 5.0, -2.0), 1e-5));
        assert!(merged.bounds.max.abs_diff_eq(Vec3::new(0.0, 7.0, 2.0), 1e-5));
    }
}
