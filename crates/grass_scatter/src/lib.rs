#![forbid(unsafe_code)]
//! grass_scatter: procedural vegetation placement over probed surfaces.
//!
//! Modules:
//! - geometry: transforms, bounds and the surface-aligned rotation
//! - mesh: indexed triangle meshes with combine/optimize
//! - probe: the surface query collaborator and a few built-in surfaces
//! - sampling: candidate generation (regular grid, uniform random)
//! - batch: output strategies (discrete objects, merged mesh, instanced entities) and the geometry sink
//! - scatter: configuration, patch layout, placement resolution, runner, events
pub mod batch;
pub mod error;
pub mod geometry;
pub mod mesh;
pub mod probe;
pub mod sampling;
pub mod scatter;

/// Convenient re-exports for common types. Import with `use grass_scatter::prelude::*;`.
pub mod prelude {
    pub use crate::batch::sink::{
        EntityHandle, GeometrySink, ObjectHandle, RecordedRenderable, RecordingSink,
        RenderableHandle,
    };
    pub use crate::batch::{
        ArtifactOutput, BatchArtifact, BatchScope, BatchSession, EntityLayout, InstanceBatcher,
        OutputStrategy, StreamingTag,
    };
    pub use crate::error::{Error, Result};
    pub use crate::geometry::{surface_rotation, Aabb, Transform};
    pub use crate::mesh::Mesh;
    pub use crate::probe::{HeightFnProbe, PlaneProbe, SurfaceHit, SurfaceProbe};
    pub use crate::sampling::{GridSampling, PositionSampling, UniformRandomSampling};
    pub use crate::scatter::config::{
        Frame, Layout, MissPolicy, OrientationJitter, ScaleSource, ScatterConfig,
    };
    pub use crate::scatter::events::{
        AsEventSink, EventSink, FnSink, MultiSink, ScatterEvent, ScatterEventKind, VecSink,
    };
    pub use crate::scatter::patch::{seed_for_patch, PatchGrid, PatchId};
    pub use crate::scatter::placement::{Placement, PlacementResolver, ProbeOutcome};
    pub use crate::scatter::prefab::{MaterialId, Prefab, ShadowMode};
    pub use crate::scatter::runner::{RunResult, ScatterRunner};
}
