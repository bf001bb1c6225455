//! The geometry sink: how batchers hand their output to the host engine.
//!
//! [`GeometrySink`] is implemented by the engine integration. [`RecordingSink`]
//! keeps everything in memory and is what tests, benchmarks and the PNG
//! previews use.
use crate::batch::StreamingTag;
use crate::geometry::Transform;
use crate::mesh::Mesh;
use crate::scatter::prefab::{MaterialId, Prefab, ShadowMode};

/// Handle to a scene object (spawn roots and discrete instances).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectHandle(pub u64);

/// Handle to a drawable built from a merged mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderableHandle(pub u64);

/// Handle to an entity record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityHandle(pub u64);

/// Receiver for batch output.
///
/// Methods with default bodies are optional capabilities; a host without LOD
/// groups or scene streaming can ignore them.
pub trait GeometrySink {
    /// Create an empty parent object for discrete instances.
    fn create_spawn_root(&mut self, name: &str) -> ObjectHandle;

    /// Instantiate `prefab` at `transform` as a child of `parent`.
    fn create_discrete_instance(
        &mut self,
        prefab: &Prefab,
        transform: &Transform,
        parent: ObjectHandle,
    ) -> ObjectHandle;

    /// Realize a merged mesh as one drawable.
    fn create_merged_renderable(
        &mut self,
        mesh: Mesh,
        material: &MaterialId,
        shadow_mode: ShadowMode,
    ) -> RenderableHandle;

    /// Attach a single-level LOD entry that culls `renderable` below the
    /// relative screen height `cutoff`.
    fn attach_lod(&mut self, _renderable: RenderableHandle, _cutoff: f32) {}

    /// Convert `prefab` into an entity prefab that instances are copied from.
    fn convert_prefab_to_entity(&mut self, prefab: &Prefab, per_instance_culling: bool)
        -> EntityHandle;

    /// Copy `prefab_entity` and place the copy at `transform`.
    fn instantiate_entity(&mut self, prefab_entity: EntityHandle, transform: &Transform)
        -> EntityHandle;

    /// Convert a drawable into an entity. The drawable itself stays alive.
    fn convert_renderable_to_entity(&mut self, renderable: RenderableHandle) -> EntityHandle;

    fn destroy_renderable(&mut self, renderable: RenderableHandle);

    /// Flag an entity as never moving.
    fn mark_static(&mut self, _entity: EntityHandle) {}

    /// Associate a static entity with a streamed scene section.
    fn register_as_static_streamed(&mut self, _entity: EntityHandle, _tag: StreamingTag) {}

    /// Post-process the entity scene once all instances exist.
    fn optimize_scene(&mut self) {}
}

#[derive(Debug, Clone)]
pub struct RecordedObject {
    pub handle: ObjectHandle,
    pub name: String,
    pub parent: Option<ObjectHandle>,
    pub transform: Transform,
}

#[derive(Debug, Clone)]
pub struct RecordedRenderable {
    pub handle: RenderableHandle,
    pub mesh: Mesh,
    pub material: MaterialId,
    pub shadow_mode: ShadowMode,
    pub lod_cutoff: Option<f32>,
    pub destroyed: bool,
}

/// Where a recorded entity came from.
#[derive(Debug, Clone, PartialEq)]
pub enum EntitySource {
    Prefab { name: String, per_instance_culling: bool },
    Instance(EntityHandle),
    Renderable(RenderableHandle),
}

#[derive(Debug, Clone)]
pub struct RecordedEntity {
    pub handle: EntityHandle,
    pub source: EntitySource,
    pub transform: Transform,
    /// Geometry captured when the entity was converted from a drawable.
    pub mesh: Option<Mesh>,
    pub is_static: bool,
    pub streaming: Option<StreamingTag>,
}

/// In-memory [`GeometrySink`].
#[derive(Debug, Default)]
pub struct RecordingSink {
    next_id: u64,
    objects: Vec<RecordedObject>,
    renderables: Vec<RecordedRenderable>,
    entities: Vec<RecordedEntity>,
    scene_optimizations: usize,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn objects(&self) -> &[RecordedObject] {
        &self.objects
    }

    pub fn object(&self, handle: ObjectHandle) -> Option<&RecordedObject> {
        self.objects.iter().find(|o| o.handle == handle)
    }

    /// Children of `parent`, in creation order.
    pub fn children_of(&self, parent: ObjectHandle) -> impl Iterator<Item = &RecordedObject> {
        self.objects
            .iter()
            .filter(move |o| o.parent == Some(parent))
    }

    pub fn renderables(&self) -> &[RecordedRenderable] {
        &self.renderables
    }

    pub fn renderable(&self, handle: RenderableHandle) -> Option<&RecordedRenderable> {
        self.renderables.iter().find(|r| r.handle == handle)
    }

    /// Drawables that have not been destroyed.
    pub fn live_renderables(&self) -> impl Iterator<Item = &RecordedRenderable> {
        self.renderables.iter().filter(|r| !r.destroyed)
    }

    pub fn entities(&self) -> &[RecordedEntity] {
        &self.entities
    }

    pub fn entity(&self, handle: EntityHandle) -> Option<&RecordedEntity> {
        self.entities.iter().find(|e| e.handle == handle)
    }

    pub fn scene_optimizations(&self) -> usize {
        self.scene_optimizations
    }

    fn entity_mut(&mut self, handle: EntityHandle) -> Option<&mut RecordedEntity> {
        self.entities.iter_mut().find(|e| e.handle == handle)
    }
}

impl GeometrySink for RecordingSink {
    fn create_spawn_root(&mut self, name: &str) -> ObjectHandle {
        let handle = ObjectHandle(self.next());
        self.objects.push(RecordedObject {
            handle,
            name: name.to_owned(),
            parent: None,
            transform: Transform::IDENTITY,
        });
        handle
    }

    fn create_discrete_instance(
        &mut self,
        prefab: &Prefab,
        transform: &Transform,
        parent: ObjectHandle,
    ) -> ObjectHandle {
        let handle = ObjectHandle(self.next());
        self.objects.push(RecordedObject {
            handle,
            name: prefab.name.clone(),
            parent: Some(parent),
            transform: *transform,
        });
        handle
    }

    fn create_merged_renderable(
        &mut self,
        mesh: Mesh,
        material: &MaterialId,
        shadow_mode: ShadowMode,
    ) -> RenderableHandle {
        let handle = RenderableHandle(self.next());
        self.renderables.push(RecordedRenderable {
            handle,
            mesh,
            material: material.clone(),
            shadow_mode,
            lod_cutoff: None,
            destroyed: false,
        });
        handle
    }

    fn attach_lod(&mut self, renderable: RenderableHandle, cutoff: f32) {
        if let Some(r) = self
            .renderables
            .iter_mut()
            .find(|r| r.handle == renderable)
        {
            r.lod_cutoff = Some(cutoff);
        }
    }

    fn convert_prefab_to_entity(
        &mut self,
        prefab: &Prefab,
        per_instance_culling: bool,
    ) -> EntityHandle {
        let handle = EntityHandle(self.next());
        self.entities.push(RecordedEntity {
            handle,
            source: EntitySource::Prefab {
                name: prefab.name.clone(),
                per_instance_culling,
            },
            transform: Transform::IDENTITY,
            mesh: None,
            is_static: false,
            streaming: None,
        });
        handle
    }

    fn instantiate_entity(
        &mut self,
        prefab_entity: EntityHandle,
        transform: &Transform,
    ) -> EntityHandle {
        let handle = EntityHandle(self.next());
        self.entities.push(RecordedEntity {
            handle,
            source: EntitySource::Instance(prefab_entity),
            transform: *transform,
            mesh: None,
            is_static: false,
            streaming: None,
        });
        handle
    }

    fn convert_renderable_to_entity(&mut self, renderable: RenderableHandle) -> EntityHandle {
        let mesh = self.renderable(renderable).map(|r| r.mesh.clone());
        let handle = EntityHandle(self.next());
        self.entities.push(RecordedEntity {
            handle,
            source: EntitySource::Renderable(renderable),
            transform: Transform::IDENTITY,
            mesh,
            is_static: false,
            streaming: None,
        });
        handle
    }

    fn destroy_renderable(&mut self, renderable: RenderableHandle) {
        if let Some(r) = self
            .renderables
            .iter_mut()
            .find(|r| r.handle == renderable)
        {
            r.destroyed = true;
            r.mesh = Mesh::default();
        }
    }

    fn mark_static(&mut self, entity: EntityHandle) {
        if let Some(e) = self.entity_mut(entity) {
            e.is_static = true;
        }
    }

    fn register_as_static_streamed(&mut self, entity: EntityHandle, tag: StreamingTag) {
        if let Some(e) = self.entity_mut(entity) {
            e.is_static = true;
            e.streaming = Some(tag);
        }
    }

    fn optimize_scene(&mut self) {
        self.scene_optimizations += 1;
    }
}
