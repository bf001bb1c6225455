//! The instance template every placement is realized from.
use std::fmt;
use std::sync::Arc;

use glam::Vec3;

use crate::error::{Error, Result};
use crate::mesh::Mesh;

/// Identifier of a material known to the host engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaterialId(pub String);

impl MaterialId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MaterialId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for MaterialId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shadow casting mode carried over to merged drawables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShadowMode {
    Off,
    #[default]
    On,
    TwoSided,
    ShadowsOnly,
}

/// Mesh, material and authored scale of the scattered object.
#[derive(Debug, Clone)]
pub struct Prefab {
    pub name: String,
    pub mesh: Arc<Mesh>,
    pub material: MaterialId,
    pub shadow_mode: ShadowMode,
    /// Authored local scale, used by [`crate::scatter::config::ScaleSource::Prefab`].
    pub scale: Vec3,
}

impl Prefab {
    pub fn new(name: impl Into<String>, mesh: Arc<Mesh>, material: impl Into<MaterialId>) -> Self {
        Self {
            name: name.into(),
            mesh,
            material: material.into(),
            shadow_mode: ShadowMode::default(),
            scale: Vec3::ONE,
        }
    }

    pub fn with_shadow_mode(mut self, shadow_mode: ShadowMode) -> Self {
        self.shadow_mode = shadow_mode;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Fails when the prefab cannot produce visible instances.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| Error::InvalidPrefab {
            name: self.name.clone(),
            reason: reason.to_owned(),
        };
        if self.mesh.is_empty() || self.mesh.indices.is_empty() {
            return Err(invalid("mesh has no geometry"));
        }
        self.mesh.validate().map_err(|e| invalid(&e.to_string()))?;
        if self.material.0.trim().is_empty() {
            return Err(invalid("material id is empty"));
        }
        if !self.scale.is_finite() {
            return Err(invalid("scale must be finite"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let prefab = Prefab::new("fern", Arc::new(Mesh::upright_quad(1.0, 1.0)), "foliage")
            .with_shadow_mode(ShadowMode::TwoSided)
            .with_scale(Vec3::splat(2.0));
        assert_eq!(prefab.material.as_str(), "foliage");
        assert_eq!(prefab.shadow_mode, ShadowMode::TwoSided);
        assert_eq!(prefab.scale, Vec3::splat(2.0));
        prefab.validate().expect("valid prefab");
    }

    #[test]
    fn empty_mesh_is_rejected() {
        let prefab = Prefab::new("nothing", Arc::new(Mesh::default()), "grass");
        assert!(matches!(
            prefab.validate(),
            Err(Error::InvalidPrefab { ref name, .. }) if name == "nothing"
        ));
    }

    #[test]
    fn empty_material_is_rejected() {
        let prefab = Prefab::new("tuft", Arc::new(Mesh::upright_quad(1.0, 1.0)), " ");
        assert!(prefab.validate().is_err());
    }

    #[test]
    fn broken_mesh_is_rejected() {
        let mesh = Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1, 5]);
        let prefab = Prefab::new("broken", Arc::new(mesh), "grass");
        assert!(prefab.validate().is_err());
    }
}
