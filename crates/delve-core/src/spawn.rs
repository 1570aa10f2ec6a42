//! Boundaries to the host scene
//!
//! The generator never owns scene entities. It asks an [`EntitySpawner`] for
//! them by template and keeps only the returned handles.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a spawnable template (prefab, asset key, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(pub String);

impl TemplateId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque handle to an entity owned by the spawner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityHandle(pub u64);

/// Placement of a spawned entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    /// Rotation about the vertical axis, in degrees
    pub yaw: f32,
    pub scale: Vec3,
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            yaw: 0.0,
            scale: Vec3::ONE,
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self
    }
}

/// Spawning errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpawnError {
    #[error("Unknown template '{0}'")]
    UnknownTemplate(TemplateId),

    #[error("Parent entity {0:?} does not exist")]
    MissingParent(EntityHandle),
}

/// Entity spawning service
pub trait EntitySpawner {
    /// Instantiate `template` at `transform`, parented under `parent` when given
    fn spawn(
        &mut self,
        template: &TemplateId,
        transform: Transform,
        parent: Option<EntityHandle>,
    ) -> Result<EntityHandle, SpawnError>;

    /// Destroy an entity and everything parented under it. Unknown handles are ignored.
    fn despawn(&mut self, handle: EntityHandle);
}

/// Navigation baking service
pub trait NavigationBaker {
    /// Request a bake over everything under `scope`. Fire-and-forget.
    fn request_bake(&mut self, scope: EntityHandle);
}
