//! Per-scene resource tracking
//!
//! A scene allocates every render resource through its [`SceneResources`],
//! which tags the resource with the scene as owner, prefixes its name with
//! the festival selector, and remembers the handle. `release_all` then frees
//! exactly what the scene created, no matter how far `create()` got.

use crate::foundation::collections::ResourceId;
use crate::render::{Light, Material, Mesh, Owner, ParticleSystem, RenderError, RenderWorld, Texture};

use super::festival::FestivalId;

/// Handles of every resource one scene instance allocated
#[derive(Debug, Clone)]
pub struct SceneResources {
    festival: FestivalId,
    ids: Vec<ResourceId>,
}

impl SceneResources {
    /// Create an empty tracker for `festival`
    pub fn new(festival: FestivalId) -> Self {
        Self {
            festival,
            ids: Vec::new(),
        }
    }

    /// Owner tag applied to tracked resources
    pub fn owner(&self) -> Owner {
        Owner::Scene(self.festival.as_str())
    }

    fn qualified(&self, name: &str) -> String {
        format!("{}/{}", self.festival.as_str(), name)
    }

    fn tracked(&mut self, result: Result<ResourceId, RenderError>) -> Result<ResourceId, RenderError> {
        let id = result?;
        self.ids.push(id);
        Ok(id)
    }

    /// Allocate and track a mesh
    pub fn mesh(&mut self, world: &mut RenderWorld, name: &str, mesh: Mesh) -> Result<ResourceId, RenderError> {
        let result = world.add_mesh(self.qualified(name), self.owner(), mesh);
        self.tracked(result)
    }

    /// Allocate and track a material
    pub fn material(&mut self, world: &mut RenderWorld, name: &str, material: Material) -> Result<ResourceId, RenderError> {
        let result = world.add_material(self.qualified(name), self.owner(), material);
        self.tracked(result)
    }

    /// Allocate and track a texture
    pub fn texture(&mut self, world: &mut RenderWorld, name: &str, texture: Texture) -> Result<ResourceId, RenderError> {
        let result = world.add_texture(self.qualified(name), self.owner(), texture);
        self.tracked(result)
    }

    /// Allocate and track a light
    pub fn light(&mut self, world: &mut RenderWorld, name: &str, light: Light) -> Result<ResourceId, RenderError> {
        let result = world.add_light(self.qualified(name), self.owner(), light);
        self.tracked(result)
    }

    /// Allocate and track a particle system
    pub fn particles(
        &mut self,
        world: &mut RenderWorld,
        name: &str,
        system: ParticleSystem,
    ) -> Result<ResourceId, RenderError> {
        let result = world.add_particle_system(self.qualified(name), self.owner(), system);
        self.tracked(result)
    }

    /// Free one tracked resource early (expired effect, burned effigy)
    ///
    /// Returns false if the handle is not tracked by this scene.
    pub fn release(&mut self, world: &mut RenderWorld, id: ResourceId) -> bool {
        let Some(pos) = self.ids.iter().position(|&tracked| tracked == id) else {
            return false;
        };
        self.ids.swap_remove(pos);
        world.remove(id);
        true
    }

    /// Whether `id` was allocated by this scene and not yet released
    pub fn contains(&self, id: ResourceId) -> bool {
        self.ids.contains(&id)
    }

    /// Number of tracked resources
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is tracked
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Free every tracked resource, newest first
    ///
    /// Handles already freed by someone else (the manager's sweep, a material
    /// taking its texture with it) are skipped. Returns how many were freed here.
    pub fn release_all(&mut self, world: &mut RenderWorld) -> usize {
        let mut freed = 0;
        while let Some(id) = self.ids.pop() {
            if world.remove(id).is_some() {
                freed += 1;
            }
        }
        freed
    }
}
