//! Render world - owner of every render resource
//!
//! Resources live in one generational map keyed by [`ResourceId`]. Each
//! resource carries a name (used by the scene manager's permanent
//! allow-list) and an [`Owner`] tag so leaks can be counted per scene.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::foundation::collections::{ResourceId, ResourceMap};
use crate::foundation::math::Color;

use super::error::RenderError;
use super::lighting::Light;
use super::material::{Material, Texture};
use super::mesh::{Mesh, PickLayers};
use super::particles::ParticleSystem;
use super::picking::{BoundingSphere, PickHit, Ray};

/// Who allocated a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    /// Shared environment owned by the scene manager (ground, skybox, global lights)
    Permanent,
    /// A festival scene, identified by its stable name
    Scene(&'static str),
}

/// Resource kind discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Mesh
    Mesh,
    /// Material
    Material,
    /// Texture
    Texture,
    /// Light
    Light,
    /// Particle system
    ParticleSystem,
}

impl ResourceKind {
    /// Human readable kind name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mesh => "mesh",
            Self::Material => "material",
            Self::Texture => "texture",
            Self::Light => "light",
            Self::ParticleSystem => "particle system",
        }
    }
}

/// Resource payload
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceNode {
    /// Mesh data
    Mesh(Mesh),
    /// Material data
    Material(Material),
    /// Texture data
    Texture(Texture),
    /// Light data
    Light(Light),
    /// Particle emitter
    ParticleSystem(ParticleSystem),
}

impl ResourceNode {
    /// Kind of this payload
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Mesh(_) => ResourceKind::Mesh,
            Self::Material(_) => ResourceKind::Material,
            Self::Texture(_) => ResourceKind::Texture,
            Self::Light(_) => ResourceKind::Light,
            Self::ParticleSystem(_) => ResourceKind::ParticleSystem,
        }
    }
}

/// A named, owned resource
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    /// Name, not necessarily unique
    pub name: String,
    /// Allocating owner
    pub owner: Owner,
    /// Payload
    pub node: ResourceNode,
}

/// Summary of one rendered frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    /// Frame number, starting at 1
    pub frame: u64,
    /// Live resources of any kind
    pub resources: usize,
    /// Meshes in the world
    pub meshes: usize,
    /// Meshes drawn this frame
    pub visible_meshes: usize,
    /// Enabled lights
    pub active_lights: usize,
    /// Live particles across every system
    pub active_particles: usize,
    /// Clear colour
    pub background: Color,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self {
            frame: 0,
            resources: 0,
            meshes: 0,
            visible_meshes: 0,
            active_lights: 0,
            active_particles: 0,
            background: Color::zeros(),
        }
    }
}

/// Owner of every render resource
pub struct RenderWorld {
    resources: ResourceMap<Resource>,
    background: Color,
    rng: StdRng,
    frame: u64,
}

macro_rules! typed_access {
    ($get:ident, $get_mut:ident, $variant:ident, $ty:ty, $kind:expr) => {
        /// Borrow a resource of this kind
        pub fn $get(&self, id: ResourceId) -> Result<&$ty, RenderError> {
            match self.resources.get(id).map(|r| &r.node) {
                Some(ResourceNode::$variant(value)) => Ok(value),
                Some(other) => Err(RenderError::WrongKind {
                    id,
                    expected: $kind.as_str(),
                    actual: other.kind().as_str(),
                }),
                None => Err(RenderError::UnknownResource(id)),
            }
        }

        /// Mutably borrow a resource of this kind
        pub fn $get_mut(&mut self, id: ResourceId) -> Result<&mut $ty, RenderError> {
            match self.resources.get_mut(id).map(|r| &mut r.node) {
                Some(ResourceNode::$variant(value)) => Ok(value),
                Some(other) => Err(RenderError::WrongKind {
                    id,
                    expected: $kind.as_str(),
                    actual: other.kind().as_str(),
                }),
                None => Err(RenderError::UnknownResource(id)),
            }
        }
    };
}

impl RenderWorld {
    /// Create an empty world; `seed` drives particle randomness
    pub fn new(seed: u64) -> Self {
        Self {
            resources: ResourceMap::with_key(),
            background: Color::new(0.05, 0.05, 0.1),
            rng: StdRng::seed_from_u64(seed),
            frame: 0,
        }
    }

    //--- Allocation -------------------------------------------------------

    /// Insert a resource after validating its payload and references
    pub fn add(
        &mut self,
        name: impl Into<String>,
        owner: Owner,
        node: ResourceNode,
    ) -> Result<ResourceId, RenderError> {
        let name = name.into();
        self.validate(&name, &node)?;
        let kind = node.kind();
        let id = self.resources.insert(Resource { name, owner, node });
        log::trace!("Added {} {:?} owned by {:?}", kind.as_str(), id, owner);
        Ok(id)
    }

    /// Insert a mesh
    pub fn add_mesh(&mut self, name: impl Into<String>, owner: Owner, mesh: Mesh) -> Result<ResourceId, RenderError> {
        self.add(name, owner, ResourceNode::Mesh(mesh))
    }

    /// Insert a material
    pub fn add_material(&mut self, name: impl Into<String>, owner: Owner, material: Material) -> Result<ResourceId, RenderError> {
        self.add(name, owner, ResourceNode::Material(material))
    }

    /// Insert a texture
    pub fn add_texture(&mut self, name: impl Into<String>, owner: Owner, texture: Texture) -> Result<ResourceId, RenderError> {
        self.add(name, owner, ResourceNode::Texture(texture))
    }

    /// Insert a light
    pub fn add_light(&mut self, name: impl Into<String>, owner: Owner, light: Light) -> Result<ResourceId, RenderError> {
        self.add(name, owner, ResourceNode::Light(light))
    }

    /// Insert a particle system
    pub fn add_particle_system(
        &mut self,
        name: impl Into<String>,
        owner: Owner,
        system: ParticleSystem,
    ) -> Result<ResourceId, RenderError> {
        self.add(name, owner, ResourceNode::ParticleSystem(system))
    }

    fn validate(&self, name: &str, node: &ResourceNode) -> Result<(), RenderError> {
        match node {
            ResourceNode::Mesh(mesh) => {
                if !mesh.shape.is_valid() {
                    return Err(RenderError::InvalidParameter(format!(
                        "mesh '{}' has degenerate shape {:?}",
                        name, mesh.shape
                    )));
                }
                if let Some(material) = mesh.material {
                    self.material(material)?;
                }
            }
            ResourceNode::Material(material) => {
                if let Some(texture) = material.texture {
                    self.texture(texture)?;
                }
            }
            ResourceNode::Texture(texture) => {
                if !texture.is_valid() {
                    return Err(RenderError::InvalidParameter(format!("texture '{}' is empty", name)));
                }
            }
            ResourceNode::Light(light) => {
                if !light.intensity.is_finite() || light.intensity < 0.0 {
                    return Err(RenderError::InvalidParameter(format!(
                        "light '{}' has intensity {}",
                        name, light.intensity
                    )));
                }
            }
            ResourceNode::ParticleSystem(system) => {
                if !system.is_valid() {
                    return Err(RenderError::InvalidParameter(format!(
                        "particle system '{}' has invalid emitter parameters",
                        name
                    )));
                }
            }
        }
        Ok(())
    }

    //--- Release ----------------------------------------------------------

    /// Free a resource
    ///
    /// A material's texture is freed with it when both share an owner and no
    /// other material still binds the texture. Returns `None` for stale handles.
    pub fn remove(&mut self, id: ResourceId) -> Option<Resource> {
        let removed = self.resources.remove(id)?;
        if let ResourceNode::Material(Material { texture: Some(texture), .. }) = &removed.node {
            let texture = *texture;
            let same_owner = self
                .resources
                .get(texture)
                .is_some_and(|t| t.owner == removed.owner);
            if same_owner && !self.texture_in_use(texture) {
                self.resources.remove(texture);
            }
        }
        Some(removed)
    }

    fn texture_in_use(&self, texture: ResourceId) -> bool {
        self.resources.values().any(|r| {
            matches!(&r.node, ResourceNode::Material(m) if m.texture == Some(texture))
        })
    }

    /// Free every resource whose name is not allow-listed
    ///
    /// Materials bound to a surviving mesh and textures bound to a surviving
    /// material survive with it. Returns the number of freed resources.
    pub fn remove_unlisted(&mut self, allow_list: &[String]) -> usize {
        let mut keep: HashSet<ResourceId> = self
            .resources
            .iter()
            .filter(|(_, r)| allow_list.iter().any(|name| *name == r.name))
            .map(|(id, _)| id)
            .collect();

        let materials: Vec<ResourceId> = keep
            .iter()
            .filter_map(|id| match &self.resources[*id].node {
                ResourceNode::Mesh(mesh) => mesh.material,
                _ => None,
            })
            .collect();
        keep.extend(materials.iter().copied());
        let textures: Vec<ResourceId> = keep
            .iter()
            .filter_map(|id| match self.resources.get(*id).map(|r| &r.node) {
                Some(ResourceNode::Material(material)) => material.texture,
                _ => None,
            })
            .collect();
        keep.extend(textures);

        let before = self.resources.len();
        self.resources.retain(|id, _| keep.contains(&id));
        before - self.resources.len()
    }

    /// Free every resource allocated by `owner`
    pub fn remove_owned_by(&mut self, owner: Owner) -> usize {
        let before = self.resources.len();
        self.resources.retain(|_, r| r.owner != owner);
        before - self.resources.len()
    }

    /// Free everything
    pub fn clear(&mut self) {
        self.resources.clear();
    }

    //--- Queries ----------------------------------------------------------

    /// Whether a handle refers to a live resource
    pub fn contains(&self, id: ResourceId) -> bool {
        self.resources.contains_key(id)
    }

    /// Borrow a resource
    pub fn get(&self, id: ResourceId) -> Option<&Resource> {
        self.resources.get(id)
    }

    /// Mutably borrow a resource
    pub fn get_mut(&mut self, id: ResourceId) -> Option<&mut Resource> {
        self.resources.get_mut(id)
    }

    typed_access!(mesh, mesh_mut, Mesh, Mesh, ResourceKind::Mesh);
    typed_access!(material, material_mut, Material, Material, ResourceKind::Material);
    typed_access!(texture, texture_mut, Texture, Texture, ResourceKind::Texture);
    typed_access!(light, light_mut, Light, Light, ResourceKind::Light);
    typed_access!(particles, particles_mut, ParticleSystem, ParticleSystem, ResourceKind::ParticleSystem);

    /// First resource with the given name
    pub fn find_by_name(&self, name: &str) -> Option<ResourceId> {
        self.resources
            .iter()
            .find(|(_, r)| r.name == name)
            .map(|(id, _)| id)
    }

    /// Iterate over every resource
    pub fn iter(&self) -> impl Iterator<Item = (ResourceId, &Resource)> {
        self.resources.iter()
    }

    /// Number of live resources
    pub fn count(&self) -> usize {
        self.resources.len()
    }

    /// Number of live resources allocated by `owner`
    pub fn count_owned_by(&self, owner: Owner) -> usize {
        self.resources.values().filter(|r| r.owner == owner).count()
    }

    /// Number of live resources of `kind`
    pub fn count_kind(&self, kind: ResourceKind) -> usize {
        self.resources.values().filter(|r| r.node.kind() == kind).count()
    }

    /// Clear colour
    pub fn background(&self) -> Color {
        self.background
    }

    /// Set the clear colour
    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    //--- Simulation and rendering -----------------------------------------

    /// Advance every particle system by `delta_time` seconds
    pub fn advance(&mut self, delta_time: f32) {
        let rng = &mut self.rng;
        for resource in self.resources.values_mut() {
            if let ResourceNode::ParticleSystem(system) = &mut resource.node {
                system.advance(delta_time, &mut *rng);
            }
        }
    }

    /// Produce the statistics of one frame
    pub fn render(&mut self) -> FrameStats {
        self.frame += 1;
        let mut stats = FrameStats {
            frame: self.frame,
            resources: self.resources.len(),
            background: self.background,
            ..FrameStats::default()
        };
        for resource in self.resources.values() {
            match &resource.node {
                ResourceNode::Mesh(mesh) => {
                    stats.meshes += 1;
                    if mesh.visible {
                        stats.visible_meshes += 1;
                    }
                }
                ResourceNode::Light(light) if light.enabled => stats.active_lights += 1,
                ResourceNode::ParticleSystem(system) => stats.active_particles += system.active_count(),
                _ => {}
            }
        }
        log::trace!("Rendered frame {}: {:?}", stats.frame, stats);
        stats
    }

    /// Nearest visible mesh on any of `layers` hit by `ray`
    pub fn pick(&self, ray: &Ray, layers: PickLayers) -> Option<PickHit> {
        self.resources
            .iter()
            .filter_map(|(id, r)| match &r.node {
                ResourceNode::Mesh(mesh) if mesh.visible && mesh.pick_layers.intersects(layers) => {
                    BoundingSphere::new(mesh.position, mesh.world_bounding_radius())
                        .intersect_ray(ray)
                        .map(|distance| PickHit { id, distance })
                }
                _ => None,
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

impl Default for RenderWorld {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::render::material::TexturePattern;
    use crate::render::mesh::Shape;

    const SCENE: Owner = Owner::Scene("test");

    fn white() -> Material {
        Material::new(Color::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_add_and_count() {
        let mut world = RenderWorld::new(1);
        let mat = world.add_material("mat", SCENE, white()).unwrap();
        world
            .add_mesh("box", SCENE, Mesh::new(Shape::cube(1.0)).with_material(mat))
            .unwrap();
        world.add_mesh("ground", Owner::Permanent, Mesh::new(Shape::Plane { width: 10.0, height: 10.0 })).unwrap();

        assert_eq!(world.count(), 3);
        assert_eq!(world.count_owned_by(SCENE), 2);
        assert_eq!(world.count_kind(ResourceKind::Mesh), 2);
        assert!(world.find_by_name("ground").is_some());
    }

    #[test]
    fn test_mesh_with_stale_material_rejected() {
        let mut world = RenderWorld::new(1);
        let mat = world.add_material("mat", SCENE, white()).unwrap();
        world.remove(mat);
        let result = world.add_mesh("box", SCENE, Mesh::new(Shape::cube(1.0)).with_material(mat));
        assert_eq!(result, Err(RenderError::UnknownResource(mat)));
    }

    #[test]
    fn test_wrong_kind_reported() {
        let mut world = RenderWorld::new(1);
        let light = world
            .add_light("l", SCENE, Light::point(Vec3::zeros(), Color::zeros(), 1.0, 1.0))
            .unwrap();
        let err = world.material(light).unwrap_err();
        assert!(matches!(err, RenderError::WrongKind { expected: "material", actual: "light", .. }));
    }

    #[test]
    fn test_invalid_particles_rejected() {
        let mut world = RenderWorld::new(1);
        let result = world.add_particle_system("p", SCENE, ParticleSystem::new(Vec3::zeros(), 0));
        assert!(matches!(result, Err(RenderError::InvalidParameter(_))));
        assert_eq!(world.count(), 0);
    }

    #[test]
    fn test_removing_material_frees_its_texture() {
        let mut world = RenderWorld::new(1);
        let tex = world
            .add_texture("tex", SCENE, Texture::square(16, TexturePattern::Solid(Color::zeros())))
            .unwrap();
        let mat = world.add_material("mat", SCENE, white().with_texture(tex)).unwrap();
        world.remove(mat);
        assert!(!world.contains(tex));
        assert_eq!(world.count(), 0);
    }

    #[test]
    fn test_shared_texture_kept_while_bound() {
        let mut world = RenderWorld::new(1);
        let tex = world
            .add_texture("tex", SCENE, Texture::square(16, TexturePattern::Solid(Color::zeros())))
            .unwrap();
        let a = world.add_material("a", SCENE, white().with_texture(tex)).unwrap();
        let _b = world.add_material("b", SCENE, white().with_texture(tex)).unwrap();
        world.remove(a);
        assert!(world.contains(tex));
    }

    #[test]
    fn test_remove_unlisted_keeps_allow_list_and_bound_materials() {
        let mut world = RenderWorld::new(1);
        let ground_mat = world.add_material("groundMaterial", Owner::Permanent, white()).unwrap();
        let ground = world
            .add_mesh(
                "ground",
                Owner::Permanent,
                Mesh::new(Shape::Plane { width: 10.0, height: 10.0 }).with_material(ground_mat),
            )
            .unwrap();
        world.add_mesh("prop", SCENE, Mesh::new(Shape::cube(1.0))).unwrap();
        world.add_material("propMaterial", SCENE, white()).unwrap();

        let removed = world.remove_unlisted(&["ground".to_string()]);
        assert_eq!(removed, 2);
        assert!(world.contains(ground));
        assert!(world.contains(ground_mat));
        assert_eq!(world.count_owned_by(SCENE), 0);
    }

    #[test]
    fn test_render_stats() {
        let mut world = RenderWorld::new(1);
        world.add_mesh("a", SCENE, Mesh::new(Shape::cube(1.0))).unwrap();
        world
            .add_mesh("b", SCENE, Mesh::new(Shape::cube(1.0)).with_visibility(false))
            .unwrap();
        let mut light = Light::point(Vec3::zeros(), Color::zeros(), 1.0, 1.0);
        light.enabled = false;
        world.add_light("off", SCENE, light).unwrap();

        let stats = world.render();
        assert_eq!(stats.frame, 1);
        assert_eq!(stats.meshes, 2);
        assert_eq!(stats.visible_meshes, 1);
        assert_eq!(stats.active_lights, 0);
        assert_eq!(world.render().frame, 2);
    }

    #[test]
    fn test_advance_drives_particles() {
        let mut world = RenderWorld::new(1);
        let id = world
            .add_particle_system("sparks", SCENE, ParticleSystem::new(Vec3::zeros(), 10))
            .unwrap();
        world.particles_mut(id).unwrap().burst(10);
        world.advance(0.016);
        assert_eq!(world.render().active_particles, 10);
    }

    #[test]
    fn test_pick_nearest_on_layer() {
        let mut world = RenderWorld::new(1);
        let near = world
            .add_mesh(
                "near",
                SCENE,
                Mesh::new(Shape::Sphere { diameter: 1.0 })
                    .at(Vec3::new(0.0, 0.0, 5.0))
                    .pickable(PickLayers::INTERACTIVE),
            )
            .unwrap();
        world
            .add_mesh(
                "far",
                SCENE,
                Mesh::new(Shape::Sphere { diameter: 1.0 })
                    .at(Vec3::new(0.0, 0.0, 10.0))
                    .pickable(PickLayers::INTERACTIVE),
            )
            .unwrap();
        world
            .add_mesh("decor", SCENE, Mesh::new(Shape::Sphere { diameter: 1.0 }).at(Vec3::new(0.0, 0.0, 2.0)))
            .unwrap();

        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, 1.0));
        let hit = world.pick(&ray, PickLayers::INTERACTIVE).map(|h| h.id);
        assert_eq!(hit, Some(near));
        assert!(world.pick(&ray, PickLayers::EFFECTS).is_none());
    }
}
