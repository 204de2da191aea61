//! Building blocks shared by every festival scene

use festival_engine::prelude::*;

/// Lighting and clear colour of one festival
#[derive(Debug, Clone, Copy)]
pub struct Atmosphere {
    /// Sky light colour
    pub ambient: Color,
    /// Sky light intensity
    pub ambient_intensity: f32,
    /// Direction the key light travels
    pub sun_direction: Vec3,
    /// Key light colour
    pub sun: Color,
    /// Key light intensity
    pub sun_intensity: f32,
    /// Clear colour
    pub background: Color,
}

impl Atmosphere {
    /// Allocate the scene's ambient and key lights and set the background
    pub fn build(&self, resources: &mut SceneResources, world: &mut RenderWorld) -> Result<(), SceneError> {
        resources.light(
            world,
            "ambientLight",
            Light::hemispheric(Vec3::new(0.0, 1.0, 0.0), self.ambient, self.ambient_intensity),
        )?;
        resources.light(
            world,
            "keyLight",
            Light::directional(self.sun_direction, self.sun, self.sun_intensity),
        )?;
        world.set_background(self.background);
        Ok(())
    }
}

/// Point light that starts switched off
pub fn dark_point_light(position: Vec3, color: Color, intensity: f32, range: f32) -> Light {
    Light {
        enabled: false,
        ..Light::point(position, color, intensity, range)
    }
}

/// Switch a light on or off; returns false if the handle is stale
pub fn set_light(world: &mut RenderWorld, id: ResourceId, enabled: bool) -> bool {
    match world.light_mut(id) {
        Ok(light) => {
            light.enabled = enabled;
            true
        }
        Err(_) => false,
    }
}

/// Show or hide a mesh
pub fn set_visible(world: &mut RenderWorld, id: ResourceId, visible: bool) {
    if let Ok(mesh) = world.mesh_mut(id) {
        mesh.visible = visible;
    }
}

/// Move a mesh
pub fn move_mesh(world: &mut RenderWorld, id: ResourceId, position: Vec3) {
    if let Ok(mesh) = world.mesh_mut(id) {
        mesh.position = position;
    }
}

/// Set a material's glow
pub fn set_emissive(world: &mut RenderWorld, id: ResourceId, emissive: Color) {
    if let Ok(material) = world.material_mut(id) {
        material.emissive = emissive;
    }
}

/// Start continuous emission on a particle system
pub fn start_particles(world: &mut RenderWorld, id: ResourceId) {
    if let Ok(system) = world.particles_mut(id) {
        system.start();
    }
}

/// Stop a particle system; live particles finish their lifetime
pub fn stop_particles(world: &mut RenderWorld, id: ResourceId) {
    if let Ok(system) = world.particles_mut(id) {
        system.stop();
    }
}

/// One-shot burst of `count` particles
pub fn burst_particles(world: &mut RenderWorld, id: ResourceId, count: usize) {
    if let Ok(system) = world.particles_mut(id) {
        system.burst(count);
    }
}

/// Mesh paired with its own material, so it can be recoloured alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Body {
    /// Mesh handle
    pub mesh: ResourceId,
    /// Material handle
    pub material: ResourceId,
}

impl Body {
    /// Allocate a material and a mesh using it
    pub fn build(
        resources: &mut SceneResources,
        world: &mut RenderWorld,
        name: &str,
        mesh: Mesh,
        material: Material,
    ) -> Result<Self, SceneError> {
        let material = resources.material(world, &format!("{}Material", name), material)?;
        let mesh = resources.mesh(world, name, mesh.with_material(material))?;
        Ok(Self { mesh, material })
    }

    /// Whether `id` is this body's mesh
    pub fn is(&self, id: ResourceId) -> bool {
        self.mesh == id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atmosphere_tracks_two_lights() {
        let mut world = RenderWorld::new(0);
        let mut resources = SceneResources::new(FestivalId::Holi);
        let atmosphere = Atmosphere {
            ambient: Color::new(1.0, 1.0, 1.0),
            ambient_intensity: 0.8,
            sun_direction: Vec3::new(0.0, -1.0, 0.0),
            sun: Color::new(1.0, 1.0, 0.9),
            sun_intensity: 0.6,
            background: Color::new(0.5, 0.7, 1.0),
        };
        atmosphere.build(&mut resources, &mut world).unwrap();
        assert_eq!(resources.len(), 2);
        assert_eq!(world.background(), Color::new(0.5, 0.7, 1.0));
    }

    #[test]
    fn test_body_material_follows_mesh() {
        let mut world = RenderWorld::new(0);
        let mut resources = SceneResources::new(FestivalId::Ganesh);
        let body = Body::build(
            &mut resources,
            &mut world,
            "idol",
            Mesh::new(Shape::Sphere { diameter: 2.0 }),
            Material::new(Color::new(1.0, 0.5, 0.0)),
        )
        .unwrap();
        assert_eq!(world.mesh(body.mesh).unwrap().material, Some(body.material));
        assert!(body.is(body.mesh));
        assert!(!body.is(body.material));
    }

    #[test]
    fn test_dark_light_can_be_switched() {
        let mut world = RenderWorld::new(0);
        let id = world
            .add_light("lamp", festival_engine::render::Owner::Permanent, dark_point_light(Vec3::zeros(), Color::x(), 1.0, 5.0))
            .unwrap();
        assert!(!world.light(id).unwrap().enabled);
        assert!(set_light(&mut world, id, true));
        assert!(world.light(id).unwrap().enabled);
        world.remove(id);
        assert!(!set_light(&mut world, id, true));
    }
}
