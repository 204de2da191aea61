//! Kumbh Mela at the confluence
//!
//! Stone ghats step down to the river where sadhus sit in meditation. A
//! pilgrim can take the holy dip (one dip at a time) and visitors float
//! diyas that drift downstream until they sink out of sight.

use std::any::Any;

use festival_engine::prelude::*;
use festival_engine::scene::ProgressValue;

use super::common::{self, Atmosphere, Body};

const SADHUS: usize = 5;
const DIP_SECONDS: f32 = 3.0;
const DIP_DEPTH: f32 = 1.6;
const DIYA_FLOAT_SECONDS: f32 = 12.0;
const DIYA_DRIFT: f32 = 1.5;
const MAX_FLOATING_DIYAS: usize = 24;

/// A meditating sadhu on the ghat
#[derive(Debug, Clone)]
pub struct Sadhu {
    /// Saffron-robed body
    pub body: Body,
    /// Head
    pub head: ResourceId,
    /// Whether the visitor greeted this sadhu
    pub greeted: bool,
}

/// A diya drifting on the river
#[derive(Debug, Clone, Copy)]
pub struct FloatingDiya {
    /// Lamp mesh and its material
    pub body: Body,
    /// Flame glow
    pub light: ResourceId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KumbhTask {
    DipComplete,
    SinkDiya(ResourceId),
}

/// Sangam ghats during the Kumbh
pub struct KumbhScene {
    collaborators: Collaborators,
    resources: SceneResources,
    scheduler: Scheduler<KumbhTask>,
    sadhus: Vec<Sadhu>,
    pilgrim: Option<(ResourceId, Vec3)>,
    river: Option<ResourceId>,
    floating: Vec<FloatingDiya>,
    floated_total: usize,
    dipping: bool,
    dips: u32,
    loaded: bool,
}

impl KumbhScene {
    /// Create an unbuilt scene
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            collaborators,
            resources: SceneResources::new(FestivalId::Kumbh),
            scheduler: Scheduler::new(),
            sadhus: Vec::new(),
            pilgrim: None,
            river: None,
            floating: Vec::new(),
            floated_total: 0,
            dipping: false,
            dips: 0,
            loaded: false,
        }
    }

    /// Sadhus along the ghat
    pub fn sadhus(&self) -> &[Sadhu] {
        &self.sadhus
    }

    /// Whether a dip is in progress
    pub fn is_dipping(&self) -> bool {
        self.dipping
    }

    /// Completed holy dips
    pub fn dips(&self) -> u32 {
        self.dips
    }

    /// Diyas still afloat
    pub fn floating_diyas(&self) -> &[FloatingDiya] {
        &self.floating
    }

    /// Greet sadhu `index`; returns false if already greeted or out of range
    pub fn greet_sadhu(&mut self, index: usize) -> bool {
        let Some(sadhu) = self.sadhus.get_mut(index) else {
            log::warn!("No sadhu at index {}", index);
            return false;
        };
        if sadhu.greeted {
            return false;
        }
        sadhu.greeted = true;
        let greeted = self.sadhus.iter().filter(|s| s.greeted).count();
        self.collaborators.add_user_interaction("Greeted a sadhu");
        self.collaborators
            .record_interaction(FestivalId::Kumbh, "sadhus_greeted", ProgressValue::Count(greeted as u32));
        if greeted == 1 {
            self.collaborators.show_cultural_info(FestivalId::Kumbh, "sadhus");
        }
        true
    }

    /// Lower the pilgrim into the river; returns false while a dip is in progress
    pub fn perform_holy_dip(&mut self, world: &mut RenderWorld) -> bool {
        if self.dipping {
            return false;
        }
        let Some((pilgrim, rest)) = self.pilgrim else {
            return false;
        };
        self.dipping = true;
        common::move_mesh(world, pilgrim, rest - Vec3::new(0.0, DIP_DEPTH, 0.0));
        self.scheduler.schedule(DIP_SECONDS, KumbhTask::DipComplete);
        self.collaborators.add_user_interaction("Took a holy dip");
        true
    }

    fn finish_dip(&mut self, world: &mut RenderWorld) {
        self.dipping = false;
        self.dips += 1;
        if let Some((pilgrim, rest)) = self.pilgrim {
            common::move_mesh(world, pilgrim, rest);
        }
        self.collaborators
            .record_interaction(FestivalId::Kumbh, "holy_dips", ProgressValue::Count(self.dips));
        if self.dips == 1 {
            self.collaborators.show_cultural_info(FestivalId::Kumbh, "holy_dip");
        }
    }

    /// Set a new diya afloat near the ghat
    ///
    /// The oldest diya sinks early when too many are afloat.
    pub fn float_diya(&mut self, world: &mut RenderWorld) -> Result<ResourceId, SceneError> {
        if self.floating.len() >= MAX_FLOATING_DIYAS {
            let oldest = self.floating[0].body.mesh;
            self.sink(world, oldest);
        }
        let index = self.floated_total;
        let x = -4.0 + (index % 5) as f32 * 2.0;
        let position = Vec3::new(x, 0.15, -6.0);
        let body = Body::build(
            &mut self.resources,
            world,
            &format!("floatingDiya{}", index),
            Mesh::new(Shape::Cylinder {
                height: 0.2,
                diameter_top: 0.5,
                diameter_bottom: 0.3,
            })
            .at(position),
            Material::new(rgb8(205, 92, 92)).with_emissive(rgb8(255, 140, 0)),
        )?;
        let light = self.resources.light(
            world,
            &format!("floatingDiya{}Light", index),
            Light::point(position + Vec3::new(0.0, 0.3, 0.0), rgb8(255, 160, 60), 0.5, 3.0),
        )?;
        self.floating.push(FloatingDiya { body, light });
        self.floated_total += 1;
        self.scheduler
            .schedule(DIYA_FLOAT_SECONDS, KumbhTask::SinkDiya(body.mesh));
        self.collaborators.add_user_interaction("Floated a diya on the river");
        self.collaborators.record_interaction(
            FestivalId::Kumbh,
            "diyas_floated",
            ProgressValue::Count(self.floated_total as u32),
        );
        Ok(body.mesh)
    }

    fn sink(&mut self, world: &mut RenderWorld, mesh: ResourceId) {
        let Some(pos) = self.floating.iter().position(|d| d.body.is(mesh)) else {
            return;
        };
        let diya = self.floating.remove(pos);
        self.resources.release(world, diya.body.mesh);
        self.resources.release(world, diya.body.material);
        self.resources.release(world, diya.light);
    }

    fn build_ghats(&mut self, world: &mut RenderWorld) -> Result<(), SceneError> {
        let stone = self
            .resources
            .material(world, "ghatMaterial", Material::new(rgb8(205, 190, 160)))?;
        for step in 0..5 {
            let depth = 2.0;
            self.resources.mesh(
                world,
                &format!("ghatStep{}", step),
                Mesh::new(Shape::Box {
                    width: 30.0,
                    height: 0.5,
                    depth,
                })
                .at(Vec3::new(0.0, 0.25 + 0.5 * step as f32, -2.0 + depth * step as f32))
                .with_material(stone),
            )?;
        }

        let water = Body::build(
            &mut self.resources,
            world,
            "river",
            Mesh::new(Shape::Plane {
                width: 60.0,
                height: 14.0,
            })
            .at(Vec3::new(0.0, 0.05, -10.0))
            .pickable(PickLayers::INTERACTIVE),
            Material::new(rgb8(70, 130, 180)).with_alpha(0.75),
        )?;
        self.river = Some(water.mesh);

        let mist = self.resources.particles(
            world,
            "riverMist",
            ParticleSystem::new(Vec3::new(0.0, 0.3, -10.0), 100)
                .with_emit_rate(10.0)
                .with_lifetime(3.0, 6.0)
                .with_directions(Vec3::new(-0.3, 0.05, -0.3), Vec3::new(0.3, 0.2, 0.3))
                .with_colors(rgb8(230, 230, 240), rgb8(200, 200, 210)),
        )?;
        common::start_particles(world, mist);
        Ok(())
    }

    fn build_people(&mut self, world: &mut RenderWorld) -> Result<(), SceneError> {
        let skin = self
            .resources
            .material(world, "skinMaterial", Material::new(rgb8(160, 110, 70)))?;
        for i in 0..SADHUS {
            let position = Vec3::new(-8.0 + 4.0 * i as f32, 2.5, 6.0);
            let body = Body::build(
                &mut self.resources,
                world,
                &format!("sadhu{}", i),
                Mesh::new(Shape::Cylinder {
                    height: 1.2,
                    diameter_top: 0.6,
                    diameter_bottom: 1.2,
                })
                .at(position)
                .pickable(PickLayers::INTERACTIVE),
                Material::new(rgb8(244, 196, 48)),
            )?;
            let head = self.resources.mesh(
                world,
                &format!("sadhu{}Head", i),
                Mesh::new(Shape::Sphere { diameter: 0.5 })
                    .at(position + Vec3::new(0.0, 0.85, 0.0))
                    .with_material(skin)
                    .pickable(PickLayers::INTERACTIVE),
            )?;
            self.sadhus.push(Sadhu {
                body,
                head,
                greeted: false,
            });
        }

        let rest = Vec3::new(3.0, 0.9, -4.0);
        let pilgrim = self.resources.mesh(
            world,
            "pilgrim",
            Mesh::new(Shape::cylinder(1.8, 0.6))
                .at(rest)
                .with_material(skin)
                .pickable(PickLayers::INTERACTIVE),
        )?;
        self.pilgrim = Some((pilgrim, rest));
        Ok(())
    }
}

impl FestivalScene for KumbhScene {
    fn id(&self) -> FestivalId {
        FestivalId::Kumbh
    }

    fn create(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
        if self.loaded {
            return Ok(());
        }
        Atmosphere {
            ambient: rgb8(255, 240, 220),
            ambient_intensity: 0.7,
            sun_direction: Vec3::new(1.0, -0.6, -0.4),
            sun: rgb8(255, 200, 140),
            sun_intensity: 0.8,
            background: rgb8(255, 200, 150),
        }
        .build(&mut self.resources, ctx.world)?;
        self.build_ghats(ctx.world)?;
        self.build_people(ctx.world)?;
        self.loaded = true;
        log::info!("Kumbh scene created: {} sadhus", self.sadhus.len());
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn update(&mut self, ctx: &mut SceneContext<'_>, delta_time: f32) {
        for diya in &self.floating {
            if let Ok(mesh) = ctx.world.mesh_mut(diya.body.mesh) {
                mesh.position.x += DIYA_DRIFT * delta_time;
            }
        }
        for task in self.scheduler.advance(delta_time) {
            match task {
                KumbhTask::DipComplete => self.finish_dip(ctx.world),
                KumbhTask::SinkDiya(mesh) => self.sink(ctx.world, mesh),
            }
        }
    }

    fn handle_pick(&mut self, ctx: &mut SceneContext<'_>, id: ResourceId) -> bool {
        if let Some(index) = self.sadhus.iter().position(|s| s.body.is(id) || s.head == id) {
            self.greet_sadhu(index);
            return true;
        }
        if self.pilgrim.is_some_and(|(pilgrim, _)| pilgrim == id) {
            self.perform_holy_dip(ctx.world);
            return true;
        }
        if self.river == Some(id) {
            if let Err(error) = self.float_diya(ctx.world) {
                log::warn!("Could not float a diya: {}", error);
            }
            return true;
        }
        false
    }

    fn vantage(&self) -> CameraVantage {
        CameraVantage::new(Vec3::new(-10.0, 8.0, -16.0), Vec3::new(0.0, 1.0, 0.0))
    }

    fn tracked_resources(&self) -> usize {
        self.resources.len()
    }

    fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    fn dispose(&mut self, ctx: &mut SceneContext<'_>) {
        self.scheduler.drain();
        let freed = self.resources.release_all(ctx.world);
        self.sadhus.clear();
        self.floating.clear();
        self.pilgrim = None;
        self.river = None;
        self.dipping = false;
        self.loaded = false;
        log::debug!("Kumbh scene disposed: {} resources freed", freed);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
