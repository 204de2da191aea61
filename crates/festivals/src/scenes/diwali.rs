//! Diwali - the festival of lights
//!
//! A courtyard at dusk with a ring of clay diyas around a rangoli. Picking a
//! diya lights it; lighting every diya opens the cultural panel. Fireworks
//! burst overhead and are freed a few seconds later.

use std::any::Any;

use festival_engine::foundation::math::utils::ring_point;
use festival_engine::prelude::*;
use festival_engine::scene::ProgressValue;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::common::{self, Atmosphere, Body};

const DIYA_COUNT: usize = 12;
const DIYA_RING_RADIUS: f32 = 6.0;
const STAGGER_SECONDS: f32 = 0.3;
const FIREWORK_LIFETIME: f32 = 3.0;

fn highlight() -> Color {
    Color::new(0.4, 0.3, 0.1)
}

fn lit_glow() -> Color {
    Color::new(0.3, 0.15, 0.0)
}

/// One clay lamp
#[derive(Debug, Clone)]
pub struct Diya {
    /// Clay bowl
    pub base: Body,
    /// Flame, hidden until lit
    pub flame: ResourceId,
    /// Warm point light, off until lit
    pub light: ResourceId,
    /// World position of the bowl
    pub position: Vec3,
    /// Whether the diya burns
    pub is_lit: bool,
    scheduled: Option<TaskId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiwaliTask {
    LightDiya(usize),
    ExpireFirework(ResourceId),
}

/// Diwali courtyard
pub struct DiwaliScene {
    collaborators: Collaborators,
    resources: SceneResources,
    scheduler: Scheduler<DiwaliTask>,
    rng: StdRng,
    diyas: Vec<Diya>,
    rangoli: Option<ResourceId>,
    fireworks: Vec<ResourceId>,
    hovered: Option<usize>,
    info_shown: bool,
    elapsed: f32,
    loaded: bool,
}

impl DiwaliScene {
    /// Create an unbuilt scene
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            collaborators,
            resources: SceneResources::new(FestivalId::Diwali),
            scheduler: Scheduler::new(),
            rng: StdRng::seed_from_u64(0xD1A),
            diyas: Vec::new(),
            rangoli: None,
            fireworks: Vec::new(),
            hovered: None,
            info_shown: false,
            elapsed: 0.0,
            loaded: false,
        }
    }

    /// Diyas in ring order
    pub fn diyas(&self) -> &[Diya] {
        &self.diyas
    }

    /// Number of lit diyas
    pub fn lit_count(&self) -> usize {
        self.diyas.iter().filter(|d| d.is_lit).count()
    }

    /// Fireworks still in the air
    pub fn active_fireworks(&self) -> usize {
        self.fireworks.len()
    }

    /// Diya currently highlighted by hover
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Light diya `index`; returns false if already lit or out of range
    pub fn light_diya(&mut self, world: &mut RenderWorld, index: usize) -> bool {
        let Some(diya) = self.diyas.get_mut(index) else {
            log::warn!("No diya at index {}", index);
            return false;
        };
        if diya.is_lit {
            return false;
        }
        diya.is_lit = true;
        if let Some(task) = diya.scheduled.take() {
            self.scheduler.cancel(task);
        }
        common::set_visible(world, diya.flame, true);
        common::set_light(world, diya.light, true);
        common::set_emissive(world, diya.base.material, lit_glow());

        let lit = self.lit_count();
        log::debug!("Diya {} lit ({}/{})", index, lit, self.diyas.len());
        self.collaborators.notify_diya_lit(lit);
        self.collaborators.add_user_interaction(&format!("Lit diya {}", index + 1));
        self.collaborators
            .record_interaction(FestivalId::Diwali, "diyas_lit", ProgressValue::Count(lit as u32));

        if lit == self.diyas.len() && !self.info_shown {
            self.info_shown = true;
            self.collaborators.show_cultural_info(FestivalId::Diwali, "diyas");
        }
        true
    }

    /// Light every unlit diya one after another
    ///
    /// Returns the number of diyas newly scheduled.
    pub fn light_all_diyas(&mut self) -> usize {
        let mut delay = 0.0;
        let mut scheduled = 0;
        for (index, diya) in self.diyas.iter_mut().enumerate() {
            if diya.is_lit || diya.scheduled.is_some() {
                continue;
            }
            diya.scheduled = Some(self.scheduler.schedule(delay, DiwaliTask::LightDiya(index)));
            delay += STAGGER_SECONDS;
            scheduled += 1;
        }
        if scheduled > 0 {
            self.collaborators.add_user_interaction("Lit all diyas");
        }
        scheduled
    }

    /// Burst a firework somewhere above the courtyard
    pub fn launch_firework(&mut self, world: &mut RenderWorld) -> Result<ResourceId, SceneError> {
        let position = Vec3::new(
            self.rng.gen_range(-10.0..10.0),
            self.rng.gen_range(12.0..18.0),
            self.rng.gen_range(0.0..10.0),
        );
        let hue = self.rng.gen_range(0..3);
        let (start, end) = match hue {
            0 => (rgb8(255, 215, 0), rgb8(255, 80, 0)),
            1 => (rgb8(255, 60, 120), rgb8(180, 0, 255)),
            _ => (rgb8(80, 200, 255), rgb8(255, 255, 255)),
        };
        let name = format!("firework{}", self.fireworks.len());
        let id = self.resources.particles(
            world,
            &name,
            ParticleSystem::new(position, 300)
                .with_lifetime(0.8, 1.6)
                .with_directions(Vec3::new(-4.0, -4.0, -4.0), Vec3::new(4.0, 4.0, 4.0))
                .with_gravity(Vec3::new(0.0, -3.0, 0.0))
                .with_colors(start, end),
        )?;
        common::burst_particles(world, id, 300);
        self.fireworks.push(id);
        self.scheduler.schedule(FIREWORK_LIFETIME, DiwaliTask::ExpireFirework(id));
        self.collaborators.add_user_interaction("Launched a firework");
        Ok(id)
    }

    fn diya_at(&self, id: ResourceId) -> Option<usize> {
        self.diyas.iter().position(|d| d.base.is(id) || d.flame == id)
    }

    fn run(&mut self, world: &mut RenderWorld, task: DiwaliTask) {
        match task {
            DiwaliTask::LightDiya(index) => {
                if let Some(diya) = self.diyas.get_mut(index) {
                    diya.scheduled = None;
                }
                self.light_diya(world, index);
            }
            DiwaliTask::ExpireFirework(id) => {
                self.fireworks.retain(|&f| f != id);
                self.resources.release(world, id);
            }
        }
    }

    fn build_diyas(&mut self, world: &mut RenderWorld) -> Result<(), SceneError> {
        let flame_material = self.resources.material(
            world,
            "flameMaterial",
            Material::new(rgb8(255, 160, 40)).with_emissive(rgb8(255, 140, 0)),
        )?;

        for i in 0..DIYA_COUNT {
            let position = ring_point(Vec3::new(0.0, 0.15, 4.0), DIYA_RING_RADIUS, i, DIYA_COUNT);
            let base = Body::build(
                &mut self.resources,
                world,
                &format!("diya{}", i),
                Mesh::new(Shape::Cylinder {
                    height: 0.3,
                    diameter_top: 0.8,
                    diameter_bottom: 0.5,
                })
                .at(position)
                .pickable(PickLayers::INTERACTIVE),
                Material::new(rgb8(160, 82, 45)),
            )?;
            let flame = self.resources.mesh(
                world,
                &format!("diyaFlame{}", i),
                Mesh::new(Shape::cone(0.4, 0.2))
                    .at(position + Vec3::new(0.0, 0.35, 0.0))
                    .with_material(flame_material)
                    .with_visibility(false)
                    .pickable(PickLayers::INTERACTIVE),
            )?;
            let light = self.resources.light(
                world,
                &format!("diyaLight{}", i),
                common::dark_point_light(position + Vec3::new(0.0, 0.6, 0.0), rgb8(255, 170, 60), 0.8, 4.0),
            )?;
            self.diyas.push(Diya {
                base,
                flame,
                light,
                position,
                is_lit: false,
                scheduled: None,
            });
        }
        Ok(())
    }

    fn build_courtyard(&mut self, world: &mut RenderWorld) -> Result<(), SceneError> {
        let texture = self.resources.texture(
            world,
            "rangoliTexture",
            Texture::square(
                512,
                TexturePattern::Petals {
                    colors: vec![rgb8(255, 0, 100), rgb8(255, 200, 0), rgb8(0, 180, 120), rgb8(80, 0, 200)],
                    petals: 8,
                },
            ),
        )?;
        let material = self.resources.material(
            world,
            "rangoliMaterial",
            Material::new(Color::new(1.0, 1.0, 1.0)).with_texture(texture),
        )?;
        self.rangoli = Some(self.resources.mesh(
            world,
            "rangoli",
            Mesh::new(Shape::Disc { radius: 3.0 })
                .at(Vec3::new(0.0, 0.02, 4.0))
                .with_material(material)
                .pickable(PickLayers::INTERACTIVE),
        )?);

        let wall = self
            .resources
            .material(world, "wallMaterial", Material::new(rgb8(230, 200, 160)))?;
        for (i, x) in [-12.0_f32, 12.0].into_iter().enumerate() {
            self.resources.mesh(
                world,
                &format!("wall{}", i),
                Mesh::new(Shape::Box {
                    width: 0.5,
                    height: 4.0,
                    depth: 20.0,
                })
                .at(Vec3::new(x, 2.0, 4.0))
                .with_material(wall),
            )?;
        }
        self.resources.mesh(
            world,
            "backWall",
            Mesh::new(Shape::Box {
                width: 24.0,
                height: 6.0,
                depth: 0.5,
            })
            .at(Vec3::new(0.0, 3.0, 14.0))
            .with_material(wall),
        )?;

        let lantern = self.resources.material(
            world,
            "lanternMaterial",
            Material::new(rgb8(255, 90, 40)).with_emissive(rgb8(200, 60, 20)),
        )?;
        for i in 0..5 {
            let x = -8.0 + 4.0 * i as f32;
            self.resources.mesh(
                world,
                &format!("lantern{}", i),
                Mesh::new(Shape::Sphere { diameter: 1.0 })
                    .at(Vec3::new(x, 5.5, 13.0))
                    .with_material(lantern),
            )?;
        }
        Ok(())
    }
}

impl FestivalScene for DiwaliScene {
    fn id(&self) -> FestivalId {
        FestivalId::Diwali
    }

    fn create(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
        if self.loaded {
            return Ok(());
        }
        Atmosphere {
            ambient: rgb8(90, 70, 140),
            ambient_intensity: 0.3,
            sun_direction: Vec3::new(0.5, -1.0, 0.8),
            sun: rgb8(255, 180, 120),
            sun_intensity: 0.2,
            background: rgb8(15, 10, 40),
        }
        .build(&mut self.resources, ctx.world)?;
        self.build_courtyard(ctx.world)?;
        self.build_diyas(ctx.world)?;

        let sparkles = self.resources.particles(
            ctx.world,
            "sparkles",
            ParticleSystem::new(Vec3::new(0.0, 0.5, 4.0), 120)
                .with_emit_rate(20.0)
                .with_lifetime(1.0, 2.5)
                .with_directions(Vec3::new(-0.3, 0.5, -0.3), Vec3::new(0.3, 1.5, 0.3))
                .with_colors(rgb8(255, 230, 120), rgb8(255, 140, 0)),
        )?;
        common::start_particles(ctx.world, sparkles);

        self.loaded = true;
        log::info!("Diwali scene created: {} diyas", self.diyas.len());
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn update(&mut self, ctx: &mut SceneContext<'_>, delta_time: f32) {
        self.elapsed += delta_time;
        for task in self.scheduler.advance(delta_time) {
            self.run(ctx.world, task);
        }
        for (i, diya) in self.diyas.iter().filter(|d| d.is_lit).enumerate() {
            if let Ok(light) = ctx.world.light_mut(diya.light) {
                light.intensity = 0.8 + 0.1 * (self.elapsed * 9.0 + i as f32).sin();
            }
        }
    }

    fn handle_pick(&mut self, ctx: &mut SceneContext<'_>, id: ResourceId) -> bool {
        if let Some(index) = self.diya_at(id) {
            self.light_diya(ctx.world, index);
            return true;
        }
        if self.rangoli == Some(id) {
            self.collaborators.show_cultural_info(FestivalId::Diwali, "rangoli");
            return true;
        }
        false
    }

    fn handle_hover(&mut self, ctx: &mut SceneContext<'_>, id: Option<ResourceId>) {
        let next = id.and_then(|id| self.diya_at(id));
        if next == self.hovered {
            return;
        }
        if let Some(previous) = self.hovered.and_then(|i| self.diyas.get(i)) {
            let glow = if previous.is_lit {
                lit_glow()
            } else {
                Color::zeros()
            };
            common::set_emissive(ctx.world, previous.base.material, glow);
        }
        if let Some(diya) = next.and_then(|i| self.diyas.get(i)) {
            common::set_emissive(ctx.world, diya.base.material, highlight());
        }
        self.hovered = next;
    }

    fn vantage(&self) -> CameraVantage {
        CameraVantage::new(Vec3::new(0.0, 8.0, -12.0), Vec3::new(0.0, 1.0, 4.0))
    }

    fn tracked_resources(&self) -> usize {
        self.resources.len()
    }

    fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    fn dispose(&mut self, ctx: &mut SceneContext<'_>) {
        let cancelled = self.scheduler.drain();
        let freed = self.resources.release_all(ctx.world);
        self.diyas.clear();
        self.fireworks.clear();
        self.rangoli = None;
        self.hovered = None;
        self.loaded = false;
        log::debug!("Diwali scene disposed: {} resources freed, {} tasks cancelled", freed, cancelled);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
