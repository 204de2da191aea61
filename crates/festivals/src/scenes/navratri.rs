//! Navratri - nine nights of the goddess
//!
//! A garba circle in front of a shrine, flanked by nine lamp pillars, one per
//! night, each in that night's colour.

use std::any::Any;

use festival_engine::foundation::math::utils::ring_point;
use festival_engine::prelude::*;
use festival_engine::scene::ProgressValue;

use super::common::{self, Atmosphere, Body};

const DANCERS: usize = 10;
const GARBA_RADIUS: f32 = 5.0;
const GARBA_SPEED: f32 = 0.6;
const AARTI_SECONDS: f32 = 6.0;

/// Colour worn on each of the nine nights
const NIGHT_COLORS: [(u8, u8, u8); 9] = [
    (255, 215, 0),
    (0, 160, 70),
    (128, 128, 128),
    (255, 140, 0),
    (245, 245, 245),
    (220, 20, 60),
    (65, 105, 225),
    (255, 105, 180),
    (128, 0, 128),
];

/// A dancer in the garba circle
#[derive(Debug, Clone)]
pub struct Dancer {
    /// Body mesh
    pub body: Body,
    /// Head mesh
    pub head: ResourceId,
    /// Starting angle on the circle
    pub phase: f32,
}

/// One of the nine night lamps
#[derive(Debug, Clone)]
pub struct NightLamp {
    /// Night, 1 to 9
    pub day: u8,
    /// Pillar mesh
    pub pillar: ResourceId,
    /// Flame mesh, hidden until lit
    pub flame: ResourceId,
    /// Point light, off until lit
    pub light: ResourceId,
    /// Whether the lamp burns
    pub is_lit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NavratriTask {
    AartiComplete,
}

/// Garba ground on a Navratri night
pub struct NavratriScene {
    collaborators: Collaborators,
    resources: SceneResources,
    scheduler: Scheduler<NavratriTask>,
    dancers: Vec<Dancer>,
    lamps: Vec<NightLamp>,
    shrine: Option<ResourceId>,
    aarti_plate: Option<ResourceId>,
    aarti_smoke: Option<ResourceId>,
    aarti_light: Option<ResourceId>,
    garba_angle: f32,
    dancing: bool,
    aarti_performed: bool,
    aarti_active: bool,
    loaded: bool,
}

impl NavratriScene {
    /// Create an unbuilt scene
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            collaborators,
            resources: SceneResources::new(FestivalId::Navratri),
            scheduler: Scheduler::new(),
            dancers: Vec::new(),
            lamps: Vec::new(),
            shrine: None,
            aarti_plate: None,
            aarti_smoke: None,
            aarti_light: None,
            garba_angle: 0.0,
            dancing: false,
            aarti_performed: false,
            aarti_active: false,
            loaded: false,
        }
    }

    /// Garba circle centre
    fn center() -> Vec3 {
        Vec3::new(0.0, 0.0, 5.0)
    }

    /// Dancers in circle order
    pub fn dancers(&self) -> &[Dancer] {
        &self.dancers
    }

    /// Night lamps, first night first
    pub fn lamps(&self) -> &[NightLamp] {
        &self.lamps
    }

    /// Whether the garba is under way
    pub fn is_dancing(&self) -> bool {
        self.dancing
    }

    /// Whether the aarti is being performed right now
    pub fn is_aarti_active(&self) -> bool {
        self.aarti_active
    }

    /// Start the garba; returns false if the circle already dances
    pub fn start_garba(&mut self) -> bool {
        if self.dancing {
            return false;
        }
        self.dancing = true;
        self.collaborators.add_user_interaction("Started the garba");
        self.collaborators
            .record_interaction(FestivalId::Navratri, "garba", ProgressValue::Flag(true));
        self.collaborators.show_cultural_info(FestivalId::Navratri, "garba");
        true
    }

    /// Light the lamp of night `day` (1 to 9); returns false if lit or no such night
    pub fn light_navratri_lamp(&mut self, world: &mut RenderWorld, day: u8) -> bool {
        let Some(lamp) = self.lamps.iter_mut().find(|l| l.day == day) else {
            log::warn!("Navratri has no night {}", day);
            return false;
        };
        if lamp.is_lit {
            return false;
        }
        lamp.is_lit = true;
        common::set_visible(world, lamp.flame, true);
        common::set_light(world, lamp.light, true);

        let lit = self.lamps.iter().filter(|l| l.is_lit).count();
        self.collaborators
            .add_user_interaction(&format!("Lit the lamp of night {}", day));
        self.collaborators
            .record_interaction(FestivalId::Navratri, "lamps_lit", ProgressValue::Count(lit as u32));
        if lit == self.lamps.len() {
            self.collaborators.show_cultural_info(FestivalId::Navratri, "nine_nights");
        }
        true
    }

    /// Perform the aarti at the shrine; returns false if already performed
    pub fn perform_aarti(&mut self, world: &mut RenderWorld) -> bool {
        if self.aarti_performed {
            return false;
        }
        self.aarti_performed = true;
        self.aarti_active = true;
        if let Some(smoke) = self.aarti_smoke {
            common::start_particles(world, smoke);
        }
        if let Some(light) = self.aarti_light {
            common::set_light(world, light, true);
        }
        self.scheduler.schedule(AARTI_SECONDS, NavratriTask::AartiComplete);
        self.collaborators.add_user_interaction("Performed the aarti");
        true
    }

    fn finish_aarti(&mut self, world: &mut RenderWorld) {
        self.aarti_active = false;
        if let Some(smoke) = self.aarti_smoke {
            common::stop_particles(world, smoke);
        }
        self.collaborators
            .record_interaction(FestivalId::Navratri, "aarti", ProgressValue::Flag(true));
        self.collaborators.show_cultural_info(FestivalId::Navratri, "aarti");
    }

    fn dancer_position(&self, dancer: &Dancer) -> Vec3 {
        let angle = dancer.phase + self.garba_angle;
        Self::center() + Vec3::new(GARBA_RADIUS * angle.cos(), 0.8, GARBA_RADIUS * angle.sin())
    }

    fn build_circle(&mut self, world: &mut RenderWorld) -> Result<(), SceneError> {
        let skin = self
            .resources
            .material(world, "skinMaterial", Material::new(rgb8(198, 134, 66)))?;
        for i in 0..DANCERS {
            let phase = std::f32::consts::TAU * i as f32 / DANCERS as f32;
            let (r, g, b) = NIGHT_COLORS[i % NIGHT_COLORS.len()];
            let position = ring_point(Self::center(), GARBA_RADIUS, i, DANCERS) + Vec3::new(0.0, 0.8, 0.0);
            let body = Body::build(
                &mut self.resources,
                world,
                &format!("dancer{}", i),
                Mesh::new(Shape::Cylinder {
                    height: 1.6,
                    diameter_top: 0.4,
                    diameter_bottom: 1.2,
                })
                .at(position)
                .pickable(PickLayers::INTERACTIVE),
                Material::new(rgb8(r, g, b)),
            )?;
            let head = self.resources.mesh(
                world,
                &format!("dancer{}Head", i),
                Mesh::new(Shape::Sphere { diameter: 0.45 })
                    .at(position + Vec3::new(0.0, 1.05, 0.0))
                    .with_material(skin),
            )?;
            self.dancers.push(Dancer { body, head, phase });
        }

        let floor_texture = self.resources.texture(
            world,
            "garbaFloorTexture",
            Texture::square(512, TexturePattern::Rings(vec![rgb8(255, 200, 0), rgb8(200, 30, 60), rgb8(120, 0, 120)])),
        )?;
        let floor = self.resources.material(
            world,
            "garbaFloorMaterial",
            Material::new(Color::new(1.0, 1.0, 1.0)).with_texture(floor_texture),
        )?;
        self.resources.mesh(
            world,
            "garbaFloor",
            Mesh::new(Shape::Disc { radius: GARBA_RADIUS + 1.5 })
                .at(Self::center() + Vec3::new(0.0, 0.02, 0.0))
                .with_material(floor),
        )?;
        Ok(())
    }

    fn build_lamps(&mut self, world: &mut RenderWorld) -> Result<(), SceneError> {
        let stone = self
            .resources
            .material(world, "pillarMaterial", Material::new(rgb8(190, 170, 140)))?;
        for (i, &(r, g, b)) in NIGHT_COLORS.iter().enumerate() {
            let day = i as u8 + 1;
            let x = -12.0 + 3.0 * i as f32;
            let base = Vec3::new(x, 0.0, 14.0);
            let pillar = self.resources.mesh(
                world,
                &format!("pillar{}", day),
                Mesh::new(Shape::cylinder(3.0, 0.6))
                    .at(base + Vec3::new(0.0, 1.5, 0.0))
                    .with_material(stone)
                    .pickable(PickLayers::INTERACTIVE),
            )?;
            let flame_material = self.resources.material(
                world,
                &format!("night{}FlameMaterial", day),
                Material::new(rgb8(r, g, b)).with_emissive(rgb8(r, g, b)),
            )?;
            let flame = self.resources.mesh(
                world,
                &format!("night{}Flame", day),
                Mesh::new(Shape::cone(0.5, 0.3))
                    .at(base + Vec3::new(0.0, 3.3, 0.0))
                    .with_material(flame_material)
                    .with_visibility(false)
                    .pickable(PickLayers::INTERACTIVE),
            )?;
            let light = self.resources.light(
                world,
                &format!("night{}Light", day),
                common::dark_point_light(base + Vec3::new(0.0, 3.8, 0.0), rgb8(r, g, b), 0.9, 5.0),
            )?;
            self.lamps.push(NightLamp {
                day,
                pillar,
                flame,
                light,
                is_lit: false,
            });
        }
        Ok(())
    }

    fn build_shrine(&mut self, world: &mut RenderWorld) -> Result<(), SceneError> {
        let shrine = Body::build(
            &mut self.resources,
            world,
            "shrine",
            Mesh::new(Shape::Box {
                width: 3.0,
                height: 4.0,
                depth: 2.0,
            })
            .at(Vec3::new(0.0, 2.0, 18.0))
            .pickable(PickLayers::INTERACTIVE),
            Material::new(rgb8(178, 34, 34)).with_emissive(rgb8(40, 0, 0)),
        )?;
        self.shrine = Some(shrine.mesh);

        let brass = self.resources.material(
            world,
            "aartiPlateMaterial",
            Material::new(rgb8(212, 175, 55)).with_emissive(rgb8(60, 40, 0)),
        )?;
        let plate_position = Vec3::new(0.0, 1.2, 16.5);
        self.aarti_plate = Some(self.resources.mesh(
            world,
            "aartiPlate",
            Mesh::new(Shape::cylinder(0.08, 0.9))
                .at(plate_position)
                .with_material(brass)
                .pickable(PickLayers::INTERACTIVE),
        )?);
        self.aarti_smoke = Some(self.resources.particles(
            world,
            "aartiSmoke",
            ParticleSystem::new(plate_position + Vec3::new(0.0, 0.2, 0.0), 120)
                .with_emit_rate(25.0)
                .with_lifetime(1.5, 3.0)
                .with_directions(Vec3::new(-0.1, 0.4, -0.1), Vec3::new(0.1, 0.9, 0.1))
                .with_colors(rgb8(220, 220, 220), rgb8(150, 150, 150)),
        )?);
        self.aarti_light = Some(self.resources.light(
            world,
            "aartiLight",
            common::dark_point_light(plate_position + Vec3::new(0.0, 0.5, 0.0), rgb8(255, 180, 80), 1.2, 6.0),
        )?);
        Ok(())
    }
}

impl FestivalScene for NavratriScene {
    fn id(&self) -> FestivalId {
        FestivalId::Navratri
    }

    fn create(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
        if self.loaded {
            return Ok(());
        }
        Atmosphere {
            ambient: rgb8(120, 80, 160),
            ambient_intensity: 0.4,
            sun_direction: Vec3::new(0.0, -1.0, 1.0),
            sun: rgb8(255, 200, 150),
            sun_intensity: 0.3,
            background: rgb8(25, 10, 45),
        }
        .build(&mut self.resources, ctx.world)?;
        self.build_circle(ctx.world)?;
        self.build_lamps(ctx.world)?;
        self.build_shrine(ctx.world)?;
        self.loaded = true;
        log::info!("Navratri scene created: {} dancers, {} lamps", self.dancers.len(), self.lamps.len());
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn update(&mut self, ctx: &mut SceneContext<'_>, delta_time: f32) {
        for task in self.scheduler.advance(delta_time) {
            match task {
                NavratriTask::AartiComplete => self.finish_aarti(ctx.world),
            }
        }

        if self.dancing {
            self.garba_angle = (self.garba_angle + GARBA_SPEED * delta_time) % std::f32::consts::TAU;
            for dancer in &self.dancers {
                let position = self.dancer_position(dancer);
                common::move_mesh(ctx.world, dancer.body.mesh, position);
                common::move_mesh(ctx.world, dancer.head, position + Vec3::new(0.0, 1.05, 0.0));
            }
        }
    }

    fn handle_pick(&mut self, ctx: &mut SceneContext<'_>, id: ResourceId) -> bool {
        if self.dancers.iter().any(|d| d.body.is(id)) {
            self.start_garba();
            return true;
        }
        if let Some(day) = self.lamps.iter().find(|l| l.pillar == id || l.flame == id).map(|l| l.day) {
            self.light_navratri_lamp(ctx.world, day);
            return true;
        }
        if self.shrine == Some(id) || self.aarti_plate == Some(id) {
            self.perform_aarti(ctx.world);
            return true;
        }
        false
    }

    fn vantage(&self) -> CameraVantage {
        CameraVantage::new(Vec3::new(0.0, 12.0, -10.0), Vec3::new(0.0, 1.0, 8.0))
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
        self.dancers.clear();
        self.lamps.clear();
        self.shrine = None;
        self.aarti_plate = None;
        self.aarti_smoke = None;
        self.aarti_light = None;
        self.dancing = false;
        self.aarti_active = false;
        self.loaded = false;
        log::debug!("Navratri scene disposed: {} resources freed", freed);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenes::testing::{Recorder, Stage};
    use approx::assert_relative_eq;

    fn built() -> (Stage, NavratriScene, Recorder) {
        let recorder = Recorder::default();
        let mut stage = Stage::new();
        let mut scene = NavratriScene::new(recorder.collaborators());
        scene.create(&mut stage.ctx()).unwrap();
        (stage, scene, recorder)
    }

    #[test]
    fn test_garba_moves_dancers() {
        let (mut stage, mut scene, _) = built();
        let dancer = scene.dancers()[0].body.mesh;
        let start = stage.world.mesh(dancer).unwrap().position;

        scene.update(&mut stage.ctx(), 1.0);
        assert_eq!(stage.world.mesh(dancer).unwrap().position, start);

        assert!(scene.start_garba());
        assert!(!scene.start_garba());
        scene.update(&mut stage.ctx(), 1.0);
        let moved = stage.world.mesh(dancer).unwrap().position;
        assert!((moved - start).norm() > 0.1);
        assert_relative_eq!((moved - NavratriScene::center()).xz().norm(), GARBA_RADIUS, epsilon = 1e-4);
    }

    #[test]
    fn test_lamps_light_once_per_night() {
        let (mut stage, mut scene, recorder) = built();
        assert!(scene.light_navratri_lamp(&mut stage.world, 1));
        assert!(!scene.light_navratri_lamp(&mut stage.world, 1));
        assert!(!scene.light_navratri_lamp(&mut stage.world, 0));
        assert!(!scene.light_navratri_lamp(&mut stage.world, 10));
        assert_eq!(recorder.progress("navratri/lamps_lit"), Some(ProgressValue::Count(1)));

        for day in 2..=9 {
            assert!(scene.light_navratri_lamp(&mut stage.world, day));
        }
        assert!(scene.lamps().iter().all(|l| l.is_lit));
        assert_eq!(recorder.info_topics(), vec!["navratri:nine_nights".to_string()]);
    }

    #[test]
    fn test_aarti_runs_once_and_finishes() {
        let (mut stage, mut scene, recorder) = built();
        let plate = scene.aarti_plate.unwrap();
        assert!(scene.handle_pick(&mut stage.ctx(), plate));
        assert!(scene.is_aarti_active());
        assert!(!scene.perform_aarti(&mut stage.world));
        assert_eq!(scene.pending_tasks(), 1);

        scene.update(&mut stage.ctx(), AARTI_SECONDS);
        assert!(!scene.is_aarti_active());
        assert!(!stage.world.particles(scene.aarti_smoke.unwrap()).unwrap().is_emitting());
        assert_eq!(recorder.progress("navratri/aarti"), Some(ProgressValue::Flag(true)));
    }

    #[test]
    fn test_dispose_cancels_aarti() {
        let (mut stage, mut scene, recorder) = built();
        scene.perform_aarti(&mut stage.world);
        scene.dispose(&mut stage.ctx());
        assert_eq!(scene.pending_tasks(), 0);
        assert_eq!(scene.tracked_resources(), 0);
        scene.update(&mut stage.ctx(), AARTI_SECONDS * 2.0);
        assert_eq!(recorder.progress("navratri/aarti"), None);
    }
}
