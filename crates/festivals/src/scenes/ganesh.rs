//! Ganesh Chaturthi
//!
//! A pandal with the Ganesha idol, modak plates, and a procession path down
//! to the water. Once the procession starts the idol is carried to the river
//! and immersed (visarjan) when it arrives.

use std::any::Any;

use festival_engine::animation::Tween;
use festival_engine::prelude::*;
use festival_engine::scene::ProgressValue;

use super::common::{self, Atmosphere, Body};

const MODAK_PLATES: usize = 3;
const PROCESSION_SECONDS: f32 = 6.0;
const VISARJAN_DELAY: f32 = 0.5;

/// Procession progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Procession {
    /// Idol on its pedestal
    Waiting,
    /// Idol being carried to the water
    Moving,
    /// Idol immersed
    Immersed,
}

/// A plate waiting for a modak
#[derive(Debug, Clone)]
pub struct ModakPlate {
    /// Plate mesh
    pub plate: ResourceId,
    /// Modak mesh, hidden until offered
    pub modak: ResourceId,
    /// Whether a modak was offered here
    pub offered: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GaneshTask {
    Visarjan,
}

/// Ganesh pandal by the river
pub struct GaneshScene {
    collaborators: Collaborators,
    resources: SceneResources,
    scheduler: Scheduler<GaneshTask>,
    idol: Vec<(ResourceId, Vec3)>,
    plates: Vec<ModakPlate>,
    flowers: Option<ResourceId>,
    splash: Option<ResourceId>,
    carry: Option<Tween<Vec3>>,
    flowers_offered: bool,
    procession: Procession,
    loaded: bool,
}

impl GaneshScene {
    /// Create an unbuilt scene
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            collaborators,
            resources: SceneResources::new(FestivalId::Ganesh),
            scheduler: Scheduler::new(),
            idol: Vec::new(),
            plates: Vec::new(),
            flowers: None,
            splash: None,
            carry: None,
            flowers_offered: false,
            procession: Procession::Waiting,
            loaded: false,
        }
    }

    fn river_offset() -> Vec3 {
        Vec3::new(0.0, -1.5, -14.0)
    }

    /// Modak plates
    pub fn plates(&self) -> &[ModakPlate] {
        &self.plates
    }

    /// Number of modaks offered
    pub fn modaks_offered(&self) -> usize {
        self.plates.iter().filter(|p| p.offered).count()
    }

    /// Whether flowers were offered
    pub fn flowers_offered(&self) -> bool {
        self.flowers_offered
    }

    /// Procession progress
    pub fn procession(&self) -> Procession {
        self.procession
    }

    /// Idol mesh handles
    pub fn idol_parts(&self) -> impl Iterator<Item = ResourceId> + '_ {
        self.idol.iter().map(|(id, _)| *id)
    }

    /// Offer a modak on `plate`; returns false if that plate already has one
    pub fn offer_modak(&mut self, world: &mut RenderWorld, plate: usize) -> bool {
        let Some(target) = self.plates.get_mut(plate) else {
            log::warn!("No modak plate at index {}", plate);
            return false;
        };
        if target.offered {
            return false;
        }
        target.offered = true;
        common::set_visible(world, target.modak, true);

        let offered = self.modaks_offered();
        self.collaborators.add_user_interaction("Offered a modak to Ganesha");
        self.collaborators
            .record_interaction(FestivalId::Ganesh, "modaks_offered", ProgressValue::Count(offered as u32));
        if offered == self.plates.len() {
            self.collaborators.show_cultural_info(FestivalId::Ganesh, "modak");
        }
        true
    }

    /// Shower the idol with flowers; returns false if already offered
    pub fn offer_flowers(&mut self, world: &mut RenderWorld) -> bool {
        if self.flowers_offered {
            return false;
        }
        self.flowers_offered = true;
        if let Some(flowers) = self.flowers {
            common::burst_particles(world, flowers, 200);
        }
        self.collaborators.add_user_interaction("Offered flowers to Ganesha");
        self.collaborators
            .record_interaction(FestivalId::Ganesh, "flowers", ProgressValue::Flag(true));
        true
    }

    /// Carry the idol to the river; returns false once the procession started
    pub fn start_procession(&mut self) -> bool {
        if self.procession != Procession::Waiting || self.idol.is_empty() {
            return false;
        }
        self.procession = Procession::Moving;
        self.carry = Some(Tween::new(
            Vec3::zeros(),
            Self::river_offset(),
            PROCESSION_SECONDS,
            Easing::EaseInOutQuad,
        ));
        self.scheduler
            .schedule(PROCESSION_SECONDS + VISARJAN_DELAY, GaneshTask::Visarjan);
        self.collaborators.add_user_interaction("Started the Ganpati procession");
        self.collaborators.show_cultural_info(FestivalId::Ganesh, "procession");
        true
    }

    fn visarjan(&mut self, world: &mut RenderWorld) {
        self.procession = Procession::Immersed;
        self.carry = None;
        for (id, _) in &self.idol {
            common::set_visible(world, *id, false);
        }
        if let Some(splash) = self.splash {
            common::burst_particles(world, splash, 250);
        }
        self.collaborators
            .record_interaction(FestivalId::Ganesh, "visarjan", ProgressValue::Flag(true));
        self.collaborators.show_cultural_info(FestivalId::Ganesh, "visarjan");
        log::info!("Ganesha immersed");
    }

    fn build_idol(&mut self, world: &mut RenderWorld) -> Result<(), SceneError> {
        let clay = self.resources.material(
            world,
            "idolMaterial",
            Material::new(rgb8(255, 140, 60)).with_emissive(rgb8(40, 20, 0)),
        )?;
        let gold = self.resources.material(
            world,
            "crownMaterial",
            Material::new(rgb8(255, 215, 0)).with_emissive(rgb8(80, 60, 0)),
        )?;
        let base = Vec3::new(0.0, 1.0, 6.0);
        let parts = [
            ("idolBody", Shape::Sphere { diameter: 2.4 }, Vec3::new(0.0, 1.2, 0.0), clay),
            ("idolHead", Shape::Sphere { diameter: 1.5 }, Vec3::new(0.0, 3.0, 0.0), clay),
            ("idolTrunk", Shape::cylinder(1.2, 0.3), Vec3::new(0.0, 2.4, -0.7), clay),
            ("idolEarLeft", Shape::Disc { radius: 0.6 }, Vec3::new(-0.8, 3.1, 0.0), clay),
            ("idolEarRight", Shape::Disc { radius: 0.6 }, Vec3::new(0.8, 3.1, 0.0), clay),
            ("idolCrown", Shape::cone(1.0, 0.9), Vec3::new(0.0, 4.1, 0.0), gold),
        ];
        for (name, shape, offset, material) in parts {
            let position = base + offset;
            let id = self.resources.mesh(
                world,
                name,
                Mesh::new(shape)
                    .at(position)
                    .with_material(material)
                    .pickable(PickLayers::INTERACTIVE),
            )?;
            self.idol.push((id, position));
        }

        let pedestal = self
            .resources
            .material(world, "pedestalMaterial", Material::new(rgb8(139, 0, 0)))?;
        self.resources.mesh(
            world,
            "pedestal",
            Mesh::new(Shape::Box {
                width: 4.0,
                height: 1.0,
                depth: 3.0,
            })
            .at(Vec3::new(0.0, 0.5, 6.0))
            .with_material(pedestal),
        )?;

        self.flowers = Some(self.resources.particles(
            world,
            "flowerShower",
            ParticleSystem::new(base + Vec3::new(0.0, 6.0, 0.0), 200)
                .with_lifetime(1.5, 2.5)
                .with_directions(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 0.0, 1.0))
                .with_gravity(Vec3::new(0.0, -1.5, 0.0))
                .with_colors(rgb8(255, 69, 0), rgb8(255, 215, 0)),
        )?);
        Ok(())
    }

    fn build_offerings(&mut self, world: &mut RenderWorld) -> Result<(), SceneError> {
        let brass = self
            .resources
            .material(world, "plateMaterial", Material::new(rgb8(205, 170, 60)))?;
        let modak = self
            .resources
            .material(world, "modakMaterial", Material::new(rgb8(250, 240, 220)))?;
        for i in 0..MODAK_PLATES {
            let position = Vec3::new(-2.0 + 2.0 * i as f32, 1.1, 3.5);
            let plate = self.resources.mesh(
                world,
                &format!("modakPlate{}", i),
                Mesh::new(Shape::cylinder(0.1, 1.0))
                    .at(position)
                    .with_material(brass)
                    .pickable(PickLayers::INTERACTIVE),
            )?;
            let sweet = self.resources.mesh(
                world,
                &format!("modak{}", i),
                Mesh::new(Shape::cone(0.5, 0.5))
                    .at(position + Vec3::new(0.0, 0.3, 0.0))
                    .with_material(modak)
                    .with_visibility(false),
            )?;
            self.plates.push(ModakPlate {
                plate,
                modak: sweet,
                offered: false,
            });
        }
        Ok(())
    }

    fn build_river(&mut self, world: &mut RenderWorld) -> Result<(), SceneError> {
        let water = Body::build(
            &mut self.resources,
            world,
            "river",
            Mesh::new(Shape::Plane {
                width: 40.0,
                height: 8.0,
            })
            .at(Vec3::new(0.0, 0.05, -9.0)),
            Material::new(rgb8(30, 90, 160)).with_alpha(0.8),
        )?;
        let splash_at = world.mesh(water.mesh)?.position + Vec3::new(0.0, 0.2, 1.0);
        self.splash = Some(self.resources.particles(
            world,
            "splash",
            ParticleSystem::new(splash_at, 250)
                .with_lifetime(0.5, 1.2)
                .with_directions(Vec3::new(-2.0, 2.0, -2.0), Vec3::new(2.0, 5.0, 2.0))
                .with_gravity(Vec3::new(0.0, -9.8, 0.0))
                .with_colors(rgb8(200, 230, 255), rgb8(255, 255, 255)),
        )?);
        Ok(())
    }
}

impl FestivalScene for GaneshScene {
    fn id(&self) -> FestivalId {
        FestivalId::Ganesh
    }

    fn create(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
        if self.loaded {
            return Ok(());
        }
        Atmosphere {
            ambient: rgb8(255, 230, 200),
            ambient_intensity: 0.6,
            sun_direction: Vec3::new(0.3, -1.0, 0.6),
            sun: rgb8(255, 220, 180),
            sun_intensity: 0.6,
            background: rgb8(255, 180, 120),
        }
        .build(&mut self.resources, ctx.world)?;
        self.build_idol(ctx.world)?;
        self.build_offerings(ctx.world)?;
        self.build_river(ctx.world)?;
        self.loaded = true;
        log::info!("Ganesh scene created with {} resources", self.resources.len());
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn update(&mut self, ctx: &mut SceneContext<'_>, delta_time: f32) {
        if let Some(carry) = self.carry.as_mut() {
            let offset = carry.advance(delta_time);
            for (id, rest) in &self.idol {
                common::move_mesh(ctx.world, *id, rest + offset);
            }
        }
        for task in self.scheduler.advance(delta_time) {
            match task {
                GaneshTask::Visarjan => self.visarjan(ctx.world),
            }
        }
    }

    fn handle_pick(&mut self, ctx: &mut SceneContext<'_>, id: ResourceId) -> bool {
        if let Some(plate) = self.plates.iter().position(|p| p.plate == id) {
            self.offer_modak(ctx.world, plate);
            return true;
        }
        if self.idol.iter().any(|(part, _)| *part == id) {
            if !self.offer_flowers(ctx.world) {
                self.start_procession();
            }
            return true;
        }
        false
    }

    fn vantage(&self) -> CameraVantage {
        CameraVantage::new(Vec3::new(6.0, 7.0, -14.0), Vec3::new(0.0, 2.0, 2.0))
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
        self.idol.clear();
        self.plates.clear();
        self.flowers = None;
        self.splash = None;
        self.carry = None;
        self.loaded = false;
        log::debug!("Ganesh scene disposed: {} resources freed", freed);
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

    fn built() -> (Stage, GaneshScene, Recorder) {
        let recorder = Recorder::default();
        let mut stage = Stage::new();
        let mut scene = GaneshScene::new(recorder.collaborators());
        scene.create(&mut stage.ctx()).unwrap();
        (stage, scene, recorder)
    }

    #[test]
    fn test_modaks_counted_once_per_plate() {
        let (mut stage, mut scene, recorder) = built();
        assert!(scene.offer_modak(&mut stage.world, 0));
        assert!(!scene.offer_modak(&mut stage.world, 0));
        assert!(scene.offer_modak(&mut stage.world, 2));
        assert!(!scene.offer_modak(&mut stage.world, MODAK_PLATES));
        assert_eq!(scene.modaks_offered(), 2);
        assert!(stage.world.mesh(scene.plates()[2].modak).unwrap().visible);
        assert_eq!(recorder.progress("ganesh/modaks_offered"), Some(ProgressValue::Count(2)));
    }

    #[test]
    fn test_flowers_then_procession_from_idol_picks() {
        let (mut stage, mut scene, _) = built();
        let head = scene.idol_parts().nth(1).unwrap();
        assert!(scene.handle_pick(&mut stage.ctx(), head));
        assert!(scene.flowers_offered());
        assert_eq!(scene.procession(), Procession::Waiting);

        assert!(scene.handle_pick(&mut stage.ctx(), head));
        assert_eq!(scene.procession(), Procession::Moving);
        assert!(!scene.start_procession());
    }

    #[test]
    fn test_procession_ends_in_visarjan() {
        let (mut stage, mut scene, recorder) = built();
        let body = scene.idol_parts().next().unwrap();
        let start = stage.world.mesh(body).unwrap().position;
        assert!(scene.start_procession());

        scene.update(&mut stage.ctx(), PROCESSION_SECONDS);
        let arrived = stage.world.mesh(body).unwrap().position;
        assert_relative_eq!(arrived, start + GaneshScene::river_offset(), epsilon = 1e-4);
        assert_eq!(scene.procession(), Procession::Moving);

        scene.update(&mut stage.ctx(), VISARJAN_DELAY);
        assert_eq!(scene.procession(), Procession::Immersed);
        assert!(scene.idol_parts().all(|id| !stage.world.mesh(id).unwrap().visible));
        assert_eq!(recorder.progress("ganesh/visarjan"), Some(ProgressValue::Flag(true)));
    }

    #[test]
    fn test_dispose_mid_procession_cancels_visarjan() {
        let (mut stage, mut scene, recorder) = built();
        scene.start_procession();
        scene.update(&mut stage.ctx(), 1.0);
        scene.dispose(&mut stage.ctx());
        assert_eq!(scene.pending_tasks(), 0);
        assert_eq!(stage.world.count(), 0);

        scene.update(&mut stage.ctx(), PROCESSION_SECONDS * 2.0);
        assert_eq!(recorder.progress("ganesh/visarjan"), None);
    }
}
