//! Dussehra - victory of good over evil
//!
//! Three effigies stand on the fairground: ten-headed Ravana between his son
//! Meghnad and his brother Kumbhakaran. Each can be set alight once; it burns,
//! collapses, and its fire dies down.

use std::any::Any;
use std::fmt;

use festival_engine::prelude::*;
use festival_engine::scene::ProgressValue;

use super::common::{self, Atmosphere};

const COLLAPSE_AFTER: f32 = 4.0;
const EMBERS_FOR: f32 = 3.0;

/// Which effigy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffigyKind {
    /// Ten-headed king of Lanka
    Ravana,
    /// Ravana's son
    Meghnad,
    /// Ravana's brother
    Kumbhakaran,
}

impl EffigyKind {
    /// Every effigy, left to right
    pub const ALL: [EffigyKind; 3] = [Self::Meghnad, Self::Ravana, Self::Kumbhakaran];

    fn heads(self) -> usize {
        match self {
            Self::Ravana => 10,
            Self::Meghnad | Self::Kumbhakaran => 1,
        }
    }

    fn height(self) -> f32 {
        match self {
            Self::Ravana => 12.0,
            Self::Meghnad => 8.0,
            Self::Kumbhakaran => 9.0,
        }
    }

    fn x(self) -> f32 {
        match self {
            Self::Meghnad => -9.0,
            Self::Ravana => 0.0,
            Self::Kumbhakaran => 9.0,
        }
    }
}

impl fmt::Display for EffigyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ravana => "Ravana",
            Self::Meghnad => "Meghnad",
            Self::Kumbhakaran => "Kumbhakaran",
        };
        f.write_str(name)
    }
}

/// Burn progress of one effigy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffigyState {
    /// Untouched
    Standing,
    /// On fire
    Burning,
    /// Burned down; embers may still glow
    Collapsed,
}

/// A paper and bamboo effigy
#[derive(Debug, Clone)]
pub struct Effigy {
    /// Which effigy
    pub kind: EffigyKind,
    /// Body, arms and heads
    pub parts: Vec<ResourceId>,
    /// Flames
    pub fire: ResourceId,
    /// Smoke column
    pub smoke: ResourceId,
    /// Fire glow, off until burning
    pub light: ResourceId,
    /// Burn progress
    pub state: EffigyState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DussehraTask {
    Collapse(EffigyKind),
    Extinguish(EffigyKind),
}

/// Dussehra fairground at nightfall
pub struct DussehraScene {
    collaborators: Collaborators,
    resources: SceneResources,
    scheduler: Scheduler<DussehraTask>,
    effigies: Vec<Effigy>,
    loaded: bool,
}

impl DussehraScene {
    /// Create an unbuilt scene
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            collaborators,
            resources: SceneResources::new(FestivalId::Dussehra),
            scheduler: Scheduler::new(),
            effigies: Vec::new(),
            loaded: false,
        }
    }

    /// Effigies left to right
    pub fn effigies(&self) -> &[Effigy] {
        &self.effigies
    }

    /// Effigy of `kind`, once built
    pub fn effigy(&self, kind: EffigyKind) -> Option<&Effigy> {
        self.effigies.iter().find(|e| e.kind == kind)
    }

    /// Set `kind` alight; returns false if it is already burning or burned
    pub fn burn_effigy(&mut self, world: &mut RenderWorld, kind: EffigyKind) -> bool {
        let Some(effigy) = self.effigies.iter_mut().find(|e| e.kind == kind) else {
            return false;
        };
        if effigy.state != EffigyState::Standing {
            return false;
        }
        effigy.state = EffigyState::Burning;
        common::start_particles(world, effigy.fire);
        common::start_particles(world, effigy.smoke);
        common::set_light(world, effigy.light, true);
        self.scheduler.schedule(COLLAPSE_AFTER, DussehraTask::Collapse(kind));

        let burned = self
            .effigies
            .iter()
            .filter(|e| e.state != EffigyState::Standing)
            .count();
        log::info!("{} effigy set alight", kind);
        self.collaborators.add_user_interaction(&format!("Burned the {} effigy", kind));
        self.collaborators
            .record_interaction(FestivalId::Dussehra, "effigies_burned", ProgressValue::Count(burned as u32));
        if kind == EffigyKind::Ravana {
            self.collaborators
                .record_interaction(FestivalId::Dussehra, "ravana_burned", ProgressValue::Flag(true));
            self.collaborators.show_cultural_info(FestivalId::Dussehra, "ravana_dahan");
        }
        true
    }

    /// Set Ravana alight
    pub fn burn_ravana_effigy(&mut self, world: &mut RenderWorld) -> bool {
        self.burn_effigy(world, EffigyKind::Ravana)
    }

    fn run(&mut self, world: &mut RenderWorld, task: DussehraTask) {
        match task {
            DussehraTask::Collapse(kind) => {
                if let Some(effigy) = self.effigies.iter_mut().find(|e| e.kind == kind) {
                    effigy.state = EffigyState::Collapsed;
                    for part in &effigy.parts {
                        common::set_visible(world, *part, false);
                    }
                    self.scheduler.schedule(EMBERS_FOR, DussehraTask::Extinguish(kind));
                }
            }
            DussehraTask::Extinguish(kind) => {
                if let Some(effigy) = self.effigy(kind) {
                    common::stop_particles(world, effigy.fire);
                    common::stop_particles(world, effigy.smoke);
                    common::set_light(world, effigy.light, false);
                }
            }
        }
    }

    fn build_effigy(&mut self, world: &mut RenderWorld, kind: EffigyKind) -> Result<(), SceneError> {
        let name = kind.to_string().to_lowercase();
        let height = kind.height();
        let base = Vec3::new(kind.x(), 0.0, 10.0);
        let (robe, face) = match kind {
            EffigyKind::Ravana => (rgb8(139, 0, 0), rgb8(255, 215, 0)),
            EffigyKind::Meghnad => (rgb8(0, 100, 0), rgb8(255, 160, 122)),
            EffigyKind::Kumbhakaran => (rgb8(72, 61, 139), rgb8(210, 180, 140)),
        };
        let robe = self
            .resources
            .material(world, &format!("{}RobeMaterial", name), Material::new(robe))?;
        let face = self
            .resources
            .material(world, &format!("{}FaceMaterial", name), Material::new(face))?;

        let mut parts = Vec::new();
        let body_height = height * 0.75;
        parts.push(self.resources.mesh(
            world,
            &format!("{}Body", name),
            Mesh::new(Shape::Cylinder {
                height: body_height,
                diameter_top: 1.6,
                diameter_bottom: 3.0,
            })
            .at(base + Vec3::new(0.0, body_height * 0.5, 0.0))
            .with_material(robe)
            .pickable(PickLayers::INTERACTIVE),
        )?);
        for (side, x) in [("Left", -1.6_f32), ("Right", 1.6)] {
            parts.push(self.resources.mesh(
                world,
                &format!("{}Arm{}", name, side),
                Mesh::new(Shape::cylinder(body_height * 0.5, 0.5))
                    .at(base + Vec3::new(x, body_height * 0.7, 0.0))
                    .rotated(Vec3::new(0.0, 0.0, x.signum() * 0.5))
                    .with_material(robe)
                    .pickable(PickLayers::INTERACTIVE),
            )?);
        }

        let heads = kind.heads();
        let head_y = body_height + 0.9;
        for i in 0..heads {
            let x = (i as f32 - (heads as f32 - 1.0) * 0.5) * 1.1;
            parts.push(self.resources.mesh(
                world,
                &format!("{}Head{}", name, i),
                Mesh::new(Shape::Sphere { diameter: 1.4 })
                    .at(base + Vec3::new(x, head_y, 0.0))
                    .with_material(face)
                    .pickable(PickLayers::INTERACTIVE),
            )?);
        }

        let fire = self.resources.particles(
            world,
            &format!("{}Fire", name),
            ParticleSystem::new(base + Vec3::new(0.0, 1.0, 0.0), 600)
                .with_emit_rate(200.0)
                .with_lifetime(0.5, 1.5)
                .with_directions(Vec3::new(-1.0, 3.0, -1.0), Vec3::new(1.0, 7.0, 1.0))
                .with_colors(rgb8(255, 230, 0), rgb8(255, 40, 0)),
        )?;
        let smoke = self.resources.particles(
            world,
            &format!("{}Smoke", name),
            ParticleSystem::new(base + Vec3::new(0.0, height, 0.0), 300)
                .with_emit_rate(60.0)
                .with_lifetime(2.0, 4.0)
                .with_directions(Vec3::new(-0.5, 1.0, -0.5), Vec3::new(0.5, 2.5, 0.5))
                .with_colors(rgb8(90, 90, 90), rgb8(30, 30, 30)),
        )?;
        let light = self.resources.light(
            world,
            &format!("{}FireLight", name),
            common::dark_point_light(base + Vec3::new(0.0, height * 0.5, -2.0), rgb8(255, 120, 0), 2.0, 20.0),
        )?;

        self.effigies.push(Effigy {
            kind,
            parts,
            fire,
            smoke,
            light,
            state: EffigyState::Standing,
        });
        Ok(())
    }
}

impl FestivalScene for DussehraScene {
    fn id(&self) -> FestivalId {
        FestivalId::Dussehra
    }

    fn create(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
        if self.loaded {
            return Ok(());
        }
        Atmosphere {
            ambient: rgb8(100, 80, 120),
            ambient_intensity: 0.35,
            sun_direction: Vec3::new(-0.6, -1.0, 0.4),
            sun: rgb8(255, 150, 90),
            sun_intensity: 0.3,
            background: rgb8(40, 20, 50),
        }
        .build(&mut self.resources, ctx.world)?;
        for kind in EffigyKind::ALL {
            self.build_effigy(ctx.world, kind)?;
        }
        self.loaded = true;
        log::info!("Dussehra scene created: {} effigies", self.effigies.len());
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn update(&mut self, ctx: &mut SceneContext<'_>, delta_time: f32) {
        for task in self.scheduler.advance(delta_time) {
            self.run(ctx.world, task);
        }
    }

    fn handle_pick(&mut self, ctx: &mut SceneContext<'_>, id: ResourceId) -> bool {
        let Some(kind) = self
            .effigies
            .iter()
            .find(|e| e.parts.contains(&id))
            .map(|e| e.kind)
        else {
            return false;
        };
        self.burn_effigy(ctx.world, kind);
        true
    }

    fn vantage(&self) -> CameraVantage {
        CameraVantage::new(Vec3::new(0.0, 9.0, -18.0), Vec3::new(0.0, 5.0, 10.0))
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
        self.effigies.clear();
        self.loaded = false;
        log::debug!("Dussehra scene disposed: {} resources freed", freed);
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

    fn built() -> (Stage, DussehraScene, Recorder) {
        let recorder = Recorder::default();
        let mut stage = Stage::new();
        let mut scene = DussehraScene::new(recorder.collaborators());
        scene.create(&mut stage.ctx()).unwrap();
        (stage, scene, recorder)
    }

    #[test]
    fn test_ravana_has_ten_heads() {
        let (_, scene, _) = built();
        let ravana = scene.effigy(EffigyKind::Ravana).unwrap();
        assert_eq!(ravana.parts.len(), 3 + 10);
        assert_eq!(scene.effigy(EffigyKind::Meghnad).unwrap().parts.len(), 4);
    }

    #[test]
    fn test_burn_is_idempotent() {
        let (mut stage, mut scene, recorder) = built();
        assert!(scene.burn_ravana_effigy(&mut stage.world));
        assert!(!scene.burn_ravana_effigy(&mut stage.world));
        assert!(!scene.burn_effigy(&mut stage.world, EffigyKind::Ravana));
        assert_eq!(scene.pending_tasks(), 1);

        let ravana = scene.effigy(EffigyKind::Ravana).unwrap();
        assert_eq!(ravana.state, EffigyState::Burning);
        assert!(stage.world.particles(ravana.fire).unwrap().is_emitting());
        assert!(stage.world.light(ravana.light).unwrap().enabled);
        assert_eq!(recorder.info_topics(), vec!["dussehra:ravana_dahan".to_string()]);
        assert_eq!(recorder.progress("dussehra/effigies_burned"), Some(ProgressValue::Count(1)));
    }

    #[test]
    fn test_burning_effigy_collapses_then_fire_dies() {
        let (mut stage, mut scene, _) = built();
        let head = scene.effigy(EffigyKind::Kumbhakaran).unwrap().parts[3];
        assert!(scene.handle_pick(&mut stage.ctx(), head));

        scene.update(&mut stage.ctx(), COLLAPSE_AFTER);
        let effigy = scene.effigy(EffigyKind::Kumbhakaran).unwrap();
        assert_eq!(effigy.state, EffigyState::Collapsed);
        assert!(effigy.parts.iter().all(|&p| !stage.world.mesh(p).unwrap().visible));
        assert!(stage.world.particles(effigy.fire).unwrap().is_emitting());

        scene.update(&mut stage.ctx(), EMBERS_FOR);
        let effigy = scene.effigy(EffigyKind::Kumbhakaran).unwrap();
        assert!(!stage.world.particles(effigy.fire).unwrap().is_emitting());
        assert!(!stage.world.light(effigy.light).unwrap().enabled);
        assert_eq!(scene.pending_tasks(), 0);
    }

    #[test]
    fn test_dispose_while_burning() {
        let (mut stage, mut scene, _) = built();
        for kind in EffigyKind::ALL {
            scene.burn_effigy(&mut stage.world, kind);
        }
        assert_eq!(scene.pending_tasks(), 3);
        scene.dispose(&mut stage.ctx());
        assert_eq!(scene.pending_tasks(), 0);
        assert_eq!(stage.world.count(), 0);
        scene.update(&mut stage.ctx(), COLLAPSE_AFTER + EMBERS_FOR);
    }
}
