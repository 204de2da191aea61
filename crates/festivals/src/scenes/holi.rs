//! Holi - the festival of colours
//!
//! Piles of gulal powder and a crowd scattered over a village square. Pick a
//! pile to choose a colour, then pick a person to throw it; every person can
//! be coloured once. The Holika bonfire can be lit once.

use std::any::Any;

use festival_engine::prelude::*;
use festival_engine::scene::ProgressValue;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::common::{self, Atmosphere, Body};

const PEOPLE: usize = 8;
const POWDER_LIFETIME: f32 = 2.0;

/// Gulal colours on offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GulalColor {
    /// Magenta pink
    Pink,
    /// Leaf green
    Green,
    /// Turmeric yellow
    Yellow,
    /// Indigo blue
    Blue,
    /// Saffron orange
    Orange,
}

impl GulalColor {
    /// Every colour, in pile order
    pub const ALL: [GulalColor; 5] = [Self::Pink, Self::Green, Self::Yellow, Self::Blue, Self::Orange];

    /// RGB value of the powder
    pub fn color(self) -> Color {
        match self {
            Self::Pink => rgb8(255, 20, 147),
            Self::Green => rgb8(50, 205, 50),
            Self::Yellow => rgb8(255, 215, 0),
            Self::Blue => rgb8(30, 80, 255),
            Self::Orange => rgb8(255, 120, 0),
        }
    }

    /// Lowercase name
    pub fn name(self) -> &'static str {
        match self {
            Self::Pink => "pink",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Blue => "blue",
            Self::Orange => "orange",
        }
    }
}

/// A pile of powder
#[derive(Debug, Clone)]
pub struct ColorPile {
    /// Colour of the powder
    pub color: GulalColor,
    /// Cone mesh
    pub mesh: ResourceId,
}

/// A reveller
#[derive(Debug, Clone)]
pub struct Person {
    /// Torso, recoloured when hit
    pub body: Body,
    /// Head
    pub head: ResourceId,
    /// Position on the square
    pub position: Vec3,
    /// Colour thrown on this person, once
    pub colored_with: Option<GulalColor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HoliTask {
    ExpirePowder(ResourceId),
}

/// Village square on Holi morning
pub struct HoliScene {
    collaborators: Collaborators,
    resources: SceneResources,
    scheduler: Scheduler<HoliTask>,
    rng: StdRng,
    piles: Vec<ColorPile>,
    people: Vec<Person>,
    selected: GulalColor,
    bonfire_logs: Vec<ResourceId>,
    bonfire_fire: Option<ResourceId>,
    bonfire_light: Option<ResourceId>,
    bonfire_lit: bool,
    bursts: Vec<ResourceId>,
    loaded: bool,
}

impl HoliScene {
    /// Create an unbuilt scene
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            collaborators,
            resources: SceneResources::new(FestivalId::Holi),
            scheduler: Scheduler::new(),
            rng: StdRng::seed_from_u64(0x4011),
            piles: Vec::new(),
            people: Vec::new(),
            selected: GulalColor::Pink,
            bonfire_logs: Vec::new(),
            bonfire_fire: None,
            bonfire_light: None,
            bonfire_lit: false,
            bursts: Vec::new(),
            loaded: false,
        }
    }

    /// Powder piles
    pub fn piles(&self) -> &[ColorPile] {
        &self.piles
    }

    /// Revellers
    pub fn people(&self) -> &[Person] {
        &self.people
    }

    /// Colour that the next throw uses
    pub fn selected_color(&self) -> GulalColor {
        self.selected
    }

    /// Number of people already coloured
    pub fn colored_count(&self) -> usize {
        self.people.iter().filter(|p| p.colored_with.is_some()).count()
    }

    /// Powder bursts still in the air
    pub fn active_bursts(&self) -> usize {
        self.bursts.len()
    }

    /// Whether the Holika bonfire burns
    pub fn is_bonfire_lit(&self) -> bool {
        self.bonfire_lit
    }

    /// Choose the colour for the next throw
    pub fn select_color(&mut self, color: GulalColor) {
        if self.selected != color {
            log::debug!("Selected {} gulal", color.name());
        }
        self.selected = color;
    }

    /// Throw `color` on `person`; returns false if already coloured or out of range
    pub fn color_person(&mut self, world: &mut RenderWorld, person: usize, color: GulalColor) -> Result<bool, SceneError> {
        let Some(target) = self.people.get_mut(person) else {
            log::warn!("No person at index {}", person);
            return Ok(false);
        };
        if target.colored_with.is_some() {
            return Ok(false);
        }
        target.colored_with = Some(color);
        if let Ok(material) = world.material_mut(target.body.material) {
            material.diffuse = color.color();
        }
        let position = target.position + Vec3::new(0.0, 1.5, 0.0);
        self.powder_burst(world, position, color)?;

        let colored = self.colored_count();
        self.collaborators
            .add_user_interaction(&format!("Threw {} gulal on person {}", color.name(), person + 1));
        self.collaborators
            .record_interaction(FestivalId::Holi, "people_colored", ProgressValue::Count(colored as u32));
        if colored == self.people.len() {
            self.collaborators.show_cultural_info(FestivalId::Holi, "colors");
        }
        Ok(true)
    }

    /// Light the Holika bonfire; returns false if it already burns
    pub fn light_holika_bonfire(&mut self, world: &mut RenderWorld) -> bool {
        if self.bonfire_lit {
            return false;
        }
        self.bonfire_lit = true;
        if let Some(fire) = self.bonfire_fire {
            common::start_particles(world, fire);
        }
        if let Some(light) = self.bonfire_light {
            common::set_light(world, light, true);
        }
        self.collaborators.add_user_interaction("Lit the Holika bonfire");
        self.collaborators
            .record_interaction(FestivalId::Holi, "holika_dahan", ProgressValue::Flag(true));
        self.collaborators.show_cultural_info(FestivalId::Holi, "holika");
        true
    }

    fn powder_burst(&mut self, world: &mut RenderWorld, position: Vec3, color: GulalColor) -> Result<(), SceneError> {
        let id = self.resources.particles(
            world,
            &format!("powder_{}", color.name()),
            ParticleSystem::new(position, 150)
                .with_lifetime(0.6, 1.4)
                .with_directions(Vec3::new(-2.0, 0.5, -2.0), Vec3::new(2.0, 3.0, 2.0))
                .with_gravity(Vec3::new(0.0, -2.0, 0.0))
                .with_colors(color.color(), color.color() * 0.8),
        )?;
        common::burst_particles(world, id, 150);
        self.bursts.push(id);
        self.scheduler.schedule(POWDER_LIFETIME, HoliTask::ExpirePowder(id));
        Ok(())
    }

    fn build_piles(&mut self, world: &mut RenderWorld) -> Result<(), SceneError> {
        for (i, color) in GulalColor::ALL.into_iter().enumerate() {
            let material = self.resources.material(
                world,
                &format!("pile_{}Material", color.name()),
                Material::new(color.color()),
            )?;
            let mesh = self.resources.mesh(
                world,
                &format!("pile_{}", color.name()),
                Mesh::new(Shape::cone(0.8, 1.4))
                    .at(Vec3::new(-6.0 + 3.0 * i as f32, 0.4, -2.0))
                    .with_material(material)
                    .pickable(PickLayers::INTERACTIVE),
            )?;
            self.piles.push(ColorPile { color, mesh });
        }
        Ok(())
    }

    fn build_crowd(&mut self, world: &mut RenderWorld) -> Result<(), SceneError> {
        let skin = self
            .resources
            .material(world, "skinMaterial", Material::new(rgb8(198, 134, 66)))?;
        for i in 0..PEOPLE {
            let position = Vec3::new(self.rng.gen_range(-8.0..8.0), 0.0, self.rng.gen_range(2.0..9.0));
            let body = Body::build(
                &mut self.resources,
                world,
                &format!("person{}", i),
                Mesh::new(Shape::cylinder(1.4, 0.6))
                    .at(position + Vec3::new(0.0, 0.7, 0.0))
                    .pickable(PickLayers::INTERACTIVE),
                Material::new(Color::new(0.95, 0.95, 0.95)),
            )?;
            let head = self.resources.mesh(
                world,
                &format!("person{}Head", i),
                Mesh::new(Shape::Sphere { diameter: 0.5 })
                    .at(position + Vec3::new(0.0, 1.65, 0.0))
                    .with_material(skin)
                    .pickable(PickLayers::INTERACTIVE),
            )?;
            self.people.push(Person {
                body,
                head,
                position,
                colored_with: None,
            });
        }
        Ok(())
    }

    fn build_bonfire(&mut self, world: &mut RenderWorld) -> Result<(), SceneError> {
        let wood = self
            .resources
            .material(world, "woodMaterial", Material::new(rgb8(101, 67, 33)))?;
        let center = Vec3::new(0.0, 0.0, 14.0);
        for i in 0..6 {
            let angle = std::f32::consts::TAU * i as f32 / 6.0;
            let piece = self.resources.mesh(
                world,
                &format!("log{}", i),
                Mesh::new(Shape::cylinder(2.5, 0.25))
                    .at(center + Vec3::new(0.4 * angle.cos(), 1.0, 0.4 * angle.sin()))
                    .rotated(Vec3::new(0.35 * angle.sin(), 0.0, 0.35 * angle.cos()))
                    .with_material(wood)
                    .pickable(PickLayers::INTERACTIVE),
            )?;
            self.bonfire_logs.push(piece);
        }
        self.bonfire_fire = Some(self.resources.particles(
            world,
            "bonfireFire",
            ParticleSystem::new(center + Vec3::new(0.0, 1.0, 0.0), 400)
                .with_emit_rate(120.0)
                .with_lifetime(0.4, 1.2)
                .with_directions(Vec3::new(-0.4, 2.0, -0.4), Vec3::new(0.4, 4.0, 0.4))
                .with_colors(rgb8(255, 200, 0), rgb8(255, 40, 0)),
        )?);
        self.bonfire_light = Some(self.resources.light(
            world,
            "bonfireLight",
            common::dark_point_light(center + Vec3::new(0.0, 2.0, 0.0), rgb8(255, 120, 30), 1.5, 12.0),
        )?);
        Ok(())
    }

}

impl FestivalScene for HoliScene {
    fn id(&self) -> FestivalId {
        FestivalId::Holi
    }

    fn create(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
        if self.loaded {
            return Ok(());
        }
        Atmosphere {
            ambient: Color::new(1.0, 1.0, 1.0),
            ambient_intensity: 0.8,
            sun_direction: Vec3::new(-0.3, -1.0, 0.5),
            sun: rgb8(255, 245, 220),
            sun_intensity: 0.7,
            background: rgb8(135, 206, 235),
        }
        .build(&mut self.resources, ctx.world)?;
        self.build_piles(ctx.world)?;
        self.build_crowd(ctx.world)?;
        self.build_bonfire(ctx.world)?;
        self.loaded = true;
        log::info!("Holi scene created: {} people, {} colours", self.people.len(), self.piles.len());
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn update(&mut self, ctx: &mut SceneContext<'_>, delta_time: f32) {
        for task in self.scheduler.advance(delta_time) {
            match task {
                HoliTask::ExpirePowder(id) => {
                    self.bursts.retain(|&b| b != id);
                    self.resources.release(ctx.world, id);
                }
            }
        }
    }

    fn handle_pick(&mut self, ctx: &mut SceneContext<'_>, id: ResourceId) -> bool {
        if let Some(pile) = self.piles.iter().find(|p| p.mesh == id) {
            let color = pile.color;
            self.select_color(color);
            return true;
        }
        if let Some(person) = self.people.iter().position(|p| p.body.is(id) || p.head == id) {
            let color = self.selected;
            if let Err(error) = self.color_person(ctx.world, person, color) {
                log::warn!("Powder burst failed: {}", error);
            }
            return true;
        }
        if self.bonfire_logs.contains(&id) {
            self.light_holika_bonfire(ctx.world);
            return true;
        }
        false
    }

    fn vantage(&self) -> CameraVantage {
        CameraVantage::new(Vec3::new(0.0, 10.0, -14.0), Vec3::new(0.0, 1.0, 4.0))
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
        self.piles.clear();
        self.people.clear();
        self.bursts.clear();
        self.bonfire_logs.clear();
        self.bonfire_fire = None;
        self.bonfire_light = None;
        self.loaded = false;
        log::debug!("Holi scene disposed: {} resources freed", freed);
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

    fn built() -> (Stage, HoliScene, Recorder) {
        let recorder = Recorder::default();
        let mut stage = Stage::new();
        let mut scene = HoliScene::new(recorder.collaborators());
        scene.create(&mut stage.ctx()).unwrap();
        (stage, scene, recorder)
    }

    #[test]
    fn test_pick_pile_then_person() {
        let (mut stage, mut scene, recorder) = built();
        let blue = scene.piles()[3].mesh;
        assert!(scene.handle_pick(&mut stage.ctx(), blue));
        assert_eq!(scene.selected_color(), GulalColor::Blue);

        let head = scene.people()[2].head;
        assert!(scene.handle_pick(&mut stage.ctx(), head));
        let person = &scene.people()[2];
        assert_eq!(person.colored_with, Some(GulalColor::Blue));
        assert_eq!(
            stage.world.material(person.body.material).unwrap().diffuse,
            GulalColor::Blue.color()
        );
        assert_eq!(scene.active_bursts(), 1);
        assert_eq!(recorder.progress("holi/people_colored"), Some(ProgressValue::Count(1)));
    }

    #[test]
    fn test_person_colored_once() {
        let (mut stage, mut scene, _) = built();
        assert!(scene.color_person(&mut stage.world, 0, GulalColor::Green).unwrap());
        assert!(!scene.color_person(&mut stage.world, 0, GulalColor::Pink).unwrap());
        assert_eq!(scene.people()[0].colored_with, Some(GulalColor::Green));
        assert_eq!(scene.active_bursts(), 1);
        assert!(!scene.color_person(&mut stage.world, PEOPLE, GulalColor::Pink).unwrap());
    }

    #[test]
    fn test_powder_expires() {
        let (mut stage, mut scene, _) = built();
        let before = scene.tracked_resources();
        scene.color_person(&mut stage.world, 1, GulalColor::Yellow).unwrap();
        assert_eq!(scene.tracked_resources(), before + 1);
        scene.update(&mut stage.ctx(), POWDER_LIFETIME + 0.1);
        assert_eq!(scene.active_bursts(), 0);
        assert_eq!(scene.tracked_resources(), before);
    }

    #[test]
    fn test_everyone_colored_shows_info() {
        let (mut stage, mut scene, recorder) = built();
        for person in 0..PEOPLE {
            scene.color_person(&mut stage.world, person, GulalColor::ALL[person % 5]).unwrap();
        }
        assert_eq!(scene.colored_count(), PEOPLE);
        assert_eq!(recorder.info_topics(), vec!["holi:colors".to_string()]);
    }

    #[test]
    fn test_bonfire_lights_once() {
        let (mut stage, mut scene, recorder) = built();
        assert!(scene.light_holika_bonfire(&mut stage.world));
        assert!(!scene.light_holika_bonfire(&mut stage.world));
        assert!(scene.is_bonfire_lit());
        let fire = scene.bonfire_fire.unwrap();
        assert!(stage.world.particles(fire).unwrap().is_emitting());
        assert_eq!(
            recorder.interactions().iter().filter(|i| i.contains("Holika")).count(),
            1
        );
    }

    #[test]
    fn test_dispose_after_partial_create() {
        let mut stage = Stage::new();
        let mut scene = HoliScene::new(Collaborators::none());
        scene.build_piles(&mut stage.world).unwrap();
        assert!(scene.tracked_resources() > 0);
        scene.dispose(&mut stage.ctx());
        assert_eq!(scene.tracked_resources(), 0);
        assert_eq!(stage.world.count(), 0);
    }
}
