//! Scene Manager - festival switching and the shared environment
//!
//! The manager owns the render engine, the orbit camera, the permanent
//! environment (two global lights, ground, skybox) and the single live
//! festival scene.
//!
//! ## State machine
//!
//! ```text
//! Uninitialized ──initialize()──► Idle ◄──tween done── Transitioning
//!       │                          │  └──load_festival_scene()──►┘
//!       └─setup error─► Unusable   └──dispose()──► Disposed
//! ```
//!
//! A load request arriving while a transition runs is dropped, not queued.

use std::fmt;

use crate::animation::{CameraTween, CameraVantage};
use crate::config::ManagerConfig;
use crate::foundation::collections::ResourceId;
use crate::foundation::math::{Color, Vec3};
use crate::render::{
    ArcRotateCamera, FrameStats, Light, Material, Mesh, Owner, PickLayers, Ray, RenderEngine, RenderError,
    RenderSurface, RenderWorld, Shape, Texture, TexturePattern,
};

use super::collaborators::Collaborators;
use super::error::ManagerError;
use super::festival::FestivalId;
use super::lifecycle::{FestivalScene, SceneContext};
use super::loading::{LoadingIndicator, LogLoadingIndicator};
use super::registry::SceneRegistry;

/// Lifecycle state of the scene manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerState {
    /// Constructed, `initialize()` not yet called
    Uninitialized,
    /// Ready, no transition running
    Idle,
    /// A festival switch is in progress
    Transitioning,
    /// Setup failed; every later call reports the failure
    Unusable,
    /// Disposed
    Disposed,
}

/// Result of a load request that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The festival was built and the camera transition started
    Started(FestivalId),
    /// Another transition was in progress; nothing changed
    Dropped,
}

/// Which festival is live, its scene, and the transition guard
#[derive(Default)]
pub struct FestivalSession {
    current_festival: Option<FestivalId>,
    current_scene: Option<Box<dyn FestivalScene>>,
    is_transitioning: bool,
}

impl FestivalSession {
    /// Festival of the live scene
    pub fn current_festival(&self) -> Option<FestivalId> {
        self.current_festival
    }

    /// The live scene, if any
    pub fn current_scene(&self) -> Option<&dyn FestivalScene> {
        self.current_scene.as_deref()
    }

    /// Whether a load is in progress
    pub fn is_transitioning(&self) -> bool {
        self.is_transitioning
    }
}

impl fmt::Debug for FestivalSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FestivalSession")
            .field("current_festival", &self.current_festival)
            .field("has_scene", &self.current_scene.is_some())
            .field("is_transitioning", &self.is_transitioning)
            .finish()
    }
}

/// Environment and transition controller
pub struct SceneManager {
    config: ManagerConfig,
    registry: SceneRegistry,
    collaborators: Collaborators,
    indicator: Box<dyn LoadingIndicator>,

    surface: Option<Box<dyn RenderSurface>>,
    engine: Option<RenderEngine>,
    world: RenderWorld,
    camera: ArcRotateCamera,
    tween: Option<CameraTween>,

    session: FestivalSession,
    state: ManagerState,
    setup_error: Option<RenderError>,
}

impl SceneManager {
    /// Create a manager bound to `surface`; nothing is built until [`initialize`](Self::initialize)
    pub fn new(surface: Box<dyn RenderSurface>, registry: SceneRegistry, config: ManagerConfig) -> Self {
        let camera = ArcRotateCamera::new(
            config.camera.alpha,
            config.camera.beta,
            config.camera.radius,
            Vec3::zeros(),
            config.camera.limits,
        );
        let world = RenderWorld::new(config.seed);
        Self {
            config,
            registry,
            collaborators: Collaborators::none(),
            indicator: Box::new(LogLoadingIndicator::default()),
            surface: Some(surface),
            engine: None,
            world,
            camera,
            tween: None,
            session: FestivalSession::default(),
            state: ManagerState::Uninitialized,
            setup_error: None,
        }
    }

    /// Collaborators handed to every scene this manager builds
    pub fn with_collaborators(mut self, collaborators: Collaborators) -> Self {
        self.collaborators = collaborators;
        self
    }

    /// Replace the logging loading indicator
    pub fn with_loading_indicator(mut self, indicator: Box<dyn LoadingIndicator>) -> Self {
        self.indicator = indicator;
        self
    }

    //--- Setup ------------------------------------------------------------

    /// Build the engine, camera and permanent environment, then start rendering
    ///
    /// Calling again after success is a no-op. A failure leaves the manager
    /// [`ManagerState::Unusable`]; there is no retry.
    pub fn initialize(&mut self) -> Result<(), ManagerError> {
        match self.state {
            ManagerState::Uninitialized => {}
            ManagerState::Idle | ManagerState::Transitioning => return Ok(()),
            ManagerState::Unusable => return Err(self.setup_failure()),
            ManagerState::Disposed => return Err(ManagerError::Disposed),
        }

        match self.setup() {
            Ok(engine) => {
                self.engine = Some(engine);
                self.state = ManagerState::Idle;
                log::info!(
                    "Scene manager initialized with {} permanent resources",
                    self.world.count_owned_by(Owner::Permanent)
                );
                Ok(())
            }
            Err(error) => {
                log::error!("Scene manager setup failed: {}", error);
                self.world.clear();
                self.state = ManagerState::Unusable;
                self.setup_error = Some(error.clone());
                Err(ManagerError::SetupFailed(error))
            }
        }
    }

    fn setup(&mut self) -> Result<RenderEngine, RenderError> {
        self.config
            .validate()
            .map_err(|e| RenderError::InvalidParameter(e.to_string()))?;
        let surface = self.surface.take().ok_or(RenderError::SurfaceLost)?;
        let mut engine = RenderEngine::new(surface)?;

        self.camera.set_aspect_ratio(engine.aspect_ratio());
        self.world.set_background(self.config.background_color());
        self.build_environment()?;

        engine.start_render_loop()?;
        Ok(engine)
    }

    fn build_environment(&mut self) -> Result<(), RenderError> {
        let world = &mut self.world;
        let config = &self.config;

        world.add_light(
            ManagerConfig::HEMI_LIGHT,
            Owner::Permanent,
            Light::hemispheric(Vec3::new(0.0, 1.0, 0.0), Color::new(1.0, 1.0, 1.0), 0.7),
        )?;
        world.add_light(
            ManagerConfig::DIR_LIGHT,
            Owner::Permanent,
            Light::directional(Vec3::new(-1.0, -2.0, -1.0), Color::new(1.0, 0.95, 0.85), 0.5),
        )?;

        let ground_material = world.add_material(
            "groundMaterial",
            Owner::Permanent,
            Material::new(Color::new(0.3, 0.25, 0.2)),
        )?;
        world.add_mesh(
            ManagerConfig::GROUND,
            Owner::Permanent,
            Mesh::new(Shape::Plane {
                width: config.ground_size,
                height: config.ground_size,
            })
            .with_material(ground_material),
        )?;

        let sky_texture = world.add_texture(
            "skyboxTexture",
            Owner::Permanent,
            Texture::square(
                256,
                TexturePattern::Gradient {
                    bottom: Color::new(0.55, 0.45, 0.6),
                    top: Color::new(0.05, 0.05, 0.2),
                },
            ),
        )?;
        let sky_material = world.add_material(
            "skyBoxMaterial",
            Owner::Permanent,
            Material::new(Color::zeros())
                .with_emissive(Color::new(1.0, 1.0, 1.0))
                .with_texture(sky_texture),
        )?;
        world.add_mesh(
            ManagerConfig::SKYBOX,
            Owner::Permanent,
            Mesh::new(Shape::cube(config.skybox_size)).with_material(sky_material),
        )?;
        Ok(())
    }

    fn setup_failure(&self) -> ManagerError {
        let error = self
            .setup_error
            .clone()
            .unwrap_or_else(|| RenderError::InvalidParameter("setup failed".to_string()));
        ManagerError::SetupFailed(error)
    }

    fn ensure_ready(&self) -> Result<(), ManagerError> {
        match self.state {
            ManagerState::Idle | ManagerState::Transitioning => Ok(()),
            ManagerState::Uninitialized => Err(ManagerError::NotInitialized),
            ManagerState::Unusable => Err(self.setup_failure()),
            ManagerState::Disposed => Err(ManagerError::Disposed),
        }
    }

    //--- Transitions ------------------------------------------------------

    /// Switch to the festival named `name`
    ///
    /// Unknown names load the default scene. While a transition is running
    /// the request is dropped and `Ok(TransitionOutcome::Dropped)` returned.
    /// Otherwise, in order: raise the transition guard, show the loading
    /// indicator, clear the outgoing festival, build and create the new
    /// scene, then start the camera move. The indicator is hidden and the
    /// guard lowered when the camera arrives (see [`update`](Self::update)).
    pub fn load_festival_scene(&mut self, name: &str) -> Result<TransitionOutcome, ManagerError> {
        self.ensure_ready()?;
        if self.session.is_transitioning {
            log::warn!("Transition to '{}' dropped: another transition is in progress", name);
            return Ok(TransitionOutcome::Dropped);
        }

        let festival = FestivalId::from_name(name);
        log::info!("Transitioning to {}", festival.display_name());

        self.set_transitioning(true);
        self.indicator.show(festival);
        self.clear_festival_objects();

        let mut scene = self.registry.build(festival, &self.collaborators);
        let created = {
            let mut ctx = SceneContext::new(&mut self.world, &self.camera);
            scene.create(&mut ctx)
        };
        self.session.current_festival = Some(festival);

        match created {
            Ok(()) => log::info!(
                "{} scene created with {} resources",
                festival.display_name(),
                scene.tracked_resources()
            ),
            Err(error) if self.config.rollback_on_failure => {
                log::error!("Failed to create {} scene, rolling back: {}", festival, error);
                {
                    let mut ctx = SceneContext::new(&mut self.world, &self.camera);
                    scene.dispose(&mut ctx);
                }
                self.world.remove_owned_by(Owner::Scene(festival.as_str()));
                self.session.current_festival = None;
                self.finish_transition();
                return Err(ManagerError::SceneCreation { festival, source: error });
            }
            Err(error) => {
                log::error!("Failed to create {} scene, keeping partial scene: {}", festival, error);
            }
        }

        let vantage = scene.vantage();
        self.session.current_scene = Some(scene);
        self.start_camera_transition(vantage);
        Ok(TransitionOutcome::Started(festival))
    }

    /// Free every non-permanent resource, then dispose the outgoing scene
    ///
    /// Returns the number of resources removed by the allow-list sweep.
    pub fn clear_festival_objects(&mut self) -> usize {
        let removed = self.world.remove_unlisted(&self.config.permanent_names);
        self.world.set_background(self.config.background_color());

        if let Some(mut scene) = self.session.current_scene.take() {
            let mut ctx = SceneContext::new(&mut self.world, &self.camera);
            scene.dispose(&mut ctx);
            log::debug!(
                "Disposed {} scene ({} resources swept, {} still tracked)",
                scene.id(),
                removed,
                scene.tracked_resources()
            );
        }
        self.session.current_festival = None;
        removed
    }

    fn start_camera_transition(&mut self, vantage: CameraVantage) {
        if self.config.transition_duration <= 0.0 {
            self.camera.set_target(vantage.target);
            self.camera.set_position(vantage.position);
            self.finish_transition();
            return;
        }
        self.tween = Some(CameraTween::new(
            &self.camera,
            vantage,
            self.config.transition_duration,
            self.config.transition_easing,
        ));
    }

    fn finish_transition(&mut self) {
        self.tween = None;
        self.indicator.hide();
        self.set_transitioning(false);
        log::debug!("Transition finished");
    }

    fn set_transitioning(&mut self, transitioning: bool) {
        self.session.is_transitioning = transitioning;
        if matches!(self.state, ManagerState::Idle | ManagerState::Transitioning) {
            self.state = if transitioning {
                ManagerState::Transitioning
            } else {
                ManagerState::Idle
            };
        }
    }

    //--- Frame ------------------------------------------------------------

    /// Advance the camera move, the live scene and particle systems
    pub fn update(&mut self, delta_time: f32) -> Result<(), ManagerError> {
        self.ensure_ready()?;

        if let Some(tween) = self.tween.as_mut() {
            let finished = tween.apply(&mut self.camera, delta_time);
            if finished {
                self.finish_transition();
            }
        }

        if let Some(scene) = self.session.current_scene.as_mut() {
            let mut ctx = SceneContext::new(&mut self.world, &self.camera);
            scene.update(&mut ctx, delta_time);
        }

        self.world.advance(delta_time);
        Ok(())
    }

    /// Render-loop callback: [`update`](Self::update) then render one frame
    ///
    /// Returns `None` when the render loop is stopped.
    pub fn frame(&mut self, delta_time: f32) -> Result<Option<FrameStats>, ManagerError> {
        self.update(delta_time)?;
        match self.engine.as_mut() {
            Some(engine) => engine.frame(&mut self.world, delta_time).map_err(ManagerError::Render),
            None => Ok(None),
        }
    }

    //--- Input ------------------------------------------------------------

    /// Forward a pick ray to the live scene; returns true if it reacted
    pub fn pick(&mut self, ray: &Ray) -> bool {
        match self.world.pick(ray, PickLayers::INTERACTIVE) {
            Some(hit) => self.pick_resource(hit.id),
            None => false,
        }
    }

    /// Forward a pick trigger on `id` to the live scene
    pub fn pick_resource(&mut self, id: ResourceId) -> bool {
        let Some(scene) = self.session.current_scene.as_mut() else {
            return false;
        };
        let mut ctx = SceneContext::new(&mut self.world, &self.camera);
        scene.handle_pick(&mut ctx, id)
    }

    /// Forward a hover change to the live scene
    pub fn hover(&mut self, id: Option<ResourceId>) {
        if let Some(scene) = self.session.current_scene.as_mut() {
            let mut ctx = SceneContext::new(&mut self.world, &self.camera);
            scene.handle_hover(&mut ctx, id);
        }
    }

    /// Run `f` against the live scene if it is a `T`
    ///
    /// This is how hosts reach festival-specific operations such as lighting
    /// a diya or burning an effigy.
    pub fn with_current_scene<T, R>(&mut self, f: impl FnOnce(&mut T, &mut SceneContext<'_>) -> R) -> Option<R>
    where
        T: FestivalScene,
    {
        let scene = self.session.current_scene.as_mut()?;
        let scene = scene.as_any_mut().downcast_mut::<T>()?;
        let mut ctx = SceneContext::new(&mut self.world, &self.camera);
        Some(f(scene, &mut ctx))
    }

    //--- Accessors --------------------------------------------------------

    /// Current lifecycle state
    pub fn state(&self) -> ManagerState {
        self.state
    }

    /// Festival of the live scene
    pub fn current_festival(&self) -> Option<FestivalId> {
        self.session.current_festival
    }

    /// Whether a transition is in progress
    pub fn is_transitioning(&self) -> bool {
        self.session.is_transitioning
    }

    /// Session record
    pub fn session(&self) -> &FestivalSession {
        &self.session
    }

    /// The live scene
    pub fn current_scene(&self) -> Option<&dyn FestivalScene> {
        self.session.current_scene()
    }

    /// Resources still tracked by the live scene
    pub fn current_scene_resources(&self) -> usize {
        self.session
            .current_scene
            .as_ref()
            .map_or(0, |scene| scene.tracked_resources())
    }

    /// Render world
    pub fn world(&self) -> &RenderWorld {
        &self.world
    }

    /// Shared camera
    pub fn camera(&self) -> &ArcRotateCamera {
        &self.camera
    }

    /// Render engine, once initialized
    pub fn engine(&self) -> Option<&RenderEngine> {
        self.engine.as_ref()
    }

    /// Active configuration
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    //--- Host lifecycle ---------------------------------------------------

    /// Resize the surface and update the camera aspect ratio
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), ManagerError> {
        self.ensure_ready()?;
        let engine = self.engine.as_mut().ok_or(ManagerError::NotInitialized)?;
        let aspect = engine.resize(width, height).map_err(ManagerError::Render)?;
        self.camera.set_aspect_ratio(aspect);
        Ok(())
    }

    /// Dispose the live scene, every resource and the engine
    ///
    /// Safe to call more than once.
    pub fn dispose(&mut self) {
        if self.state == ManagerState::Disposed {
            return;
        }
        self.clear_festival_objects();
        if self.session.is_transitioning {
            self.finish_transition();
        }
        if let Some(engine) = self.engine.as_mut() {
            engine.dispose();
        }
        self.world.clear();
        self.state = ManagerState::Disposed;
        log::info!("Scene manager disposed");
    }
}

impl fmt::Debug for SceneManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneManager")
            .field("state", &self.state)
            .field("session", &self.session)
            .field("resources", &self.world.count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{HeadlessSurface, ResourceKind};
    use crate::scene::{SceneError, SceneResources};
    use approx::assert_relative_eq;
    use std::any::Any;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Events = Rc<RefCell<Vec<String>>>;

    struct RecordingIndicator {
        events: Events,
    }

    impl LoadingIndicator for RecordingIndicator {
        fn show(&mut self, festival: FestivalId) {
            self.events.borrow_mut().push(format!("show {}", festival));
        }

        fn hide(&mut self) {
            self.events.borrow_mut().push("hide".to_string());
        }
    }

    /// Builds `lamps` point lights, failing on `fail_at` if set
    struct MockScene {
        id: FestivalId,
        resources: SceneResources,
        lamps: usize,
        fail_at: Option<usize>,
        loaded: bool,
        picks: usize,
        events: Events,
    }

    impl MockScene {
        fn new(id: FestivalId, lamps: usize, fail_at: Option<usize>, events: Events) -> Self {
            Self {
                id,
                resources: SceneResources::new(id),
                lamps,
                fail_at,
                loaded: false,
                picks: 0,
                events,
            }
        }
    }

    impl FestivalScene for MockScene {
        fn id(&self) -> FestivalId {
            self.id
        }

        fn create(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
            self.events.borrow_mut().push(format!("create {}", self.id));
            for i in 0..self.lamps {
                if self.fail_at == Some(i) {
                    return Err(SceneError::InvalidLayout(format!("lamp {}", i)));
                }
                let material = self.resources.material(ctx.world, &format!("lamp{}Mat", i), Material::new(Color::x()))?;
                self.resources.mesh(
                    ctx.world,
                    &format!("lamp{}", i),
                    Mesh::new(Shape::Sphere { diameter: 1.0 })
                        .at(Vec3::new(i as f32 * 3.0, 1.0, 0.0))
                        .with_material(material)
                        .pickable(PickLayers::INTERACTIVE),
                )?;
            }
            self.loaded = true;
            Ok(())
        }

        fn is_loaded(&self) -> bool {
            self.loaded
        }

        fn handle_pick(&mut self, _ctx: &mut SceneContext<'_>, id: ResourceId) -> bool {
            if self.resources.contains(id) {
                self.picks += 1;
                return true;
            }
            false
        }

        fn vantage(&self) -> CameraVantage {
            CameraVantage::new(Vec3::new(0.0, 8.0, -15.0), Vec3::new(0.0, 1.0, 0.0))
        }

        fn tracked_resources(&self) -> usize {
            self.resources.len()
        }

        fn dispose(&mut self, ctx: &mut SceneContext<'_>) {
            self.events.borrow_mut().push(format!("dispose {}", self.id));
            self.resources.release_all(ctx.world);
            self.loaded = false;
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn registry(events: &Events) -> SceneRegistry {
        let mut registry = SceneRegistry::new();
        for (festival, fail_at) in [
            (FestivalId::Diwali, None),
            (FestivalId::Holi, None),
            (FestivalId::Dussehra, Some(2)),
        ] {
            let events = events.clone();
            registry.register(festival, move |_| {
                Box::new(MockScene::new(festival, 4, fail_at, events.clone()))
            });
        }
        registry
    }

    fn manager_with(config: ManagerConfig) -> (SceneManager, Events) {
        let events: Events = Rc::default();
        let manager = SceneManager::new(Box::new(HeadlessSurface::new(800, 600)), registry(&events), config)
            .with_loading_indicator(Box::new(RecordingIndicator { events: events.clone() }));
        (manager, events)
    }

    fn ready_manager() -> (SceneManager, Events) {
        let (mut manager, events) = manager_with(ManagerConfig::default());
        manager.initialize().unwrap();
        (manager, events)
    }

    fn finish_transition(manager: &mut SceneManager) {
        for _ in 0..30 {
            manager.frame(0.1).unwrap();
        }
        assert!(!manager.is_transitioning());
    }

    #[test]
    fn test_initialize_builds_permanent_environment() {
        let (mut manager, _) = ready_manager();
        assert_eq!(manager.state(), ManagerState::Idle);
        let world = manager.world();
        for name in ["hemiLight", "dirLight", "ground", "skybox"] {
            assert!(world.find_by_name(name).is_some(), "missing {}", name);
        }
        assert_eq!(world.count_kind(ResourceKind::Light), 2);
        assert!(manager.engine().is_some_and(RenderEngine::is_running));

        let before = manager.world().count();
        manager.initialize().unwrap();
        assert_eq!(manager.world().count(), before);
    }

    #[test]
    fn test_calls_before_initialize_fail() {
        let (mut manager, _) = manager_with(ManagerConfig::default());
        assert_eq!(manager.load_festival_scene("diwali"), Err(ManagerError::NotInitialized));
        assert_eq!(manager.update(0.1), Err(ManagerError::NotInitialized));
    }

    #[test]
    fn test_setup_failure_leaves_manager_unusable() {
        let registry = SceneRegistry::new();
        let mut manager = SceneManager::new(
            Box::new(HeadlessSurface::new(0, 0)),
            registry,
            ManagerConfig::default(),
        );
        assert!(matches!(manager.initialize(), Err(ManagerError::SetupFailed(_))));
        assert_eq!(manager.state(), ManagerState::Unusable);
        assert_eq!(manager.world().count(), 0);

        assert!(matches!(manager.initialize(), Err(ManagerError::SetupFailed(_))));
        assert!(matches!(
            manager.load_festival_scene("holi"),
            Err(ManagerError::SetupFailed(_))
        ));
    }

    #[test]
    fn test_load_orders_steps() {
        let (mut manager, events) = ready_manager();
        manager.load_festival_scene("diwali").unwrap();
        finish_transition(&mut manager);
        events.borrow_mut().clear();

        let outcome = manager.load_festival_scene("holi").unwrap();
        assert_eq!(outcome, TransitionOutcome::Started(FestivalId::Holi));
        assert_eq!(
            *events.borrow(),
            vec!["show holi".to_string(), "dispose diwali".to_string(), "create holi".to_string()]
        );
        assert!(manager.is_transitioning());
        assert_eq!(manager.state(), ManagerState::Transitioning);

        finish_transition(&mut manager);
        assert_eq!(events.borrow().last().map(String::as_str), Some("hide"));
        assert_eq!(manager.state(), ManagerState::Idle);
    }

    #[test]
    fn test_overlapping_load_is_dropped() {
        let (mut manager, _) = ready_manager();
        manager.load_festival_scene("diwali").unwrap();
        let resources = manager.world().count();

        let outcome = manager.load_festival_scene("holi").unwrap();
        assert_eq!(outcome, TransitionOutcome::Dropped);
        assert_eq!(manager.world().count(), resources);
        assert_eq!(manager.current_festival(), Some(FestivalId::Diwali));
    }

    #[test]
    fn test_camera_arrives_at_vantage() {
        let (mut manager, _) = ready_manager();
        manager.load_festival_scene("diwali").unwrap();
        finish_transition(&mut manager);

        let position = manager.camera().position();
        assert_relative_eq!(position, Vec3::new(0.0, 8.0, -15.0), epsilon = 1e-3);
        assert_relative_eq!(manager.camera().target, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let config = ManagerConfig {
            transition_duration: 0.0,
            ..ManagerConfig::default()
        };
        let (mut manager, events) = manager_with(config);
        manager.initialize().unwrap();
        manager.load_festival_scene("diwali").unwrap();
        assert!(!manager.is_transitioning());
        assert_eq!(events.borrow().last().map(String::as_str), Some("hide"));
    }

    #[test]
    fn test_switch_leaves_nothing_from_previous_scene() {
        let (mut manager, _) = ready_manager();
        let permanent = manager.world().count();

        manager.load_festival_scene("diwali").unwrap();
        finish_transition(&mut manager);
        assert_eq!(manager.world().count_owned_by(Owner::Scene("diwali")), 8);

        manager.load_festival_scene("holi").unwrap();
        assert_eq!(manager.world().count_owned_by(Owner::Scene("diwali")), 0);
        assert_eq!(manager.world().count(), permanent + 8);
        assert_eq!(manager.current_scene_resources(), 8);
    }

    #[test]
    fn test_failed_create_rolls_back() {
        let (mut manager, events) = ready_manager();
        let permanent = manager.world().count();

        let result = manager.load_festival_scene("dussehra");
        assert!(matches!(
            result,
            Err(ManagerError::SceneCreation { festival: FestivalId::Dussehra, .. })
        ));
        assert_eq!(manager.world().count(), permanent);
        assert_eq!(manager.current_festival(), None);
        assert!(manager.current_scene().is_none());
        assert!(!manager.is_transitioning());
        assert_eq!(events.borrow().last().map(String::as_str), Some("hide"));

        assert!(manager.load_festival_scene("holi").is_ok());
    }

    #[test]
    fn test_failed_create_kept_without_rollback() {
        let config = ManagerConfig {
            rollback_on_failure: false,
            ..ManagerConfig::default()
        };
        let (mut manager, _) = manager_with(config);
        manager.initialize().unwrap();

        let outcome = manager.load_festival_scene("dussehra").unwrap();
        assert_eq!(outcome, TransitionOutcome::Started(FestivalId::Dussehra));
        assert_eq!(manager.current_scene_resources(), 4);
        assert!(manager.current_scene().is_some_and(|scene| !scene.is_loaded()));

        finish_transition(&mut manager);
        manager.load_festival_scene("holi").unwrap();
        assert_eq!(manager.world().count_owned_by(Owner::Scene("dussehra")), 0);
    }

    #[test]
    fn test_unknown_festival_uses_default_scene() {
        let (mut manager, _) = ready_manager();
        let outcome = manager.load_festival_scene("unknown-id").unwrap();
        assert_eq!(outcome, TransitionOutcome::Started(FestivalId::Default));
        assert_eq!(manager.current_scene().map(|s| s.id()), Some(FestivalId::Default));

        finish_transition(&mut manager);
        assert!(!manager.is_transitioning());
    }

    #[test]
    fn test_clear_keeps_allow_listed_resources() {
        let (mut manager, _) = ready_manager();
        let permanent = manager.world().count();
        manager.load_festival_scene("diwali").unwrap();

        let removed = manager.clear_festival_objects();
        assert_eq!(removed, 8);
        assert_eq!(manager.world().count(), permanent);
        assert!(manager.world().find_by_name("groundMaterial").is_some());
        assert!(manager.world().find_by_name("skyboxTexture").is_some());
        assert!(manager.current_scene().is_none());
    }

    #[test]
    fn test_pick_reaches_live_scene() {
        let (mut manager, _) = ready_manager();
        manager.load_festival_scene("diwali").unwrap();
        finish_transition(&mut manager);

        let ray = manager.camera().ray_towards(Vec3::new(0.0, 1.0, 0.0));
        assert!(manager.pick(&ray));
        let picks = manager.with_current_scene(|scene: &mut MockScene, _| scene.picks);
        assert_eq!(picks, Some(1));

        let wrong_type = manager.with_current_scene(|_: &mut crate::scene::DefaultScene, _| ());
        assert!(wrong_type.is_none());
    }

    #[test]
    fn test_resize_updates_aspect() {
        let (mut manager, _) = ready_manager();
        manager.resize(1000, 500).unwrap();
        assert_relative_eq!(manager.camera().aspect, 2.0);
        assert!(matches!(manager.resize(0, 500), Err(ManagerError::Render(_))));
    }

    #[test]
    fn test_dispose_releases_everything() {
        let (mut manager, events) = ready_manager();
        manager.load_festival_scene("diwali").unwrap();
        manager.dispose();

        assert_eq!(manager.state(), ManagerState::Disposed);
        assert_eq!(manager.world().count(), 0);
        assert!(!manager.is_transitioning());
        assert!(manager.engine().is_some_and(RenderEngine::is_disposed));
        assert!(events.borrow().contains(&"dispose diwali".to_string()));

        manager.dispose();
        assert_eq!(manager.load_festival_scene("holi"), Err(ManagerError::Disposed));
    }
}
