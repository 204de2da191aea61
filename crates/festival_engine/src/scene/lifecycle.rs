//! Festival scene contract

use std::any::Any;

use crate::animation::CameraVantage;
use crate::foundation::collections::ResourceId;
use crate::render::{ArcRotateCamera, RenderWorld};

use super::error::SceneError;
use super::festival::FestivalId;

/// Borrowed environment handed to scene callbacks
///
/// Scenes may allocate and mutate their own resources in `world`; the
/// camera is read-only because the manager owns camera motion.
pub struct SceneContext<'a> {
    /// World holding every render resource
    pub world: &'a mut RenderWorld,
    /// Shared camera
    pub camera: &'a ArcRotateCamera,
}

impl<'a> SceneContext<'a> {
    /// Bundle a world and camera
    pub fn new(world: &'a mut RenderWorld, camera: &'a ArcRotateCamera) -> Self {
        Self { world, camera }
    }
}

/// One self-contained festival vignette
///
/// # Lifecycle
///
/// ```text
/// new(collaborators) → create() → [update / handle_pick / handle_hover]* → dispose()
/// ```
///
/// # Minimal Implementation
///
/// `update`, `handle_pick` and `handle_hover` default to no-ops; every scene
/// must build in `create`, free in `dispose`, and report its vantage point.
pub trait FestivalScene: Any {
    /// Festival this scene renders
    fn id(&self) -> FestivalId;

    /// Build atmosphere, set dressing, effects, and pick targets
    ///
    /// Called once per instance; a second call on a loaded scene is a no-op.
    /// On error, whatever was built so far stays tracked so `dispose` can
    /// free it.
    fn create(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), SceneError>;

    /// Whether `create` completed successfully
    fn is_loaded(&self) -> bool;

    /// Advance animations, particles and scheduled effects
    fn update(&mut self, _ctx: &mut SceneContext<'_>, _delta_time: f32) {}

    /// React to a pick trigger on `id`; returns true if the scene handled it
    fn handle_pick(&mut self, _ctx: &mut SceneContext<'_>, _id: ResourceId) -> bool {
        false
    }

    /// Pointer moved onto `id`, or off every mesh when `None`
    fn handle_hover(&mut self, _ctx: &mut SceneContext<'_>, _id: Option<ResourceId>) {}

    /// Where the camera should settle for this scene
    fn vantage(&self) -> CameraVantage;

    /// Number of render resources this scene still owns
    fn tracked_resources(&self) -> usize;

    /// Number of scheduled effects still pending
    fn pending_tasks(&self) -> usize {
        0
    }

    /// Free every resource and cancel every pending task
    ///
    /// Must be safe after a failed or partial `create`, and safe to repeat.
    fn dispose(&mut self, ctx: &mut SceneContext<'_>);

    /// Downcast support for festival-specific operations
    fn as_any(&self) -> &dyn Any;

    /// Mutable downcast support for festival-specific operations
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
