//! Fallback scene for unknown festival identifiers

use std::any::Any;

use crate::animation::CameraVantage;
use crate::foundation::math::{Color, Vec3};
use crate::render::Light;

use super::error::SceneError;
use super::festival::FestivalId;
use super::lifecycle::{FestivalScene, SceneContext};
use super::resources::SceneResources;

/// Empty stage with a soft fill light
///
/// Loaded when the selector is not one of the known festivals, so an unknown
/// request never leaves the viewer on a black screen or a stuck transition.
#[derive(Debug)]
pub struct DefaultScene {
    resources: SceneResources,
    loaded: bool,
}

impl DefaultScene {
    /// Create an unbuilt fallback scene
    pub fn new() -> Self {
        Self {
            resources: SceneResources::new(FestivalId::Default),
            loaded: false,
        }
    }
}

impl Default for DefaultScene {
    fn default() -> Self {
        Self::new()
    }
}

impl FestivalScene for DefaultScene {
    fn id(&self) -> FestivalId {
        FestivalId::Default
    }

    fn create(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
        if self.loaded {
            return Ok(());
        }
        self.resources.light(
            ctx.world,
            "fill",
            Light::hemispheric(Vec3::new(0.0, 1.0, 0.0), Color::new(0.9, 0.9, 1.0), 0.4),
        )?;
        ctx.world.set_background(Color::new(0.1, 0.1, 0.15));
        self.loaded = true;
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn vantage(&self) -> CameraVantage {
        CameraVantage::new(Vec3::new(0.0, 10.0, -20.0), Vec3::zeros())
    }

    fn tracked_resources(&self) -> usize {
        self.resources.len()
    }

    fn dispose(&mut self, ctx: &mut SceneContext<'_>) {
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
