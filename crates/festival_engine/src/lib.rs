//! # Festival Engine
//!
//! Retained-mode scene runtime for interactive festival vignettes.
//!
//! ## Features
//!
//! - **Render world**: meshes, materials, textures, lights and particle
//!   systems behind generational handles, with ray picking
//! - **Orbit camera**: bounded polar angle and zoom, tweened transitions
//! - **Scene lifecycle**: `create()` / `dispose()` contract with per-scene
//!   resource tracking and cancellable scheduled effects
//! - **Scene manager**: festival switching with a transition guard, loading
//!   indicator and a permanent environment
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use festival_engine::prelude::*;
//!
//! fn main() -> Result<(), ManagerError> {
//!     let surface = Box::new(HeadlessSurface::new(1280, 720));
//!     let mut manager = SceneManager::new(surface, SceneRegistry::new(), ManagerConfig::default());
//!     manager.initialize()?;
//!     manager.load_festival_scene("diwali")?;
//!     for _ in 0..120 {
//!         manager.frame(1.0 / 60.0)?;
//!     }
//!     manager.dispose();
//!     Ok(())
//! }
//! ```

pub mod animation;
pub mod config;
pub mod foundation;
pub mod render;
pub mod scene;

/// Common imports for scene authors and hosts
pub mod prelude {
    pub use crate::{
        animation::{CameraVantage, Easing, Scheduler},
        config::{Config, ManagerConfig},
        foundation::{
            collections::{ResourceId, TaskId},
            math::{rgb8, Color, Vec3},
        },
        render::{
            ArcRotateCamera, HeadlessSurface, Light, Material, Mesh, ParticleSystem, PickLayers, Ray,
            RenderError, RenderWorld, Shape, Texture, TexturePattern,
        },
        scene::{
            Collaborators, FestivalId, FestivalScene, ManagerError, SceneContext, SceneError, SceneManager,
            SceneRegistry, SceneResources, TransitionOutcome,
        },
    };
}
