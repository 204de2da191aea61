//! # Festivals
//!
//! Interactive Indian festival scenes on top of `festival_engine`.
//!
//! [`registry`] wires all six scenes into a
//! [`SceneRegistry`](festival_engine::scene::SceneRegistry) that a
//! [`SceneManager`](festival_engine::scene::SceneManager) can switch between.
//!
//! ```rust,no_run
//! use festival_engine::prelude::*;
//!
//! let mut manager = SceneManager::new(
//!     Box::new(HeadlessSurface::new(1280, 720)),
//!     festivals::registry(),
//!     ManagerConfig::default(),
//! );
//! manager.initialize()?;
//! manager.load_festival_scene("holi")?;
//! # Ok::<(), festival_engine::scene::ManagerError>(())
//! ```

pub mod config;
pub mod scenes;

use festival_engine::scene::{FestivalId, FestivalScene, SceneRegistry};

use scenes::{DiwaliScene, DussehraScene, GaneshScene, HoliScene, KumbhScene, NavratriScene};

/// Registry with a constructor for every festival
pub fn registry() -> SceneRegistry {
    SceneRegistry::new()
        .with(FestivalId::Diwali, |c| -> Box<dyn FestivalScene> { Box::new(DiwaliScene::new(c)) })
        .with(FestivalId::Holi, |c| -> Box<dyn FestivalScene> { Box::new(HoliScene::new(c)) })
        .with(FestivalId::Navratri, |c| -> Box<dyn FestivalScene> { Box::new(NavratriScene::new(c)) })
        .with(FestivalId::Ganesh, |c| -> Box<dyn FestivalScene> { Box::new(GaneshScene::new(c)) })
        .with(FestivalId::Dussehra, |c| -> Box<dyn FestivalScene> { Box::new(DussehraScene::new(c)) })
        .with(FestivalId::Kumbh, |c| -> Box<dyn FestivalScene> { Box::new(KumbhScene::new(c)) })
}

#[cfg(test)]
mod tests;
