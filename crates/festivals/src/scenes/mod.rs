//! The six festival scenes
//!
//! Each scene owns a [`SceneResources`](festival_engine::scene::SceneResources)
//! tracker and a task scheduler, builds its world in `create()` and frees both
//! in `dispose()`. Interaction methods are idempotent: repeating a completed
//! action returns `false` and changes nothing.

pub mod common;
pub mod diwali;
pub mod dussehra;
pub mod ganesh;
pub mod holi;
pub mod kumbh;
pub mod navratri;

#[cfg(test)]
pub(crate) mod testing;

pub use diwali::{DiwaliScene, Diya};
pub use dussehra::{DussehraScene, Effigy, EffigyKind, EffigyState};
pub use ganesh::{GaneshScene, ModakPlate, Procession};
pub use holi::{ColorPile, GulalColor, HoliScene, Person};
pub use kumbh::{FloatingDiya, KumbhScene, Sadhu};
pub use navratri::{Dancer, NavratriScene, NightLamp};
