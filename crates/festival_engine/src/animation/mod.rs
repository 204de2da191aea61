//! Time-driven animation
//!
//! Tweens interpolate a property over a fixed duration; the scheduler holds
//! one-shot delayed tasks that their owner can cancel. Both advance only when
//! the owner feeds them frame deltas, so nothing runs after its owner stops
//! ticking it.

mod scheduler;
mod tween;

pub use scheduler::Scheduler;
pub use tween::{CameraTween, CameraVantage, Easing, Tween};
