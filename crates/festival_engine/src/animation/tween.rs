//! Property tweens

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Lerp, Vec3};
use crate::render::ArcRotateCamera;

/// Easing curves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant speed
    #[default]
    Linear,
    /// Quadratic acceleration then deceleration
    EaseInOutQuad,
    /// Cubic deceleration
    EaseOutCubic,
}

impl Easing {
    /// Map linear progress `t` in `0.0..=1.0` onto the curve
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

/// Interpolates a value from `from` to `to` over `duration` seconds
#[derive(Debug, Clone)]
pub struct Tween<T: Lerp> {
    from: T,
    to: T,
    duration: f32,
    elapsed: f32,
    easing: Easing,
}

impl<T: Lerp> Tween<T> {
    /// Create a tween; a non-positive duration finishes on the first advance
    pub fn new(from: T, to: T, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
            easing,
        }
    }

    /// Linear progress in `0.0..=1.0`
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    /// Current interpolated value
    pub fn value(&self) -> T {
        self.from.lerp_to(&self.to, self.easing.apply(self.progress()))
    }

    /// Advance by `delta_time` seconds and return the new value
    pub fn advance(&mut self, delta_time: f32) -> T {
        self.elapsed += delta_time.max(0.0);
        self.value()
    }

    /// Whether the tween reached its end value
    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }
}

/// Camera eye position and look-at target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraVantage {
    /// Eye position
    pub position: Vec3,
    /// Look-at point
    pub target: Vec3,
}

impl CameraVantage {
    /// Create a vantage point
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self { position, target }
    }

    /// Current vantage of a camera
    pub fn of(camera: &ArcRotateCamera) -> Self {
        Self::new(camera.position(), camera.target)
    }
}

/// Moves a camera's position and target together
#[derive(Debug, Clone)]
pub struct CameraTween {
    position: Tween<Vec3>,
    target: Tween<Vec3>,
}

impl CameraTween {
    /// Tween from the camera's current vantage to `to`
    pub fn new(camera: &ArcRotateCamera, to: CameraVantage, duration: f32, easing: Easing) -> Self {
        let from = CameraVantage::of(camera);
        Self {
            position: Tween::new(from.position, to.position, duration, easing),
            target: Tween::new(from.target, to.target, duration, easing),
        }
    }

    /// Advance and apply to the camera; returns true once finished
    pub fn apply(&mut self, camera: &mut ArcRotateCamera, delta_time: f32) -> bool {
        let target = self.target.advance(delta_time);
        let position = self.position.advance(delta_time);
        camera.set_target(target);
        camera.set_position(position);
        self.is_finished()
    }

    /// Whether both tracks finished
    pub fn is_finished(&self) -> bool {
        self.position.is_finished() && self.target.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::CameraLimits;
    use approx::assert_relative_eq;

    #[test]
    fn test_easing_endpoints() {
        for easing in [Easing::Linear, Easing::EaseInOutQuad, Easing::EaseOutCubic] {
            assert_relative_eq!(easing.apply(0.0), 0.0);
            assert_relative_eq!(easing.apply(1.0), 1.0);
        }
        assert_relative_eq!(Easing::EaseInOutQuad.apply(0.5), 0.5);
    }

    #[test]
    fn test_tween_progress() {
        let mut tween = Tween::new(0.0_f32, 10.0, 2.0, Easing::Linear);
        assert_relative_eq!(tween.advance(0.5), 2.5);
        assert!(!tween.is_finished());
        assert_relative_eq!(tween.advance(5.0), 10.0);
        assert!(tween.is_finished());
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let tween = Tween::new(1.0_f32, 3.0, 0.0, Easing::Linear);
        assert!(tween.is_finished());
        assert_relative_eq!(tween.value(), 3.0);
    }

    #[test]
    fn test_camera_tween_reaches_destination() {
        let mut camera = ArcRotateCamera::new(0.0, 1.0, 20.0, Vec3::zeros(), CameraLimits::default());
        let to = CameraVantage::new(Vec3::new(0.0, 8.0, -15.0), Vec3::new(0.0, 2.0, 0.0));
        let mut tween = CameraTween::new(&camera, to, 2.0, Easing::Linear);

        let mut finished = false;
        for _ in 0..130 {
            finished = tween.apply(&mut camera, 1.0 / 60.0);
            if finished {
                break;
            }
        }
        assert!(finished);
        assert_relative_eq!(camera.target, to.target, epsilon = 1e-4);
        assert_relative_eq!(camera.position(), to.position, epsilon = 1e-3);
    }
}
