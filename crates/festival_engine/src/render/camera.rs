//! # Orbit Camera
//!
//! Arc-rotate camera orbiting a target point. The polar angle (`beta`) and
//! the orbit distance (`radius`) are clamped into configurable bounds so the
//! viewer can never look from below the ground or zoom into the set.
//!
//! ## Coordinate System
//! Right-handed, Y-up. `alpha` is the azimuth around Y measured from +X,
//! `beta` the polar angle measured from +Y.

use crate::foundation::math::Vec3;

use super::picking::Ray;
use serde::{Deserialize, Serialize};

/// Orbit bounds applied to every camera update
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraLimits {
    /// Smallest polar angle in radians
    pub lower_beta: f32,
    /// Largest polar angle in radians
    pub upper_beta: f32,
    /// Closest zoom distance
    pub lower_radius: f32,
    /// Farthest zoom distance
    pub upper_radius: f32,
}

impl Default for CameraLimits {
    fn default() -> Self {
        Self {
            lower_beta: 0.1,
            upper_beta: std::f32::consts::FRAC_PI_2 * 0.95,
            lower_radius: 5.0,
            upper_radius: 50.0,
        }
    }
}

impl CameraLimits {
    /// Whether the bounds are ordered and inside the valid orbit range
    pub fn is_valid(&self) -> bool {
        self.lower_beta >= 0.0
            && self.lower_beta <= self.upper_beta
            && self.upper_beta <= std::f32::consts::PI
            && self.lower_radius > 0.0
            && self.lower_radius <= self.upper_radius
    }
}

/// Arc-rotate camera
#[derive(Debug, Clone, PartialEq)]
pub struct ArcRotateCamera {
    /// Azimuth in radians
    pub alpha: f32,
    /// Polar angle in radians
    pub beta: f32,
    /// Distance to the target
    pub radius: f32,
    /// Point the camera orbits and looks at
    pub target: Vec3,
    /// Vertical field of view in radians
    pub fov: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
    limits: CameraLimits,
}

impl ArcRotateCamera {
    /// Create a camera; the orbit is clamped into `limits` immediately
    pub fn new(alpha: f32, beta: f32, radius: f32, target: Vec3, limits: CameraLimits) -> Self {
        let mut camera = Self {
            alpha,
            beta,
            radius,
            target,
            fov: std::f32::consts::FRAC_PI_4,
            aspect: 16.0 / 9.0,
            limits,
        };
        camera.clamp();
        camera
    }

    /// World-space eye position
    pub fn position(&self) -> Vec3 {
        let (sin_b, cos_b) = self.beta.sin_cos();
        let (sin_a, cos_a) = self.alpha.sin_cos();
        self.target + Vec3::new(cos_a * sin_b, cos_b, sin_a * sin_b) * self.radius
    }

    /// Move the eye to `position`, keeping the target
    ///
    /// The orbit parameters are recomputed from the offset and clamped, so the
    /// resulting position may differ from the request.
    pub fn set_position(&mut self, position: Vec3) {
        let offset = position - self.target;
        let radius = offset.magnitude();
        if radius <= f32::EPSILON {
            log::trace!("Ignoring camera position at target {:?}", position);
            return;
        }
        self.radius = radius;
        self.beta = (offset.y / radius).clamp(-1.0, 1.0).acos();
        self.alpha = offset.z.atan2(offset.x);
        self.clamp();
        log::trace!("Camera position updated to: {:?}", self.position());
    }

    /// Change the orbit target, keeping alpha/beta/radius
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
        log::trace!("Camera target updated to: {:?}", target);
    }

    /// Update aspect ratio for viewport changes
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        if (self.aspect - aspect).abs() > 0.01 {
            log::info!("Camera aspect ratio changed: {:.3} -> {:.3}", self.aspect, aspect);
        }
        self.aspect = aspect;
    }

    /// Pick ray from the eye through a world-space point
    pub fn ray_towards(&self, point: Vec3) -> Ray {
        Ray::through(self.position(), point)
    }

    fn clamp(&mut self) {
        self.beta = self.beta.clamp(self.limits.lower_beta, self.limits.upper_beta);
        self.radius = self.radius.clamp(self.limits.lower_radius, self.limits.upper_radius);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn limits() -> CameraLimits {
        CameraLimits {
            lower_beta: 0.1,
            upper_beta: 1.5,
            lower_radius: 2.0,
            upper_radius: 40.0,
        }
    }

    #[test]
    fn test_constructor_clamps() {
        let camera = ArcRotateCamera::new(0.0, 3.0, 100.0, Vec3::zeros(), limits());
        assert_relative_eq!(camera.beta, 1.5);
        assert_relative_eq!(camera.radius, 40.0);
    }

    #[test]
    fn test_position_roundtrip_inside_bounds() {
        let mut camera = ArcRotateCamera::new(0.0, 1.0, 10.0, Vec3::new(0.0, 1.0, 0.0), limits());
        let wanted = Vec3::new(3.0, 6.0, -8.0);
        camera.set_position(wanted);
        assert_relative_eq!(camera.position(), wanted, epsilon = 1e-4);
    }

    #[test]
    fn test_position_below_ground_is_clamped() {
        let mut camera = ArcRotateCamera::new(0.0, 1.0, 10.0, Vec3::zeros(), limits());
        camera.set_position(Vec3::new(0.0, -10.0, 1.0));
        assert!(camera.beta <= 1.5);
        assert!(camera.position().y > 0.0);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut camera = ArcRotateCamera::new(0.0, 1.0, 10.0, Vec3::zeros(), limits());
        camera.set_position(Vec3::new(0.5, 0.5, 0.0));
        assert_relative_eq!(camera.radius, 2.0);
    }

    #[test]
    fn test_set_position_at_target_ignored() {
        let mut camera = ArcRotateCamera::new(0.5, 1.0, 10.0, Vec3::zeros(), limits());
        let before = camera.clone();
        camera.set_position(Vec3::zeros());
        assert_eq!(camera, before);
    }

    #[test]
    fn test_default_limits_valid() {
        assert!(CameraLimits::default().is_valid());
        let bad = CameraLimits { lower_radius: 10.0, upper_radius: 1.0, ..CameraLimits::default() };
        assert!(!bad.is_valid());
    }
}
