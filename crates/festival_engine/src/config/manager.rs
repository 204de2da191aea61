//! Scene manager configuration

use serde::{Deserialize, Serialize};

use crate::animation::Easing;
use crate::foundation::math::Color;
use crate::render::CameraLimits;

use super::{Config, ConfigError};

/// Initial orbit and bounds of the shared camera
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Initial azimuth in radians
    pub alpha: f32,
    /// Initial polar angle in radians
    pub beta: f32,
    /// Initial orbit distance
    pub radius: f32,
    /// Polar angle and zoom bounds
    pub limits: CameraLimits,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            alpha: -std::f32::consts::FRAC_PI_2,
            beta: std::f32::consts::FRAC_PI_3,
            radius: 25.0,
            limits: CameraLimits::default(),
        }
    }
}

/// Scene manager settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Shared camera
    pub camera: CameraSettings,
    /// Seconds the camera takes to reach a festival's vantage point
    pub transition_duration: f32,
    /// Easing of the camera transition
    pub transition_easing: Easing,
    /// Dispose a scene whose `create()` failed instead of leaving it partially built
    pub rollback_on_failure: bool,
    /// Resource names that survive festival switches
    pub permanent_names: Vec<String>,
    /// Side length of the ground plane
    pub ground_size: f32,
    /// Diameter of the skybox
    pub skybox_size: f32,
    /// Clear colour before any festival sets its own
    pub background: [f32; 3],
    /// Seed for particle randomness
    pub seed: u64,
}

impl ManagerConfig {
    /// Name of the permanent ground mesh
    pub const GROUND: &'static str = "ground";
    /// Name of the permanent skybox mesh
    pub const SKYBOX: &'static str = "skybox";
    /// Name of the permanent hemispheric light
    pub const HEMI_LIGHT: &'static str = "hemiLight";
    /// Name of the permanent directional light
    pub const DIR_LIGHT: &'static str = "dirLight";

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.camera.limits.is_valid() {
            return Err(ConfigError::Invalid(format!("camera limits {:?}", self.camera.limits)));
        }
        if !self.transition_duration.is_finite() || self.transition_duration < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "transition duration {}",
                self.transition_duration
            )));
        }
        if self.ground_size <= 0.0 || self.skybox_size <= 0.0 {
            return Err(ConfigError::Invalid("ground and skybox sizes must be positive".to_string()));
        }
        Ok(())
    }

    /// Background as a colour
    pub fn background_color(&self) -> Color {
        Color::new(self.background[0], self.background[1], self.background[2])
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            camera: CameraSettings::default(),
            transition_duration: 2.0,
            transition_easing: Easing::Linear,
            rollback_on_failure: true,
            permanent_names: vec![
                Self::GROUND.to_string(),
                Self::SKYBOX.to_string(),
                Self::HEMI_LIGHT.to_string(),
                Self::DIR_LIGHT.to_string(),
            ],
            ground_size: 100.0,
            skybox_size: 500.0,
            background: [0.05, 0.05, 0.1],
            seed: 0x00D1_7A11,
        }
    }
}

impl Config for ManagerConfig {}
