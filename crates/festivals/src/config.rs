//! Demo driver configuration

use festival_engine::config::{Config, ConfigError, ManagerConfig};
use festival_engine::scene::FestivalId;
use serde::{Deserialize, Serialize};

/// Settings for the headless festival tour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Festivals to visit, in order; unknown names land on the default scene
    pub sequence: Vec<String>,
    /// Simulated seconds spent in each festival
    pub seconds_per_festival: f32,
    /// Simulated frames per second
    pub fps: u32,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Scene manager settings
    pub manager: ManagerConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            sequence: FestivalId::ALL.iter().map(|f| f.as_str().to_string()).collect(),
            seconds_per_festival: 15.0,
            fps: 30,
            log_level: "info".to_string(),
            manager: ManagerConfig::default(),
        }
    }
}

impl DemoConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 {
            return Err(ConfigError::Invalid("fps must be positive".to_string()));
        }
        if !(self.seconds_per_festival.is_finite() && self.seconds_per_festival > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "seconds_per_festival must be positive, got {}",
                self.seconds_per_festival
            )));
        }
        self.manager.validate()
    }

    /// Seconds per simulated frame
    pub fn frame_delta(&self) -> f32 {
        1.0 / self.fps as f32
    }

    /// Frames spent in each festival
    pub fn frames_per_festival(&self) -> u32 {
        (self.seconds_per_festival * self.fps as f32).ceil() as u32
    }
}

impl Config for DemoConfig {}
