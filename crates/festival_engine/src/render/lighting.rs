//! Light resources

use crate::foundation::math::{Color, Vec3};

/// Types of lights supported by the world
#[derive(Debug, Clone, PartialEq)]
pub enum LightKind {
    /// Ambient sky/ground light coming from a direction
    Hemispheric {
        /// Direction towards the sky
        direction: Vec3,
    },
    /// Directional light (like sunlight) with parallel rays
    Directional {
        /// Direction the light travels
        direction: Vec3,
    },
    /// Point light that radiates in all directions from a position
    Point {
        /// World position
        position: Vec3,
        /// Maximum range
        range: f32,
    },
}

/// Light resource data
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    /// Light type and geometry
    pub kind: LightKind,
    /// RGB colour
    pub color: Color,
    /// Intensity multiplier
    pub intensity: f32,
    /// Whether the light contributes to the frame
    pub enabled: bool,
}

impl Light {
    /// Hemispheric light with a normalized direction
    pub fn hemispheric(direction: Vec3, color: Color, intensity: f32) -> Self {
        Self {
            kind: LightKind::Hemispheric { direction: direction.normalize() },
            color,
            intensity,
            enabled: true,
        }
    }

    /// Directional light with a normalized direction
    pub fn directional(direction: Vec3, color: Color, intensity: f32) -> Self {
        Self {
            kind: LightKind::Directional { direction: direction.normalize() },
            color,
            intensity,
            enabled: true,
        }
    }

    /// Point light
    pub fn point(position: Vec3, color: Color, intensity: f32, range: f32) -> Self {
        Self {
            kind: LightKind::Point { position, range },
            color,
            intensity,
            enabled: true,
        }
    }

    /// Intensity the light actually contributes this frame
    pub fn effective_intensity(&self) -> f32 {
        if self.enabled {
            self.intensity
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_directional_normalized() {
        let light = Light::directional(Vec3::new(0.0, -2.0, 0.0), Color::new(1.0, 1.0, 1.0), 1.0);
        match light.kind {
            LightKind::Directional { direction } => {
                assert_relative_eq!(direction, Vec3::new(0.0, -1.0, 0.0));
            }
            other => panic!("unexpected light kind {:?}", other),
        }
    }

    #[test]
    fn test_disabled_light_contributes_nothing() {
        let mut light = Light::point(Vec3::zeros(), Color::new(1.0, 0.6, 0.2), 0.8, 3.0);
        assert_relative_eq!(light.effective_intensity(), 0.8);
        light.enabled = false;
        assert_relative_eq!(light.effective_intensity(), 0.0);
    }
}
