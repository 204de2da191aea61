//! Materials and textures

use crate::foundation::collections::ResourceId;
use crate::foundation::math::Color;

/// Standard material with diffuse and emissive terms
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Diffuse colour
    pub diffuse: Color,
    /// Emissive colour (used for glowing flames, highlights)
    pub emissive: Color,
    /// Opacity, `1.0` is opaque
    pub alpha: f32,
    /// Bound diffuse texture
    pub texture: Option<ResourceId>,
}

impl Material {
    /// Create an opaque material with the given diffuse colour
    pub fn new(diffuse: Color) -> Self {
        Self {
            diffuse,
            emissive: Color::zeros(),
            alpha: 1.0,
            texture: None,
        }
    }

    /// Set emissive colour
    pub fn with_emissive(mut self, emissive: Color) -> Self {
        self.emissive = emissive;
        self
    }

    /// Set opacity (clamped to `0.0..=1.0`)
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    /// Bind a texture
    pub fn with_texture(mut self, texture: ResourceId) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Whether the material needs alpha blending
    pub fn is_transparent(&self) -> bool {
        self.alpha < 1.0
    }
}

/// Procedural texture content
#[derive(Debug, Clone, PartialEq)]
pub enum TexturePattern {
    /// Single colour fill
    Solid(Color),
    /// Concentric rings of colours, outermost last
    Rings(Vec<Color>),
    /// Radial petal pattern (rangoli, mandala)
    Petals {
        /// Colours cycled per petal
        colors: Vec<Color>,
        /// Number of petals
        petals: u32,
    },
    /// Vertical gradient from bottom to top colour
    Gradient {
        /// Colour at the bottom edge
        bottom: Color,
        /// Colour at the top edge
        top: Color,
    },
}

/// Texture resource data
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    /// Width in texels
    pub width: u32,
    /// Height in texels
    pub height: u32,
    /// Procedural content
    pub pattern: TexturePattern,
}

impl Texture {
    /// Create a square procedural texture
    pub fn square(size: u32, pattern: TexturePattern) -> Self {
        Self { width: size, height: size, pattern }
    }

    /// Whether the texture has usable dimensions and content
    pub fn is_valid(&self) -> bool {
        let has_colors = match &self.pattern {
            TexturePattern::Rings(colors) => !colors.is_empty(),
            TexturePattern::Petals { colors, petals } => !colors.is_empty() && *petals > 0,
            TexturePattern::Solid(_) | TexturePattern::Gradient { .. } => true,
        };
        self.width > 0 && self.height > 0 && has_colors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_clamped() {
        let material = Material::new(Color::new(1.0, 0.0, 0.0)).with_alpha(2.0);
        assert!(!material.is_transparent());
        let material = material.with_alpha(0.4);
        assert!(material.is_transparent());
    }

    #[test]
    fn test_texture_validation() {
        assert!(Texture::square(64, TexturePattern::Solid(Color::zeros())).is_valid());
        assert!(!Texture::square(0, TexturePattern::Solid(Color::zeros())).is_valid());
        assert!(!Texture::square(64, TexturePattern::Petals { colors: vec![], petals: 8 }).is_valid());
    }
}
