//! Math utilities and types
//!
//! Provides the small set of vector types the scene world needs plus a
//! [`Lerp`] trait used by tweens.

pub use nalgebra::Vector3;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Linear RGB colour, each channel in `0.0..=1.0`
pub type Color = Vector3<f32>;

/// Build a colour from 8-bit channels
pub fn rgb8(r: u8, g: u8, b: u8) -> Color {
    Color::new(f32::from(r) / 255.0, f32::from(g) / 255.0, f32::from(b) / 255.0)
}

/// Values that can be linearly interpolated
pub trait Lerp: Clone {
    /// Interpolate between `self` and `to`; `t` is expected in `0.0..=1.0`
    fn lerp_to(&self, to: &Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp_to(&self, to: &Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for Vec3 {
    fn lerp_to(&self, to: &Self, t: f32) -> Self {
        self.lerp(to, t)
    }
}

/// Math utility functions
pub mod utils {
    use super::Vec3;

    /// Point on a horizontal circle of `radius` around `center`
    ///
    /// Used by layouts that place objects in rings (diyas, dancers, lamps).
    pub fn ring_point(center: Vec3, radius: f32, index: usize, count: usize) -> Vec3 {
        let angle = if count == 0 {
            0.0
        } else {
            std::f32::consts::TAU * index as f32 / count as f32
        };
        center + Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lerp_f32() {
        assert_relative_eq!(0.0_f32.lerp_to(&10.0, 0.25), 2.5);
    }

    #[test]
    fn test_lerp_vec3_endpoints() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(2.0, 4.0, -6.0);
        assert_relative_eq!(a.lerp_to(&b, 0.0), a);
        assert_relative_eq!(a.lerp_to(&b, 1.0), b);
        assert_relative_eq!(a.lerp_to(&b, 0.5), Vec3::new(1.0, 2.0, -3.0));
    }

    #[test]
    fn test_rgb8() {
        let c = rgb8(255, 0, 51);
        assert_relative_eq!(c, Color::new(1.0, 0.0, 0.2));
    }

    #[test]
    fn test_ring_point_quarter_turn() {
        let p = utils::ring_point(Vec3::zeros(), 2.0, 1, 4);
        assert_relative_eq!(p, Vec3::new(0.0, 0.0, 2.0), epsilon = 1e-5);
    }
}
