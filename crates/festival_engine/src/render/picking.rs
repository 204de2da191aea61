//! Ray picking primitives

use crate::foundation::collections::ResourceId;
use crate::foundation::math::Vec3;

/// Half-line used for pick tests
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Start point in world space
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
}

impl Ray {
    /// Ray from `origin` along `direction` (normalised here)
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Ray from `origin` through `point`
    pub fn through(origin: Vec3, point: Vec3) -> Self {
        Self::new(origin, point - origin)
    }
}

/// Sphere enclosing a mesh, used as its pick volume
#[derive(Debug, Clone, Copy)]
pub struct BoundingSphere {
    /// World-space centre
    pub center: Vec3,
    /// Radius
    pub radius: f32,
}

impl BoundingSphere {
    /// Sphere at `center`
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Distance along `ray` to the first hit in front of its origin
    ///
    /// An origin inside the sphere hits at distance zero.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        // The direction is unit length, so the quadratic reduces to
        // t^2 + 2bt + c = 0.
        let to_origin = ray.origin - self.center;
        let half_b = to_origin.dot(&ray.direction);
        let c = to_origin.norm_squared() - self.radius * self.radius;
        if c <= 0.0 {
            return Some(0.0);
        }
        let discriminant = half_b * half_b - c;
        if discriminant < 0.0 {
            return None;
        }
        let near = -half_b - discriminant.sqrt();
        (near > 0.0).then_some(near)
    }
}

/// Nearest pick result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    /// Picked mesh
    pub id: ResourceId,
    /// Distance from the ray origin
    pub distance: f32,
}
