//! Mesh resources
//!
//! A mesh is a procedural primitive shape with a transform, an optional
//! material handle, and pick layers. Festival set dressing is built entirely
//! from these primitives.

use crate::foundation::collections::ResourceId;
use crate::foundation::math::Vec3;

bitflags::bitflags! {
    /// Layer bits used to filter pick rays
    ///
    /// A mesh with no layer bits is never returned by picking.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PickLayers: u32 {
        /// Static set dressing (ground, stages, props)
        const WORLD = 0b0001;
        /// Objects with click behavior (diyas, effigies, colour piles)
        const INTERACTIVE = 0b0010;
        /// Transient effect geometry
        const EFFECTS = 0b0100;
    }
}

/// Procedural primitive shapes
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Axis aligned box
    Box {
        /// Size along X
        width: f32,
        /// Size along Y
        height: f32,
        /// Size along Z
        depth: f32,
    },
    /// Sphere
    Sphere {
        /// Diameter
        diameter: f32,
    },
    /// Cylinder, or a cone when one diameter is zero
    Cylinder {
        /// Height along Y
        height: f32,
        /// Diameter of the top cap
        diameter_top: f32,
        /// Diameter of the bottom cap
        diameter_bottom: f32,
    },
    /// Torus lying in the XZ plane
    Torus {
        /// Ring diameter
        diameter: f32,
        /// Tube thickness
        thickness: f32,
    },
    /// Flat rectangle lying in the XZ plane
    Plane {
        /// Size along X
        width: f32,
        /// Size along Z
        height: f32,
    },
    /// Flat disc lying in the XZ plane
    Disc {
        /// Radius
        radius: f32,
    },
}

impl Shape {
    /// Cube with equal sides
    pub fn cube(size: f32) -> Self {
        Self::Box { width: size, height: size, depth: size }
    }

    /// Cone with its apex at the top
    pub fn cone(height: f32, diameter: f32) -> Self {
        Self::Cylinder { height, diameter_top: 0.0, diameter_bottom: diameter }
    }

    /// Straight cylinder
    pub fn cylinder(height: f32, diameter: f32) -> Self {
        Self::Cylinder { height, diameter_top: diameter, diameter_bottom: diameter }
    }

    /// Radius of a sphere enclosing the unscaled shape
    pub fn bounding_radius(&self) -> f32 {
        match *self {
            Self::Box { width, height, depth } => {
                0.5 * (width * width + height * height + depth * depth).sqrt()
            }
            Self::Sphere { diameter } => 0.5 * diameter,
            Self::Cylinder { height, diameter_top, diameter_bottom } => {
                let r = 0.5 * diameter_top.max(diameter_bottom);
                (r * r + 0.25 * height * height).sqrt()
            }
            Self::Torus { diameter, thickness } => 0.5 * (diameter + thickness),
            Self::Plane { width, height } => 0.5 * (width * width + height * height).sqrt(),
            Self::Disc { radius } => radius,
        }
    }

    /// Whether every dimension is finite and strictly positive
    pub fn is_valid(&self) -> bool {
        let dims: &[f32] = match self {
            Self::Box { width, height, depth } => &[*width, *height, *depth],
            Self::Sphere { diameter } => &[*diameter],
            Self::Cylinder { height, diameter_top, diameter_bottom } => {
                return height.is_finite()
                    && *height > 0.0
                    && diameter_top.is_finite()
                    && diameter_bottom.is_finite()
                    && *diameter_top >= 0.0
                    && *diameter_bottom >= 0.0
                    && diameter_top.max(*diameter_bottom) > 0.0;
            }
            Self::Torus { diameter, thickness } => &[*diameter, *thickness],
            Self::Plane { width, height } => &[*width, *height],
            Self::Disc { radius } => &[*radius],
        };
        dims.iter().all(|d| d.is_finite() && *d > 0.0)
    }
}

/// Mesh resource data
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Primitive geometry
    pub shape: Shape,
    /// World position
    pub position: Vec3,
    /// Euler rotation in radians
    pub rotation: Vec3,
    /// Per-axis scale
    pub scale: Vec3,
    /// Material handle, if any
    pub material: Option<ResourceId>,
    /// Whether the mesh is drawn
    pub visible: bool,
    /// Layers this mesh can be picked on
    pub pick_layers: PickLayers,
}

impl Mesh {
    /// Create a visible, non-pickable mesh at the origin
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            material: None,
            visible: true,
            pick_layers: PickLayers::empty(),
        }
    }

    /// Set the position
    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set the rotation
    pub fn rotated(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set a per-axis scale
    pub fn scaled(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Bind a material
    pub fn with_material(mut self, material: ResourceId) -> Self {
        self.material = Some(material);
        self
    }

    /// Make the mesh pickable on the given layers
    pub fn pickable(mut self, layers: PickLayers) -> Self {
        self.pick_layers = layers;
        self
    }

    /// Set initial visibility
    pub fn with_visibility(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Radius of a sphere enclosing the scaled shape
    pub fn world_bounding_radius(&self) -> f32 {
        let max_scale = self.scale.x.abs().max(self.scale.y.abs()).max(self.scale.z.abs());
        self.shape.bounding_radius() * max_scale
    }
}
