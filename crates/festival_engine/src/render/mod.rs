//! Retained-mode render world
//!
//! Owns every render resource (meshes, materials, textures, lights, particle
//! systems) behind generational handles, plus the orbit camera, ray picking
//! and the render surface/loop abstraction.
//!
//! ## Architecture
//!
//! ```text
//! SceneManager
//!      ↓
//! RenderEngine (surface + render loop)
//!      ↓
//! RenderWorld (resources by ResourceId)
//! ```
//!
//! No GPU backend lives here: `RenderWorld::render()` produces per-frame
//! statistics which the bound [`RenderSurface`] presents.

mod camera;
mod error;
mod lighting;
mod material;
mod mesh;
mod particles;
mod picking;
mod surface;
mod world;

pub use camera::{ArcRotateCamera, CameraLimits};
pub use error::RenderError;
pub use lighting::{Light, LightKind};
pub use material::{Material, Texture, TexturePattern};
pub use mesh::{Mesh, PickLayers, Shape};
pub use particles::{Particle, ParticleSystem};
pub use picking::{BoundingSphere, PickHit, Ray};
pub use surface::{HeadlessSurface, RenderEngine, RenderSurface};
pub use world::{FrameStats, Owner, RenderWorld, Resource, ResourceKind, ResourceNode};
