//! Render layer errors

use crate::foundation::collections::ResourceId;
use thiserror::Error;

/// Errors raised by the render world, surface, and engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Surface reported a zero or otherwise unusable size
    #[error("Invalid surface size {width}x{height}")]
    InvalidSurfaceSize {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },

    /// Surface is no longer available for presentation
    #[error("Render surface lost")]
    SurfaceLost,

    /// Handle does not refer to a live resource
    #[error("Unknown resource {0:?}")]
    UnknownResource(ResourceId),

    /// Handle refers to a resource of another kind
    #[error("Resource {id:?} is a {actual}, expected a {expected}")]
    WrongKind {
        /// The offending handle
        id: ResourceId,
        /// Kind the caller asked for
        expected: &'static str,
        /// Kind actually stored
        actual: &'static str,
    },

    /// Parameters rejected at construction time
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Engine was disposed
    #[error("Render engine disposed")]
    Disposed,
}
