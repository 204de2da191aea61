//! Scene and scene manager errors

use thiserror::Error;

use crate::render::RenderError;

use super::festival::FestivalId;

/// Errors raised while building or driving a festival scene
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// A render resource could not be allocated
    #[error("Render resource error: {0}")]
    Render(#[from] RenderError),

    /// Hard-coded layout data is inconsistent
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    /// Operation on a scene that was already disposed
    #[error("Scene already disposed")]
    Disposed,
}

/// Errors raised by the scene manager
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ManagerError {
    /// `initialize()` has not been called
    #[error("Scene manager not initialized")]
    NotInitialized,

    /// Setup failed; the manager is unusable and will not retry
    #[error("Scene manager setup failed: {0}")]
    SetupFailed(#[source] RenderError),

    /// A festival scene failed to build and was rolled back
    #[error("Failed to create {festival} scene: {source}")]
    SceneCreation {
        /// Festival that failed
        festival: FestivalId,
        /// Underlying scene error
        #[source]
        source: SceneError,
    },

    /// Render engine error while driving frames
    #[error("Render error: {0}")]
    Render(#[source] RenderError),

    /// Manager was disposed
    #[error("Scene manager disposed")]
    Disposed,
}
