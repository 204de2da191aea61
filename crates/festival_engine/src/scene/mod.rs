//! Festival scene lifecycle
//!
//! Every festival scene follows the same contract: build everything in
//! `create()`, react to pick triggers while live, free everything in
//! `dispose()`. The [`SceneManager`] owns the shared environment and switches
//! between scenes so that at most one festival scene is live at a time.
//!
//! ## Architecture
//!
//! ```text
//! SceneManager ── FestivalSession ── Box<dyn FestivalScene>
//!      │                                   │
//!      ├─ RenderEngine (surface, loop)     ├─ SceneResources (tracked ids)
//!      ├─ RenderWorld (all resources) ◄────┘
//!      └─ ArcRotateCamera + CameraTween
//! ```

mod collaborators;
mod default_scene;
mod error;
mod festival;
mod lifecycle;
mod loading;
mod manager;
mod registry;
mod resources;

pub use collaborators::{Collaborators, CulturalInfo, InteractionTelemetry, ProgressRecorder, ProgressValue};
pub use default_scene::DefaultScene;
pub use error::{ManagerError, SceneError};
pub use festival::{FestivalId, UnknownFestival};
pub use lifecycle::{FestivalScene, SceneContext};
pub use loading::{LoadingIndicator, LogLoadingIndicator};
pub use manager::{FestivalSession, ManagerState, SceneManager, TransitionOutcome};
pub use registry::{SceneConstructor, SceneRegistry};
pub use resources::SceneResources;
