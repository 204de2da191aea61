//! End-to-end tests driving the six scenes through a scene manager


use festival_engine::prelude::*;
use festival_engine::render::Owner;

use crate::scenes::testing::Recorder;

/// Manager over a headless surface with every festival registered
///
/// Transitions are instant so consecutive loads are never dropped.
fn instant_manager(collaborators: Collaborators) -> SceneManager {
    let config = ManagerConfig {
        transition_duration: 0.0,
        ..ManagerConfig::default()
    };
    let mut manager = SceneManager::new(Box::new(HeadlessSurface::new(800, 600)), crate::registry(), config)
        .with_collaborators(collaborators);
    manager.initialize().unwrap();
    manager
}

fn recorded_manager() -> (SceneManager, Recorder) {
    let recorder = Recorder::default();
    (instant_manager(recorder.collaborators()), recorder)
}

fn owned_by(manager: &SceneManager, festival: FestivalId) -> usize {
    manager.world().count_owned_by(Owner::Scene(festival.as_str()))
}
