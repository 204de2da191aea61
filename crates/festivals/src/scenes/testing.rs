//! Test doubles shared by the scene tests

use std::cell::RefCell;
use std::rc::Rc;

use festival_engine::prelude::*;
use festival_engine::render::CameraLimits;
use festival_engine::scene::{CulturalInfo, InteractionTelemetry, ProgressRecorder, ProgressValue};

/// A world and camera to build scenes into
pub struct Stage {
    pub world: RenderWorld,
    pub camera: ArcRotateCamera,
}

impl Stage {
    pub fn new() -> Self {
        Self {
            world: RenderWorld::new(7),
            camera: ArcRotateCamera::new(0.0, 1.0, 20.0, Vec3::zeros(), CameraLimits::default()),
        }
    }

    pub fn ctx(&mut self) -> SceneContext<'_> {
        SceneContext::new(&mut self.world, &self.camera)
    }
}

#[derive(Default)]
struct Log {
    diya_counts: Vec<usize>,
    interactions: Vec<String>,
    info: Vec<String>,
    progress: Vec<(String, ProgressValue)>,
}

/// Records every collaborator call
#[derive(Clone, Default)]
pub struct Recorder {
    log: Rc<RefCell<Log>>,
}

impl Recorder {
    pub fn collaborators(&self) -> Collaborators {
        Collaborators::none()
            .with_telemetry(Rc::new(self.clone()))
            .with_cultural_info(Rc::new(self.clone()))
            .with_progress(Rc::new(self.clone()))
    }

    pub fn diya_counts(&self) -> Vec<usize> {
        self.log.borrow().diya_counts.clone()
    }

    pub fn interactions(&self) -> Vec<String> {
        self.log.borrow().interactions.clone()
    }

    /// Topics shown, as `festival:topic`
    pub fn info_topics(&self) -> Vec<String> {
        self.log.borrow().info.clone()
    }

    /// Last value recorded for `festival/key`
    pub fn progress(&self, key: &str) -> Option<ProgressValue> {
        self.log
            .borrow()
            .progress
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value.clone())
    }
}

impl InteractionTelemetry for Recorder {
    fn notify_diya_lit(&self, count: usize) {
        self.log.borrow_mut().diya_counts.push(count);
    }

    fn add_user_interaction(&self, description: &str) {
        self.log.borrow_mut().interactions.push(description.to_string());
    }
}

impl CulturalInfo for Recorder {
    fn show_cultural_info(&self, festival: FestivalId, topic: &str) {
        self.log.borrow_mut().info.push(format!("{}:{}", festival, topic));
    }
}

impl ProgressRecorder for Recorder {
    fn record_interaction(&self, festival: FestivalId, key: &str, value: ProgressValue) {
        self.log.borrow_mut().progress.push((format!("{}/{}", festival, key), value));
    }
}
