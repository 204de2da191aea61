//! Optional external collaborators
//!
//! Scenes report interactions to the host application through three small
//! sinks. Each sink is optional; a missing sink turns the call into a no-op,
//! so scenes never depend on the host providing them.

use std::fmt;
use std::rc::Rc;

use super::festival::FestivalId;

/// Fire-and-forget interaction telemetry (guide / assistant)
pub trait InteractionTelemetry {
    /// Total number of lamps lit in the current scene
    fn notify_diya_lit(&self, count: usize);

    /// Free-form description of something the visitor did
    fn add_user_interaction(&self, description: &str);
}

/// Cultural information panel host
pub trait CulturalInfo {
    /// Surface the panel for `topic` of `festival`
    fn show_cultural_info(&self, festival: FestivalId, topic: &str);
}

/// Value attached to a progress event
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressValue {
    /// Something happened (or completed)
    Flag(bool),
    /// Running count
    Count(u32),
    /// Named choice (e.g. the colour used)
    Text(String),
}

/// Completion / achievement recorder
pub trait ProgressRecorder {
    /// Record `key` for `festival` with `value`
    fn record_interaction(&self, festival: FestivalId, key: &str, value: ProgressValue);
}

/// Collaborator set injected into every scene constructor
#[derive(Clone, Default)]
pub struct Collaborators {
    telemetry: Option<Rc<dyn InteractionTelemetry>>,
    cultural_info: Option<Rc<dyn CulturalInfo>>,
    progress: Option<Rc<dyn ProgressRecorder>>,
}

impl Collaborators {
    /// No collaborators; every call is a no-op
    pub fn none() -> Self {
        Self::default()
    }

    /// Attach a telemetry sink
    pub fn with_telemetry(mut self, telemetry: Rc<dyn InteractionTelemetry>) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Attach a cultural information host
    pub fn with_cultural_info(mut self, info: Rc<dyn CulturalInfo>) -> Self {
        self.cultural_info = Some(info);
        self
    }

    /// Attach a progress recorder
    pub fn with_progress(mut self, progress: Rc<dyn ProgressRecorder>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Forward a lamp count to telemetry if present
    pub fn notify_diya_lit(&self, count: usize) {
        match &self.telemetry {
            Some(telemetry) => telemetry.notify_diya_lit(count),
            None => log::debug!("No telemetry sink; diya count {} not reported", count),
        }
    }

    /// Forward an interaction description to telemetry if present
    pub fn add_user_interaction(&self, description: &str) {
        match &self.telemetry {
            Some(telemetry) => telemetry.add_user_interaction(description),
            None => log::debug!("No telemetry sink; interaction '{}' not reported", description),
        }
    }

    /// Ask the host to show an information panel if present
    pub fn show_cultural_info(&self, festival: FestivalId, topic: &str) {
        match &self.cultural_info {
            Some(info) => info.show_cultural_info(festival, topic),
            None => log::debug!("No info panel host; {}/{} not shown", festival, topic),
        }
    }

    /// Record a progress event if a recorder is present
    pub fn record_interaction(&self, festival: FestivalId, key: &str, value: ProgressValue) {
        match &self.progress {
            Some(progress) => progress.record_interaction(festival, key, value),
            None => log::debug!("No progress recorder; {}/{} not recorded", festival, key),
        }
    }
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators")
            .field("telemetry", &self.telemetry.is_some())
            .field("cultural_info", &self.cultural_info.is_some())
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        events: RefCell<Vec<String>>,
    }

    impl InteractionTelemetry for Recorder {
        fn notify_diya_lit(&self, count: usize) {
            self.events.borrow_mut().push(format!("diya:{}", count));
        }

        fn add_user_interaction(&self, description: &str) {
            self.events.borrow_mut().push(description.to_string());
        }
    }

    impl ProgressRecorder for Recorder {
        fn record_interaction(&self, festival: FestivalId, key: &str, value: ProgressValue) {
            self.events.borrow_mut().push(format!("{}/{}={:?}", festival, key, value));
        }
    }

    #[test]
    fn test_missing_collaborators_are_noops() {
        let collaborators = Collaborators::none();
        collaborators.notify_diya_lit(3);
        collaborators.add_user_interaction("lit a diya");
        collaborators.show_cultural_info(FestivalId::Diwali, "diyas");
        collaborators.record_interaction(FestivalId::Diwali, "diyas_lit", ProgressValue::Count(3));
    }

    #[test]
    fn test_present_collaborators_receive_calls() {
        let recorder = Rc::new(Recorder::default());
        let collaborators = Collaborators::none()
            .with_telemetry(recorder.clone())
            .with_progress(recorder.clone());

        collaborators.notify_diya_lit(2);
        collaborators.record_interaction(FestivalId::Holi, "people_colored", ProgressValue::Count(1));

        assert_eq!(
            *recorder.events.borrow(),
            vec!["diya:2".to_string(), "holi/people_colored=Count(1)".to_string()]
        );
    }
}
