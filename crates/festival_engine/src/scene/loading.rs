//! Loading indicator shown around transitions

use super::festival::FestivalId;

/// Transient indicator the host shows while a festival loads
pub trait LoadingIndicator {
    /// Show the indicator for `festival`
    fn show(&mut self, festival: FestivalId);

    /// Hide the indicator
    fn hide(&mut self);
}

/// Indicator that only logs
#[derive(Debug, Default)]
pub struct LogLoadingIndicator {
    visible: bool,
}

impl LogLoadingIndicator {
    /// Whether the indicator is currently shown
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

impl LoadingIndicator for LogLoadingIndicator {
    fn show(&mut self, festival: FestivalId) {
        self.visible = true;
        log::info!("Loading {}...", festival.display_name());
    }

    fn hide(&mut self) {
        if self.visible {
            log::debug!("Loading indicator hidden");
        }
        self.visible = false;
    }
}
