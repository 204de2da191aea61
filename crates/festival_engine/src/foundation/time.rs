//! Time management utilities

/// Frame clock fed with host-supplied deltas
///
/// The host (browser animation frame, native loop, or test) owns real time;
/// the clock only accumulates what it is told so simulation stays
/// deterministic.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl FrameClock {
    /// Create a new clock at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one frame of `delta_time` seconds
    ///
    /// Negative deltas are treated as zero.
    pub fn tick(&mut self, delta_time: f32) {
        self.delta_time = delta_time.max(0.0);
        self.total_time += self.delta_time;
        self.frame_count += 1;
    }

    /// Get the time of the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average FPS since clock creation
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_clock_accumulates() {
        let mut clock = FrameClock::new();
        clock.tick(0.5);
        clock.tick(0.25);
        assert_eq!(clock.frame_count(), 2);
        assert_relative_eq!(clock.total_time(), 0.75);
        assert_relative_eq!(clock.delta_time(), 0.25);
    }

    #[test]
    fn test_negative_delta_clamped() {
        let mut clock = FrameClock::new();
        clock.tick(-1.0);
        assert_relative_eq!(clock.total_time(), 0.0);
        assert_relative_eq!(clock.average_fps(), 0.0);
    }
}
