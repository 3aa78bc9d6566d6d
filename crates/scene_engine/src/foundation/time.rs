//! Time management utilities

/// Frame clock fed with host timestamps
///
/// The host supplies a monotonically increasing time in seconds each frame;
/// the clock turns consecutive timestamps into per-frame deltas. The first
/// tick after creation (or a reset) only seeds the reference time and
/// reports a delta of zero, so a scene never sees one huge catch-up step.
pub struct FrameClock {
    previous_time: Option<f64>,
    delta_time: f32,
    total_time: f64,
    frame_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a clock that has not seen a timestamp yet
    pub fn new() -> Self {
        Self {
            previous_time: None,
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Advance to `current_time` and return the frame delta in seconds
    pub fn advance(&mut self, current_time: f64) -> f32 {
        let delta = match self.previous_time {
            // Host clocks can jump backwards across suspensions; clamp
            // instead of handing systems a negative delta.
            Some(previous) => (current_time - previous).max(0.0) as f32,
            None => 0.0,
        };

        self.previous_time = Some(current_time);
        self.delta_time = delta;
        self.total_time += f64::from(delta);
        self.frame_count += 1;
        delta
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time across all frames
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Forget the reference time; the next tick seeds again with delta zero
    pub fn reset(&mut self) {
        self.previous_time = None;
        self.delta_time = 0.0;
    }
}
