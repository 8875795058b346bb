use std::collections::VecDeque;

/// Number of timestamps kept.
pub const FRAME_HISTORY: usize = 512;

/// Number of most recent frame intervals averaged.
pub const FRAME_WINDOW: usize = 100;

/// Measures the average interval between rendered frames.
///
/// The host feeds wall-clock timestamps in milliseconds. This is purely
/// diagnostic: nothing here feeds back into the simulation.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    stamps: VecDeque<f64>,
    interval: f64,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            stamps: VecDeque::with_capacity(FRAME_HISTORY),
            interval: 0.0,
        }
    }

    /// Records a frame at `now_ms` and refreshes the average interval.
    pub fn record(&mut self, now_ms: f64) {
        if self.stamps.len() == FRAME_HISTORY {
            self.stamps.pop_front();
        }
        self.stamps.push_back(now_ms);

        let n = self.stamps.len();
        let k = (n - 1).min(FRAME_WINDOW);
        self.interval = if k == 0 {
            0.0
        } else {
            (now_ms - self.stamps[n - 1 - k]) / k as f64
        };
    }

    /// Average frame interval in milliseconds, `0` until two frames exist.
    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Frames per second derived from [`FrameTimer::interval`].
    pub fn framerate(&self) -> f64 {
        if self.interval > 0.0 {
            1000.0 / self.interval
        } else {
            0.0
        }
    }

    pub fn samples(&self) -> usize {
        self.stamps.len()
    }

    pub fn reset(&mut self) {
        self.stamps.clear();
        self.interval = 0.0;
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}
