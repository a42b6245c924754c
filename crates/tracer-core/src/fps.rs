//! Frame-rate readout for the window title.

use std::time::{Duration, Instant};

/// Counts frames and reports a rate once per interval.
#[derive(Debug, Clone)]
pub struct FrameRateCounter {
    interval: Duration,
    window_start: Instant,
    frames: u32,
}

impl FrameRateCounter {
    pub fn new(interval_secs: f64) -> Self {
        Self::starting_at(interval_secs, Instant::now())
    }

    pub fn starting_at(interval_secs: f64, start: Instant) -> Self {
        Self {
            interval: Duration::from_secs_f64(interval_secs),
            window_start: start,
            frames: 0,
        }
    }

    /// Count a frame. Returns the frames-per-second figure when a full
    /// interval has elapsed, then starts a new interval.
    pub fn tick(&mut self) -> Option<f64> {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> Option<f64> {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.interval {
            return None;
        }
        let fps = f64::from(self.frames) / elapsed.as_secs_f64();
        self.window_start = now;
        self.frames = 0;
        Some(fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_within_interval() {
        let start = Instant::now();
        let mut counter = FrameRateCounter::starting_at(1.0, start);
        for ms in [16, 32, 500, 999] {
            assert_eq!(counter.tick_at(start + Duration::from_millis(ms)), None);
        }
    }

    #[test]
    fn reports_frames_over_elapsed_then_resets() {
        let start = Instant::now();
        let mut counter = FrameRateCounter::starting_at(1.0, start);
        for i in 1..60 {
            assert!(counter.tick_at(start + Duration::from_millis(i * 10)).is_none());
        }
        let fps = counter.tick_at(start + Duration::from_secs(2)).unwrap();
        assert!((fps - 30.0).abs() < 1e-9);

        // New interval starts at the report time.
        let next = start + Duration::from_secs(2);
        assert!(counter.tick_at(next + Duration::from_millis(500)).is_none());
        let fps = counter.tick_at(next + Duration::from_secs(1)).unwrap();
        assert!((fps - 2.0).abs() < 1e-9);
    }
}
