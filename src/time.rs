//! Frame timing for the window title and logs.
//!
//! Particle motion is per frame, not per second, so nothing in the
//! simulation reads these values. They only report how fast frames arrive.

use std::time::{Duration, Instant};

/// Counts frames and derives a smoothed frames-per-second figure.
#[derive(Debug)]
pub struct FrameClock {
    /// When the last frame occurred.
    last_frame: Instant,
    /// Time since last frame in seconds.
    delta_secs: f32,
    /// Total frames since start.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Time of last FPS calculation.
    fps_update_time: Instant,
    /// How often to update the FPS figure.
    fps_update_interval: Duration,
}

impl FrameClock {
    /// Create a clock starting from now.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Create a clock whose first frame interval starts at `now`.
    pub fn starting_at(now: Instant) -> Self {
        Self {
            last_frame: now,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
        }
    }

    /// Record a frame. Returns `true` when the FPS figure was refreshed.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    /// Record a frame that happened at `now`.
    pub fn tick_at(&mut self, now: Instant) -> bool {
        self.delta_secs = now.saturating_duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frame_count += 1;

        let fps_elapsed = now.saturating_duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
            return true;
        }
        false
    }

    /// Time since the previous frame in seconds.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Total frames recorded.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Most recent frames-per-second figure.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_new() {
        let clock = FrameClock::new();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.fps(), 0.0);
    }

    #[test]
    fn test_fps_refreshes_every_half_second() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        let frame = Duration::from_millis(10);

        let mut refreshed = false;
        for i in 1..=50 {
            refreshed = clock.tick_at(start + frame * i);
        }

        assert!(refreshed);
        assert_eq!(clock.frame(), 50);
        assert!((clock.fps() - 100.0).abs() < 0.5);
        assert!((clock.delta() - 0.01).abs() < 1e-4);
    }

    #[test]
    fn test_no_refresh_before_interval() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        assert!(!clock.tick_at(start + Duration::from_millis(100)));
        assert_eq!(clock.fps(), 0.0);
    }
}
