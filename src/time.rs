//! Frame timing for the scheduler.
//!
//! One source of truth for elapsed/delta time so orbital motion stays
//! frame-rate independent. A fixed-delta override makes ticks
//! deterministic for tests and benchmarks.

use std::time::{Duration, Instant};

/// Tracks per-tick timing: delta, elapsed, frame count, and a periodically
/// refreshed FPS estimate.
#[derive(Debug)]
pub struct FrameClock {
    start: Instant,
    last_tick: Instant,
    delta_secs: f64,
    frame_count: u64,
    fps: f64,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
    fixed_delta: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: now,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            fixed_delta: None,
        }
    }

    /// Advance the clock by one tick and return the delta in seconds.
    pub fn tick(&mut self) -> f64 {
        let now = Instant::now();
        let raw_delta = now.duration_since(self.last_tick).as_secs_f64();
        self.delta_secs = self.fixed_delta.unwrap_or(raw_delta);
        self.last_tick = now;
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f64 / fps_elapsed.as_secs_f64();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.delta_secs
    }

    /// Reset the last-tick instant without counting a frame. Used when the
    /// scheduler restarts so the first tick does not see the stopped gap.
    pub fn resume(&mut self) {
        self.last_tick = Instant::now();
    }

    /// Time since the last tick in seconds.
    #[inline]
    pub fn delta(&self) -> f64 {
        self.delta_secs
    }

    /// Seconds since the clock was created.
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    /// Ticks since the clock was created.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Most recent FPS estimate.
    #[inline]
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Force a fixed delta per tick (deterministic stepping), or `None` to
    /// use real frame timing.
    pub fn set_fixed_delta(&mut self, delta: Option<f64>) {
        self.fixed_delta = delta;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
