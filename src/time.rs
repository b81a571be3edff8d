//! Animation clock.
//!
//! The scene reads the clock once per tick and hands the resulting elapsed
//! time to the phase machine and both animators, so every consumer in a tick
//! sees the same instant.
//!
//! # Example
//!
//! ```ignore
//! use treebloom::time::Clock;
//!
//! let mut clock = Clock::new();
//!
//! // In the render loop:
//! let (elapsed, delta) = clock.update();
//! ```
//!
//! For headless runs and tests, set a fixed delta: elapsed time then advances
//! by exactly that step per update, independent of the wall clock.

use std::time::{Duration, Instant};

/// Elapsed/delta time tracking.
#[derive(Debug)]
pub struct Clock {
    /// When the last wall-clock update occurred.
    last_frame: Instant,
    /// Total elapsed animation time. Summed at nanosecond precision so long
    /// sessions do not drift.
    elapsed: Duration,
    /// Time advanced by the last update, in seconds.
    delta_secs: f32,
    /// Total updates since start.
    frame_count: u64,
    /// Whether time is paused.
    paused: bool,
    /// Fixed step per update (optional).
    fixed_delta: Option<f32>,
    /// Time scale multiplier (1.0 = normal speed).
    time_scale: f32,
}

impl Clock {
    /// Create a clock starting at zero.
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            elapsed: Duration::ZERO,
            delta_secs: 0.0,
            frame_count: 0,
            paused: false,
            fixed_delta: None,
            time_scale: 1.0,
        }
    }

    /// Clock that advances by `delta` seconds per update.
    pub fn fixed(delta: f32) -> Self {
        let mut clock = Self::new();
        clock.set_fixed_delta(Some(delta));
        clock
    }

    /// Advance the clock. Call once per tick.
    ///
    /// Returns `(elapsed, delta)`.
    pub fn update(&mut self) -> (f32, f32) {
        let now = Instant::now();
        let raw_delta = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        let step = self.fixed_delta.unwrap_or(raw_delta);
        self.step(step)
    }

    /// Advance the clock by `dt` seconds regardless of the wall clock.
    ///
    /// Pause and time scale still apply.
    pub fn advance(&mut self, dt: f32) -> (f32, f32) {
        self.last_frame = Instant::now();
        self.step(dt)
    }

    fn step(&mut self, dt: f32) -> (f32, f32) {
        if self.paused {
            self.delta_secs = 0.0;
            return (self.elapsed(), self.delta_secs);
        }

        let scaled = dt.max(0.0) as f64 * self.time_scale as f64;
        let step = Duration::try_from_secs_f64(scaled).unwrap_or(Duration::ZERO);
        self.elapsed += step;
        self.delta_secs = step.as_secs_f32();
        self.frame_count += 1;

        (self.elapsed(), self.delta_secs)
    }

    /// Total elapsed animation time in seconds.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Time advanced by the last update.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Total updates since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Stop time. While paused, `delta()` is 0 and `elapsed()` holds.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume after [`Clock::pause`]. The paused span is not counted.
    pub fn resume(&mut self) {
        if self.paused {
            self.last_frame = Instant::now();
            self.paused = false;
        }
    }

    /// Set a fixed step per update. `None` follows the wall clock.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }

    /// Set time scale multiplier (clamped to non-negative).
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    /// Elapsed time as a Duration.
    #[inline]
    pub fn elapsed_duration(&self) -> Duration {
        self.elapsed
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
