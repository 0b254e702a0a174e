//! Fixed-timestep loop implementing the "Fix Your Timestep" pattern.
//!
//! Frame times are supplied by the caller, so a headless run can feed
//! synthetic frames and stay fully deterministic.

use tracing::warn;

/// Maximum frame time clamp to prevent spiral of death.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Slack for float drift when the accumulator holds a whole number of steps.
const ACCUMULATOR_EPSILON: f64 = 1e-9;

/// Accumulator-driven fixed-rate update scheduler.
pub struct GameLoop {
    fixed_dt: f64,
    accumulator: f64,
    total_sim_time: f64,
    update_count: u64,
}

impl GameLoop {
    /// Creates a loop updating `tick_rate` times per simulated second.
    pub fn new(tick_rate: u32) -> Self {
        Self {
            fixed_dt: 1.0 / f64::from(tick_rate.max(1)),
            accumulator: 0.0,
            total_sim_time: 0.0,
            update_count: 0,
        }
    }

    /// Seconds per update.
    pub fn fixed_dt(&self) -> f64 {
        self.fixed_dt
    }

    /// Consumes `frame_time` seconds, calling `update_fn(fixed_dt,
    /// total_sim_time)` once per whole step. Returns the number of steps run.
    pub fn advance(&mut self, frame_time: f64, mut update_fn: impl FnMut(f64, f64)) -> u32 {
        let mut frame_time = frame_time.max(0.0);
        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }

        self.accumulator += frame_time;
        let mut steps = 0;
        while self.accumulator + ACCUMULATOR_EPSILON >= self.fixed_dt {
            update_fn(self.fixed_dt, self.total_sim_time);
            self.total_sim_time += self.fixed_dt;
            self.accumulator = (self.accumulator - self.fixed_dt).max(0.0);
            self.update_count += 1;
            steps += 1;
        }
        steps
    }

    /// Returns the total number of fixed updates executed.
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Returns the total simulation time in seconds.
    pub fn total_sim_time(&self) -> f64 {
        self.total_sim_time
    }
}
