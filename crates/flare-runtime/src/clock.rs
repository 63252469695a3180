//! Simulated frame clock with a fixed-step accumulator

/// Rate of `RuntimeSystem::fixed_update`
pub const FIXED_HZ: f64 = 60.0;

/// Frames longer than this are clamped so one stall cannot queue up
/// hundreds of fixed steps.
const MAX_FRAME_SECONDS: f64 = 0.25;

/// Time is pushed in by the caller, one frame at a time.
#[derive(Debug, Clone)]
pub struct GameClock {
    elapsed: f64,
    frame: f64,
    step: f64,
    pending: f64,
}

impl Default for GameClock {
    fn default() -> Self {
        Self::with_rate(FIXED_HZ)
    }
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rate(hz: f64) -> Self {
        Self {
            elapsed: 0.0,
            frame: 0.0,
            step: 1.0 / hz,
            pending: 0.0,
        }
    }

    /// Start a frame that lasted `dt` seconds
    pub fn advance(&mut self, dt: f64) {
        self.frame = dt.clamp(0.0, MAX_FRAME_SECONDS);
        self.elapsed += self.frame;
        self.pending += self.frame;
    }

    /// Consume one fixed step if enough time has built up.
    ///
    /// Call in a `while` loop after [`advance`](Self::advance).
    pub fn take_fixed_step(&mut self) -> bool {
        if self.pending >= self.step {
            self.pending -= self.step;
            true
        } else {
            false
        }
    }

    /// Seconds since the clock was created
    pub fn total_time(&self) -> f64 {
        self.elapsed
    }

    /// Length of the current frame after clamping
    pub fn delta_time(&self) -> f64 {
        self.frame
    }

    pub fn fixed_timestep(&self) -> f64 {
        self.step
    }
}
