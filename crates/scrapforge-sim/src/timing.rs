//! Fixed-timestep simulation clock.
//!
//! Each tick's timestamp is derived from the tick count rather than summed,
//! so long runs do not drift.

use scrapforge_common::Timestamp;

/// Default server tick rate.
pub const DEFAULT_TICK_RATE: u32 = 66;

/// Fixed-timestep clock.
#[derive(Debug, Clone)]
pub struct TickClock {
    /// Ticks per second
    tick_rate: u32,
    /// Time of tick zero, in seconds
    start: f64,
    /// Ticks advanced so far
    tick: u64,
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_RATE, 1.0)
    }
}

impl TickClock {
    /// Create a clock.
    ///
    /// # Arguments
    /// * `tick_rate` - Ticks per second (minimum 1)
    /// * `start` - Time of the first tick, in seconds
    #[must_use]
    pub fn new(tick_rate: u32, start: f32) -> Self {
        Self {
            tick_rate: tick_rate.max(1),
            start: f64::from(start),
            tick: 0,
        }
    }

    /// Seconds per tick.
    #[must_use]
    pub fn interval(&self) -> f32 {
        (1.0 / f64::from(self.tick_rate)) as f32
    }

    /// Time of the current tick.
    #[must_use]
    pub fn now(&self) -> Timestamp {
        let secs = self.start + self.tick as f64 / f64::from(self.tick_rate);
        Timestamp::from_secs(secs as f32)
    }

    /// Number of ticks advanced.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Move to the next tick and return its time.
    pub fn advance(&mut self) -> Timestamp {
        self.tick += 1;
        self.now()
    }
}
