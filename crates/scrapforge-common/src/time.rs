//! Simulation timestamps.
//!
//! Game time is seconds since the simulation started, as reported by the
//! engine clock each tick. A zero timestamp doubles as "unset" for fields such
//! as a charge start time, so simulations should start their clock above zero.

use serde::{Deserialize, Serialize};

/// Point in simulation time, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(f32);

impl Timestamp {
    /// The zero timestamp, also used as "unset".
    pub const ZERO: Self = Self(0.0);

    /// Creates a timestamp from seconds.
    #[must_use]
    pub const fn from_secs(secs: f32) -> Self {
        Self(secs)
    }

    /// Returns the timestamp in seconds.
    #[must_use]
    pub const fn secs(self) -> f32 {
        self.0
    }

    /// Checks if the timestamp is set (strictly positive).
    #[must_use]
    pub fn is_set(self) -> bool {
        self.0 > 0.0
    }

    /// Seconds elapsed from `earlier` to `self`. Negative if `earlier` is later.
    #[must_use]
    pub fn since(self, earlier: Self) -> f32 {
        self.0 - earlier.0
    }

    /// Timestamp `secs` seconds after this one.
    #[must_use]
    pub fn after(self, secs: f32) -> Self {
        Self(self.0 + secs)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}s", self.0)
    }
}
