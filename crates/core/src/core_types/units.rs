//! Semantic unit types for simulation time
//!
//! Timestamps and durations are kept in `f64` seconds. The simulation clock
//! itself counts whole microseconds (see [`Seconds::from_micros`]) so that
//! summing many small steps never drifts off the exact timeout boundary.
//! Per-cell thermal quantities stay `f32` (see [`crate::solver::FieldData`]).
//!
//! # Usage
//! ```
//! use reactor_sim_core::core_types::units::Seconds;
//!
//! let placed = Seconds::new(2.0);
//! let now = Seconds::new(17.0);
//! assert_eq!(now - placed, Seconds::new(15.0));
//! assert!(*Seconds::ZERO == 0.0);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Deref, Sub};

/// Simulation time in seconds (timestamp or duration)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Seconds(f64);

impl Eq for Seconds {}

impl PartialOrd for Seconds {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Seconds {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Deref for Seconds {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Seconds {
    /// Start of the simulation clock
    pub const ZERO: Seconds = Seconds(0.0);

    /// Resolution of the simulation clock
    pub const MICROS_PER_SECOND: f64 = 1_000_000.0;

    /// Create a new time value
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Seconds(value)
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Time from a whole number of microseconds
    #[inline]
    #[must_use]
    pub fn from_micros(micros: u64) -> Self {
        Seconds(micros as f64 / Self::MICROS_PER_SECOND)
    }

    /// Nearest whole number of microseconds; negative and NaN values map to 0
    #[inline]
    #[must_use]
    pub fn as_micros(self) -> u64 {
        (self.0 * Self::MICROS_PER_SECOND).round() as u64
    }

    /// Convert to f32 for per-cell field arithmetic
    #[inline]
    #[must_use]
    pub fn as_f32(self) -> f32 {
        self.0 as f32
    }
}

impl Add for Seconds {
    type Output = Seconds;
    fn add(self, rhs: Seconds) -> Seconds {
        Seconds(self.0 + rhs.0)
    }
}

impl AddAssign for Seconds {
    fn add_assign(&mut self, rhs: Seconds) {
        self.0 += rhs.0;
    }
}

impl Sub for Seconds {
    type Output = Seconds;
    fn sub(self, rhs: Seconds) -> Seconds {
        Seconds(self.0 - rhs.0)
    }
}

impl From<f64> for Seconds {
    fn from(v: f64) -> Self {
        Seconds(v)
    }
}

impl From<u32> for Seconds {
    fn from(v: u32) -> Self {
        Seconds(f64::from(v))
    }
}

impl From<Seconds> for f64 {
    fn from(s: Seconds) -> f64 {
        s.0
    }
}

impl fmt::Display for Seconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}s", self.0)
    }
}
