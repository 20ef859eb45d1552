//! Error type for caller contract violations
//!
//! Routine game outcomes (placing onto an occupied cell, removing from an empty
//! one, an unaffordable purchase) are reported through `bool`/`Option` returns.
//! `SimError` is reserved for driver bugs: bad coordinates and invalid inputs.

use super::coord::GridCoord;
use std::fmt;

/// Errors raised by the simulation core
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Coordinate outside `[0, rows) × [0, cols)`
    OutOfBounds {
        coord: GridCoord,
        rows: usize,
        cols: usize,
    },
    /// Input or state that violates the simulation contract
    /// (negative time step, NaN field values, invalid configuration)
    InvalidState(String),
}

impl SimError {
    /// Convenience constructor for [`SimError::InvalidState`]
    pub fn invalid_state(message: impl Into<String>) -> Self {
        SimError::InvalidState(message.into())
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::OutOfBounds { coord, rows, cols } => {
                write!(f, "Coordinate {coord} out of bounds for {rows}x{cols} grid")
            }
            SimError::InvalidState(msg) => write!(f, "Invalid state: {msg}"),
        }
    }
}

impl std::error::Error for SimError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = SimError::OutOfBounds {
            coord: GridCoord::new(3, 7),
            rows: 2,
            cols: 2,
        };
        assert_eq!(err.to_string(), "Coordinate (3, 7) out of bounds for 2x2 grid");

        let err = SimError::invalid_state("dt must be >= 0");
        assert_eq!(err.to_string(), "Invalid state: dt must be >= 0");
    }
}
