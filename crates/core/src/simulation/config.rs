//! Simulation configuration
//!
//! Loaded by the host (serde) or built in code; every section falls back to its
//! default when omitted.

use crate::core_types::SimError;
use crate::grid::GridLayout;
use crate::solver::DiffusionParams;
use serde::{Deserialize, Serialize};

/// Largest grid accepted by [`SimulationConfig::validate`] (2048 x 2048 cells).
/// Fits in `u32` so FFI hosts see exact dimensions.
pub const MAX_CELLS: usize = 1 << 22;

/// Construction parameters for [`ReactorSimulation`](super::ReactorSimulation)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub rows: usize,
    pub cols: usize,
    pub layout: GridLayout,
    pub diffusion: DiffusionParams,
    pub starting_balance: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rows: 10,
            cols: 10,
            layout: GridLayout::default(),
            diffusion: DiffusionParams::default(),
            starting_balance: 500_000.0,
        }
    }
}

impl SimulationConfig {
    /// Check every section
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidState`] for a zero-sized grid or one with
    /// more than [`MAX_CELLS`] cells, an unusable layout, an invalid stability
    /// fraction or a non-finite starting balance.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(SimError::invalid_state(format!(
                "grid must have at least one cell, got {}x{}",
                self.rows, self.cols
            )));
        }
        if !matches!(self.rows.checked_mul(self.cols), Some(cells) if cells <= MAX_CELLS) {
            return Err(SimError::invalid_state(format!(
                "grid {}x{} exceeds the {MAX_CELLS} cell limit",
                self.rows, self.cols
            )));
        }
        self.layout.validate()?;
        self.diffusion.validate()?;
        if !self.starting_balance.is_finite() {
            return Err(SimError::invalid_state(format!(
                "starting balance must be finite, got {}",
                self.starting_balance
            )));
        }
        Ok(())
    }
}
