//! Screen geometry of the reactor grid
//!
//! Pure coordinate transform for placement/removal collaborators; nothing here
//! touches simulation state.

use crate::core_types::{GridCoord, SimError};
use serde::{Deserialize, Serialize};

/// Pixel placement of the grid: top-left origin and square cell size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    pub origin_x: f32,
    pub origin_y: f32,
    pub cell_size: f32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            origin_x: 450.0,
            origin_y: 50.0,
            cell_size: 50.0,
        }
    }
}

impl GridLayout {
    /// Cell under the screen position `(x, y)`, `None` outside the grid
    #[must_use]
    pub fn cell_at(&self, x: f32, y: f32, rows: usize, cols: usize) -> Option<GridCoord> {
        let col = ((x - self.origin_x) / self.cell_size).floor();
        let row = ((y - self.origin_y) / self.cell_size).floor();

        if !(col.is_finite() && row.is_finite()) || col < 0.0 || row < 0.0 {
            return None;
        }

        let coord = GridCoord::new(row as usize, col as usize);
        coord.in_bounds(rows, cols).then_some(coord)
    }

    /// Top-left pixel of `coord`
    #[must_use]
    pub fn cell_origin(&self, coord: GridCoord) -> (f32, f32) {
        (
            self.origin_x + coord.col as f32 * self.cell_size,
            self.origin_y + coord.row as f32 * self.cell_size,
        )
    }

    /// Check the geometry is usable
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidState`] if the origin is non-finite or the
    /// cell size is not a positive finite number.
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.origin_x.is_finite() && self.origin_y.is_finite()) {
            return Err(SimError::invalid_state("grid origin must be finite"));
        }
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(SimError::invalid_state(format!(
                "cell size must be finite and positive, got {}",
                self.cell_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_at_maps_pixels_to_cells() {
        let layout = GridLayout::default();
        assert_eq!(layout.cell_at(450.0, 50.0, 10, 10), Some(GridCoord::new(0, 0)));
        assert_eq!(layout.cell_at(549.9, 120.0, 10, 10), Some(GridCoord::new(1, 1)));
        assert_eq!(layout.cell_at(949.0, 549.0, 10, 10), Some(GridCoord::new(9, 9)));
    }

    #[test]
    fn test_cell_at_rejects_outside_positions() {
        let layout = GridLayout::default();
        assert_eq!(layout.cell_at(449.0, 60.0, 10, 10), None);
        assert_eq!(layout.cell_at(950.0, 60.0, 10, 10), None);
        assert_eq!(layout.cell_at(500.0, 10.0, 10, 10), None);
        assert_eq!(layout.cell_at(f32::NAN, 60.0, 10, 10), None);
    }

    #[test]
    fn test_cell_origin_inverts_cell_at() {
        let layout = GridLayout::default();
        let coord = GridCoord::new(3, 7);
        let (x, y) = layout.cell_origin(coord);
        assert_eq!(layout.cell_at(x + 1.0, y + 1.0, 10, 10), Some(coord));
    }

    #[test]
    fn test_validate_cell_size() {
        let layout = GridLayout {
            cell_size: 0.0,
            ..GridLayout::default()
        };
        assert!(layout.validate().is_err());
        assert!(GridLayout::default().validate().is_ok());
    }
}
