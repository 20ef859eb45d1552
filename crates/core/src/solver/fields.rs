//! Per-cell scalar field storage
//!
//! Stores 2D field data as a flat `Vec<f32>` in row-major order
//! (`row * cols + col`). [`crate::solver::ThermalField`] keeps four of these.

use crate::core_types::GridCoord;

/// Field data container
#[derive(Debug, Clone, PartialEq)]
pub struct FieldData {
    /// Field values in row-major order (row * cols + col)
    pub data: Vec<f32>,
    /// Grid height in cells
    pub rows: usize,
    /// Grid width in cells
    pub cols: usize,
}

impl FieldData {
    /// Create a new field with given dimensions, initialized to zero
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::with_value(rows, cols, 0.0)
    }

    /// Create a new field with given dimensions, initialized to a value
    #[must_use]
    pub fn with_value(rows: usize, cols: usize, value: f32) -> Self {
        Self {
            data: vec![value; rows * cols],
            rows,
            cols,
        }
    }

    /// Get reference to field data
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Get mutable reference to field data
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Value at `coord`, or `None` outside the grid
    #[must_use]
    pub fn get(&self, coord: GridCoord) -> Option<f32> {
        coord
            .in_bounds(self.rows, self.cols)
            .then(|| self.data[coord.index(self.cols)])
    }

    /// Mutable slot at `coord`, or `None` outside the grid
    pub fn get_mut(&mut self, coord: GridCoord) -> Option<&mut f32> {
        if coord.in_bounds(self.rows, self.cols) {
            Some(&mut self.data[coord.index(self.cols)])
        } else {
            None
        }
    }

    /// Fill entire field with a value
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// Sum of all values
    #[must_use]
    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }
}
