//! Thermal state of the reactor grid
//!
//! Four parallel per-cell arrays over a fixed `rows × cols` domain:
//! - `heat`: stored thermal energy, kept in `[0, capacity]` after every step
//! - `generation`: signed rate; negative only for pure heat sinks (`capacity == 0`)
//! - `capacity`: maximum heat storage; 0 means "no thermal mass"
//! - `conductivity`: willingness to exchange heat; 0 means thermally isolated
//!
//! Accessors are bounds-checked and return [`SimError::OutOfBounds`]; no other
//! validation happens here; [`ThermalField::validate`] is run by the stepper.

use super::fields::FieldData;
use crate::core_types::{GridCoord, SimError};
use serde::{Deserialize, Serialize};

/// Declared thermal parameters of a placeable object
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ThermalParams {
    /// Heat produced per second (negative for active cooling devices)
    pub heat_generation: f32,
    /// Heat storage capacity; becomes the cell's `capacity`
    pub max_heat: f32,
    /// Cell conductivity
    pub conductivity: f32,
}

impl ThermalParams {
    /// Whether these parameters describe a pure heat sink (no storage, negative generation)
    #[must_use]
    pub fn is_heat_sink(&self) -> bool {
        self.max_heat == 0.0 && self.heat_generation < 0.0
    }
}

/// Owned thermal state of every cell in the grid
#[derive(Debug, Clone)]
pub struct ThermalField {
    heat: FieldData,
    generation: FieldData,
    capacity: FieldData,
    conductivity: FieldData,
    rows: usize,
    cols: usize,
}

impl ThermalField {
    /// Create an all-zero field
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            heat: FieldData::new(rows, cols),
            generation: FieldData::new(rows, cols),
            capacity: FieldData::new(rows, cols),
            conductivity: FieldData::new(rows, cols),
            rows,
            cols,
        }
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row-major index of `coord`
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OutOfBounds`] if `coord` lies outside the grid.
    pub fn index_of(&self, coord: GridCoord) -> Result<usize, SimError> {
        if coord.in_bounds(self.rows, self.cols) {
            Ok(coord.index(self.cols))
        } else {
            Err(SimError::OutOfBounds {
                coord,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// Stored heat at `coord`
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OutOfBounds`] if `coord` lies outside the grid.
    pub fn heat(&self, coord: GridCoord) -> Result<f32, SimError> {
        Ok(self.heat.data[self.index_of(coord)?])
    }

    /// Overwrite stored heat at `coord`
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OutOfBounds`] if `coord` lies outside the grid.
    pub fn set_heat(&mut self, coord: GridCoord, value: f32) -> Result<(), SimError> {
        let idx = self.index_of(coord)?;
        self.heat.data[idx] = value;
        Ok(())
    }

    /// Generation rate at `coord`
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OutOfBounds`] if `coord` lies outside the grid.
    pub fn generation(&self, coord: GridCoord) -> Result<f32, SimError> {
        Ok(self.generation.data[self.index_of(coord)?])
    }

    /// Overwrite the generation rate at `coord`
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OutOfBounds`] if `coord` lies outside the grid.
    pub fn set_generation(&mut self, coord: GridCoord, value: f32) -> Result<(), SimError> {
        let idx = self.index_of(coord)?;
        self.generation.data[idx] = value;
        Ok(())
    }

    /// Heat capacity at `coord`
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OutOfBounds`] if `coord` lies outside the grid.
    pub fn capacity(&self, coord: GridCoord) -> Result<f32, SimError> {
        Ok(self.capacity.data[self.index_of(coord)?])
    }

    /// Overwrite the heat capacity at `coord`
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OutOfBounds`] if `coord` lies outside the grid.
    pub fn set_capacity(&mut self, coord: GridCoord, value: f32) -> Result<(), SimError> {
        let idx = self.index_of(coord)?;
        self.capacity.data[idx] = value;
        Ok(())
    }

    /// Conductivity at `coord`
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OutOfBounds`] if `coord` lies outside the grid.
    pub fn conductivity(&self, coord: GridCoord) -> Result<f32, SimError> {
        Ok(self.conductivity.data[self.index_of(coord)?])
    }

    /// Overwrite the conductivity at `coord`
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OutOfBounds`] if `coord` lies outside the grid.
    pub fn set_conductivity(&mut self, coord: GridCoord, value: f32) -> Result<(), SimError> {
        let idx = self.index_of(coord)?;
        self.conductivity.data[idx] = value;
        Ok(())
    }

    /// Install an object's declared parameters at `coord`; the cell starts cold
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OutOfBounds`] if `coord` lies outside the grid.
    pub fn apply_params(&mut self, coord: GridCoord, params: ThermalParams) -> Result<(), SimError> {
        let idx = self.index_of(coord)?;
        self.heat.data[idx] = 0.0;
        self.generation.data[idx] = params.heat_generation;
        self.capacity.data[idx] = params.max_heat;
        self.conductivity.data[idx] = params.conductivity;
        Ok(())
    }

    /// Zero all four arrays at `coord`
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OutOfBounds`] if `coord` lies outside the grid.
    pub fn clear(&mut self, coord: GridCoord) -> Result<(), SimError> {
        self.apply_params(coord, ThermalParams::default())
    }

    /// `heat / capacity` at `coord`, 0 for cells without thermal mass
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OutOfBounds`] if `coord` lies outside the grid.
    pub fn heat_ratio(&self, coord: GridCoord) -> Result<f32, SimError> {
        Ok(self.temperature_at(self.index_of(coord)?))
    }

    /// Temperature (`heat / capacity`) by flat index; 0 when capacity is 0
    #[inline]
    pub(crate) fn temperature_at(&self, idx: usize) -> f32 {
        let capacity = self.capacity.data[idx];
        if capacity > 0.0 {
            self.heat.data[idx] / capacity
        } else {
            0.0
        }
    }

    /// Heat ratio of every cell, row-major; for rendering collaborators
    #[must_use]
    pub fn heat_ratios(&self) -> Vec<f32> {
        (0..self.len()).map(|idx| self.temperature_at(idx)).collect()
    }

    /// Total stored heat across the grid
    #[must_use]
    pub fn total_heat(&self) -> f32 {
        self.heat.sum()
    }

    #[must_use]
    pub fn heat_field(&self) -> &FieldData {
        &self.heat
    }

    #[must_use]
    pub fn generation_field(&self) -> &FieldData {
        &self.generation
    }

    #[must_use]
    pub fn capacity_field(&self) -> &FieldData {
        &self.capacity
    }

    #[must_use]
    pub fn conductivity_field(&self) -> &FieldData {
        &self.conductivity
    }

    /// Mutable heat alongside the read-only parameter arrays
    /// (`heat`, `generation`, `capacity`, `conductivity`)
    pub(crate) fn split_mut(&mut self) -> (&mut FieldData, &FieldData, &FieldData, &FieldData) {
        (
            &mut self.heat,
            &self.generation,
            &self.capacity,
            &self.conductivity,
        )
    }

    /// Check the array invariants the stepper relies on
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidState`] naming the first cell with a non-finite
    /// value, a negative capacity or a negative conductivity.
    pub fn validate(&self) -> Result<(), SimError> {
        for idx in 0..self.len() {
            let heat = self.heat.data[idx];
            let generation = self.generation.data[idx];
            let capacity = self.capacity.data[idx];
            let conductivity = self.conductivity.data[idx];

            let bad = if !(heat.is_finite() && generation.is_finite()) {
                Some("non-finite heat or generation")
            } else if !capacity.is_finite() || capacity < 0.0 {
                Some("negative or non-finite capacity")
            } else if !conductivity.is_finite() || conductivity < 0.0 {
                Some("negative or non-finite conductivity")
            } else {
                None
            };

            if let Some(reason) = bad {
                let coord = GridCoord::from_index(idx, self.cols);
                return Err(SimError::invalid_state(format!("{reason} at cell {coord}")));
            }
        }
        Ok(())
    }
}
