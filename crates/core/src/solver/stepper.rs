//! Per-tick diffusion stepper
//!
//! Owns the scratch buffers reused every tick (component labels, temperature
//! snapshot, conduction deltas, sink cooling) and runs the phases of
//! [`super::heat_transfer`] against a [`ThermalField`] passed in by the caller.

use super::connectivity::ComponentMap;
use super::heat_transfer::{
    apply_generation, apply_sink_cooling, clamp_to_capacity, compute_conduction_deltas,
    snapshot_temperatures, ConductionInputs, DiffusionParams,
};
use super::thermal_field::ThermalField;
use crate::core_types::SimError;
use tracing::{debug, trace};

/// Advances a [`ThermalField`] by one tick
#[derive(Debug, Clone)]
pub struct DiffusionStepper {
    params: DiffusionParams,
    components: ComponentMap,
    temperatures: Vec<f32>,
    delta: Vec<f32>,
    cooling: Vec<f32>,
}

impl DiffusionStepper {
    /// Create a stepper; buffers are sized lazily on the first step
    #[must_use]
    pub fn new(params: DiffusionParams) -> Self {
        Self {
            params,
            components: ComponentMap::new(0, 0),
            temperatures: Vec::new(),
            delta: Vec::new(),
            cooling: Vec::new(),
        }
    }

    #[must_use]
    pub fn params(&self) -> &DiffusionParams {
        &self.params
    }

    /// Component partition computed during the most recent step
    #[must_use]
    pub fn components(&self) -> &ComponentMap {
        &self.components
    }

    /// Advance `field` by `dt` seconds
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidState`] if `dt` is negative or non-finite, if
    /// the stepper parameters are invalid, or if the field holds NaN values or
    /// negative capacities/conductivities. The field is left untouched on error.
    pub fn step(&mut self, field: &mut ThermalField, dt: f32) -> Result<(), SimError> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(SimError::invalid_state(format!(
                "time step must be finite and >= 0, got {dt}"
            )));
        }
        self.params.validate()?;
        field.validate()?;
        if field.is_empty() {
            return Ok(());
        }

        let rows = field.rows();
        let cols = field.cols();
        let cells = field.len();
        self.temperatures.resize(cells, 0.0);
        self.delta.resize(cells, 0.0);
        self.cooling.resize(cells, 0.0);

        let heat_before = field.total_heat();
        let (heat, generation, capacity, conductivity) = field.split_mut();

        // 1. Generation
        apply_generation(heat.as_mut_slice(), generation.as_slice(), dt);

        // 2. Componentization
        self.components.recompute(conductivity);

        // 3. Conduction against a frozen snapshot
        snapshot_temperatures(heat.as_slice(), capacity.as_slice(), &mut self.temperatures);
        let inputs = ConductionInputs {
            temperatures: &self.temperatures,
            capacity: capacity.as_slice(),
            conductivity: conductivity.as_slice(),
            components: &self.components,
            rows,
            cols,
            dt,
            params: self.params,
        };
        compute_conduction_deltas(&inputs, &mut self.delta);
        for (h, d) in heat.as_mut_slice().iter_mut().zip(&self.delta) {
            *h += d;
        }

        // 4. Heat-sink cooling
        let cooled = apply_sink_cooling(
            heat.as_mut_slice(),
            generation.as_slice(),
            capacity.as_slice(),
            rows,
            cols,
            dt,
            &mut self.cooling,
        );

        // 5. Clamp
        clamp_to_capacity(heat.as_mut_slice(), capacity.as_slice());

        let conducted: f32 = self.delta.iter().filter(|d| **d > 0.0).sum();
        trace!(conducted, cooled, "diffusion phases complete");
        debug!(
            dt,
            components = self.components.count(),
            heat_before,
            heat_after = field.total_heat(),
            "thermal step"
        );
        Ok(())
    }
}

impl Default for DiffusionStepper {
    fn default() -> Self {
        Self::new(DiffusionParams::default())
    }
}
