//! Heat transfer phases
//!
//! One tick is, in order:
//! 1. generation: `heat += generation × dt` for every cell
//! 2. conduction between 4-connected neighbours that both have thermal mass,
//!    are both conductive and share a connected component
//! 3. heat-sink cooling of each sink's 4-connected neighbours
//! 4. clamp into `[0, capacity]`
//!
//! Conduction for a neighbour pair `(a, b)`:
//! ```text
//! T = heat / capacity
//! k_eff = (k_a + k_b) / 2
//! flow_ab = clamp(k_eff × (T_a - T_b) × dt, ±fraction × min(C_a, C_b))
//! ```
//! Every flow is computed from a temperature snapshot taken at the start of the
//! phase and each cell's net inflow is summed in a fixed neighbour order, so the
//! result does not depend on iteration order or thread count. `flow_ab` is the
//! exact negation of `flow_ba`, which keeps the phase energy-conserving.

use super::connectivity::ComponentMap;
use crate::core_types::{GridCoord, SimError};
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Default fraction of `min(C_a, C_b)` a single pair may exchange per tick
pub const DEFAULT_STABILITY_FRACTION: f32 = 0.25;

/// Tunable conduction parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiffusionParams {
    /// Cap on the heat one neighbour pair may exchange in one tick, as a
    /// fraction of the smaller capacity. `None` disables the cap.
    pub stability_fraction: Option<f32>,
}

impl Default for DiffusionParams {
    fn default() -> Self {
        Self {
            stability_fraction: Some(DEFAULT_STABILITY_FRACTION),
        }
    }
}

impl DiffusionParams {
    /// Parameters with no transfer cap
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            stability_fraction: None,
        }
    }

    /// Parameters with the given transfer cap fraction
    #[must_use]
    pub fn with_stability_fraction(fraction: f32) -> Self {
        Self {
            stability_fraction: Some(fraction),
        }
    }

    /// Largest heat a pair with capacities `cap_a`, `cap_b` may exchange per tick
    #[inline]
    #[must_use]
    pub fn transfer_limit(&self, cap_a: f32, cap_b: f32) -> f32 {
        self.stability_fraction
            .map_or(f32::INFINITY, |fraction| fraction * cap_a.min(cap_b))
    }

    /// # Errors
    ///
    /// Returns [`SimError::InvalidState`] if the stability fraction is not a
    /// finite positive number.
    pub fn validate(&self) -> Result<(), SimError> {
        match self.stability_fraction {
            Some(fraction) if !fraction.is_finite() || fraction <= 0.0 => Err(
                SimError::invalid_state(format!("stability fraction must be > 0, got {fraction}")),
            ),
            _ => Ok(()),
        }
    }
}

/// Heat flowing from cell `a` to cell `b` during one tick
#[inline]
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn pair_flow(
    temp_a: f32,
    temp_b: f32,
    conductivity_a: f32,
    conductivity_b: f32,
    capacity_a: f32,
    capacity_b: f32,
    dt: f32,
    params: &DiffusionParams,
) -> f32 {
    let effective_conductivity = (conductivity_a + conductivity_b) * 0.5;
    let flow = effective_conductivity * (temp_a - temp_b) * dt;
    let limit = params.transfer_limit(capacity_a, capacity_b);
    flow.clamp(-limit, limit)
}

/// Phase 1: `heat += generation × dt`
pub(crate) fn apply_generation(heat: &mut [f32], generation: &[f32], dt: f32) {
    for (h, &g) in heat.iter_mut().zip(generation) {
        *h += g * dt;
    }
}

/// Temperature snapshot; cells without thermal mass read as 0
pub(crate) fn snapshot_temperatures(heat: &[f32], capacity: &[f32], temperatures: &mut [f32]) {
    for ((t, &h), &c) in temperatures.iter_mut().zip(heat).zip(capacity) {
        *t = if c > 0.0 { h / c } else { 0.0 };
    }
}

/// Read-only inputs of the conduction phase
pub(crate) struct ConductionInputs<'a> {
    pub temperatures: &'a [f32],
    pub capacity: &'a [f32],
    pub conductivity: &'a [f32],
    pub components: &'a ComponentMap,
    pub rows: usize,
    pub cols: usize,
    pub dt: f32,
    pub params: DiffusionParams,
}

impl ConductionInputs<'_> {
    #[inline]
    fn conducts(&self, idx: usize) -> bool {
        self.capacity[idx] > 0.0 && self.conductivity[idx] > 0.0
    }

    /// Net heat flowing into `idx` from its eligible 4-neighbours
    fn net_inflow(&self, idx: usize) -> f32 {
        if !self.conducts(idx) {
            return 0.0;
        }

        GridCoord::from_index(idx, self.cols)
            .neighbors_4(self.rows, self.cols)
            .map(|n| n.index(self.cols))
            .filter(|&nidx| self.conducts(nidx) && self.components.connected(idx, nidx))
            .map(|nidx| {
                pair_flow(
                    self.temperatures[nidx],
                    self.temperatures[idx],
                    self.conductivity[nidx],
                    self.conductivity[idx],
                    self.capacity[nidx],
                    self.capacity[idx],
                    self.dt,
                    &self.params,
                )
            })
            .sum()
    }
}

/// Phase 2: fill `delta` with every cell's net conductive inflow
pub(crate) fn compute_conduction_deltas(inputs: &ConductionInputs<'_>, delta: &mut [f32]) {
    let cols = inputs.cols;
    let conduct_row = |(row, out): (usize, &mut [f32])| {
        for (col, d) in out.iter_mut().enumerate() {
            *d = inputs.net_inflow(row * cols + col);
        }
    };

    #[cfg(feature = "parallel")]
    delta.par_chunks_mut(cols).enumerate().for_each(conduct_row);

    #[cfg(not(feature = "parallel"))]
    delta.chunks_mut(cols).enumerate().for_each(conduct_row);
}

/// Phase 3: each pure sink removes `-generation × dt` from its 4-neighbours
/// with thermal mass, split in proportion to their current heat.
///
/// Shares are computed from the heat before any sink acts, so sinks sharing a
/// neighbour do not depend on visiting order. Returns the total heat removed.
pub(crate) fn apply_sink_cooling(
    heat: &mut [f32],
    generation: &[f32],
    capacity: &[f32],
    rows: usize,
    cols: usize,
    dt: f32,
    cooling: &mut [f32],
) -> f32 {
    cooling.fill(0.0);

    for idx in 0..heat.len() {
        if generation[idx] >= 0.0 || capacity[idx] != 0.0 {
            continue;
        }
        let cooling_power = -generation[idx] * dt;

        let mut targets = [0_usize; 4];
        let mut count = 0;
        for neighbor in GridCoord::from_index(idx, cols).neighbors_4(rows, cols) {
            let nidx = neighbor.index(cols);
            if capacity[nidx] > 0.0 {
                targets[count] = nidx;
                count += 1;
            }
        }
        let targets = &targets[..count];

        let total: f32 = targets.iter().map(|&nidx| heat[nidx].max(0.0)).sum();
        if total <= 0.0 {
            continue;
        }
        for &nidx in targets {
            cooling[nidx] += cooling_power * heat[nidx].max(0.0) / total;
        }
    }

    let mut removed = 0.0;
    for (h, &c) in heat.iter_mut().zip(cooling.iter()) {
        if c > 0.0 {
            let cooled = (*h - c).max(0.0);
            removed += *h - cooled;
            *h = cooled;
        }
    }
    removed
}

/// Phase 4: clip every cell into `[0, capacity]`
pub(crate) fn clamp_to_capacity(heat: &mut [f32], capacity: &[f32]) {
    for (h, &c) in heat.iter_mut().zip(capacity) {
        *h = h.max(0.0).min(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::fields::FieldData;
    use approx::assert_relative_eq;

    #[test]
    fn test_pair_flow_uses_mean_conductivity() {
        let params = DiffusionParams::unbounded();
        let flow = pair_flow(1.0, 0.0, 1.0, 3.0, 10.0, 10.0, 0.5, &params);
        assert_relative_eq!(flow, 1.0);
    }

    #[test]
    fn test_pair_flow_is_antisymmetric() {
        let params = DiffusionParams::default();
        let ab = pair_flow(0.8, 0.3, 2.0, 0.5, 40.0, 20.0, 0.7, &params);
        let ba = pair_flow(0.3, 0.8, 0.5, 2.0, 20.0, 40.0, 0.7, &params);
        assert_eq!(ab, -ba);
    }

    #[test]
    fn test_stability_cap_limits_transfer() {
        let params = DiffusionParams::with_stability_fraction(0.02);
        // Uncapped flow would be 8 × 1 × 1 = 8; cap is 0.02 × min(10, 50) = 0.2
        let flow = pair_flow(1.0, 0.0, 8.0, 8.0, 10.0, 50.0, 1.0, &params);
        assert_relative_eq!(flow, 0.2);
        assert_relative_eq!(params.transfer_limit(50.0, 10.0), 0.2);
        assert!(DiffusionParams::unbounded().transfer_limit(1.0, 1.0).is_infinite());
    }

    #[test]
    fn test_params_validation() {
        assert!(DiffusionParams::default().validate().is_ok());
        assert!(DiffusionParams::unbounded().validate().is_ok());
        assert!(DiffusionParams::with_stability_fraction(0.0).validate().is_err());
        assert!(DiffusionParams::with_stability_fraction(f32::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_generation_may_go_negative_before_clamp() {
        let mut heat = vec![1.0, 0.0];
        apply_generation(&mut heat, &[2.0, -2.0], 0.5);
        assert_eq!(heat, vec![2.0, -1.0]);
        clamp_to_capacity(&mut heat, &[1.5, 0.0]);
        assert_eq!(heat, vec![1.5, 0.0]);
    }

    #[test]
    fn test_conduction_skips_cells_without_mass() {
        // Middle cell is conductive but has no capacity: it bridges the component
        // but cannot carry heat.
        let capacity = [10.0, 0.0, 10.0];
        let conductivity = [1.0, 1.0, 1.0];
        let heat = [10.0, 0.0, 0.0];
        let mut temps = [0.0; 3];
        snapshot_temperatures(&heat, &capacity, &mut temps);

        let mut cond_field = FieldData::new(1, 3);
        cond_field.data.copy_from_slice(&conductivity);
        let components = ComponentMap::compute(&cond_field);

        let inputs = ConductionInputs {
            temperatures: &temps,
            capacity: &capacity,
            conductivity: &conductivity,
            components: &components,
            rows: 1,
            cols: 3,
            dt: 1.0,
            params: DiffusionParams::default(),
        };
        let mut delta = [0.0; 3];
        compute_conduction_deltas(&inputs, &mut delta);
        assert_eq!(delta, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_sink_cooling_splits_by_heat_share() {
        // Row: [hot 6] [sink] [warm 2]
        let mut heat = vec![6.0, 0.0, 2.0];
        let generation = [0.0, -4.0, 0.0];
        let capacity = [10.0, 0.0, 10.0];
        let mut cooling = vec![0.0; 3];

        let removed = apply_sink_cooling(&mut heat, &generation, &capacity, 1, 3, 1.0, &mut cooling);

        assert_relative_eq!(heat[0], 3.0);
        assert_relative_eq!(heat[2], 1.0);
        assert_relative_eq!(removed, 4.0);
    }

    #[test]
    fn test_sink_cooling_never_goes_negative() {
        let mut heat = vec![0.5, 0.0];
        let mut cooling = vec![0.0; 2];
        let removed =
            apply_sink_cooling(&mut heat, &[0.0, -10.0], &[10.0, 0.0], 1, 2, 1.0, &mut cooling);
        assert_eq!(heat[0], 0.0);
        assert_relative_eq!(removed, 0.5);
    }

    #[test]
    fn test_sink_with_cold_neighbors_does_nothing() {
        let mut heat = vec![0.0, 0.0, 0.0];
        let mut cooling = vec![0.0; 3];
        let removed = apply_sink_cooling(
            &mut heat,
            &[0.0, -1.0, 0.0],
            &[5.0, 0.0, 5.0],
            1,
            3,
            1.0,
            &mut cooling,
        );
        assert_eq!(removed, 0.0);
        assert_eq!(heat, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_two_sinks_sharing_a_neighbor_are_order_independent() {
        // [sink] [rod 4] [sink]
        let mut heat = vec![0.0, 4.0, 0.0];
        let mut cooling = vec![0.0; 3];
        apply_sink_cooling(
            &mut heat,
            &[-1.0, 0.0, -1.5],
            &[0.0, 10.0, 0.0],
            1,
            3,
            1.0,
            &mut cooling,
        );
        assert_relative_eq!(heat[1], 1.5);
    }
}
