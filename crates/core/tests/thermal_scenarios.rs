//! Thermal field properties: conservation, bounds, isolation, equilibrium
//! and the hand-computed step scenarios.

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reactor_sim_core::solver::{DiffusionParams, DiffusionStepper, ThermalField, ThermalParams};
use reactor_sim_core::GridCoord;

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn cell(field: &mut ThermalField, row: usize, col: usize, capacity: f32, conductivity: f32, heat: f32) {
    let c = GridCoord::new(row, col);
    field
        .apply_params(
            c,
            ThermalParams {
                heat_generation: 0.0,
                max_heat: capacity,
                conductivity,
            },
        )
        .unwrap();
    field.set_heat(c, heat).unwrap();
}

/// Random passive field: conductive cells, insulators and empty cells, all
/// with temperature <= 1 so nothing ever needs clamping
fn random_passive_field(rng: &mut StdRng) -> ThermalField {
    let rows = rng.random_range(2..9);
    let cols = rng.random_range(2..9);
    let mut field = ThermalField::new(rows, cols);

    for row in 0..rows {
        for col in 0..cols {
            let roll: f32 = rng.random();
            if roll < 0.15 {
                continue;
            }
            let capacity = rng.random_range(5.0..50.0);
            let conductivity = if roll < 0.25 {
                0.0
            } else {
                rng.random_range(0.1..1.0)
            };
            let heat = capacity * rng.random_range(0.0..1.0);
            cell(&mut field, row, col, capacity, conductivity, heat);
        }
    }
    field
}

#[test]
fn test_diffusion_conserves_heat_without_sources() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..25 {
        let mut field = random_passive_field(&mut rng);
        let mut stepper = DiffusionStepper::default();
        let before = field.total_heat();

        for _ in 0..40 {
            stepper.step(&mut field, 0.1).unwrap();
        }

        assert_relative_eq!(field.total_heat(), before, max_relative = 1e-4);
    }
}

#[test]
fn test_heat_stays_within_capacity() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..25 {
        let mut field = random_passive_field(&mut rng);
        let rows = field.rows();
        let cols = field.cols();

        // Sprinkle sources and sinks on top of the passive layout
        for _ in 0..rows {
            let c = GridCoord::new(rng.random_range(0..rows), rng.random_range(0..cols));
            if rng.random_bool(0.5) {
                field.set_generation(c, rng.random_range(0.5..20.0)).unwrap();
            } else {
                field
                    .apply_params(
                        c,
                        ThermalParams {
                            heat_generation: rng.random_range(-20.0..-0.5),
                            max_heat: 0.0,
                            conductivity: 0.0,
                        },
                    )
                    .unwrap();
            }
        }

        let mut stepper = DiffusionStepper::default();
        for _ in 0..30 {
            let dt = rng.random_range(0.0..3.0);
            stepper.step(&mut field, dt).unwrap();

            let heat = field.heat_field().as_slice();
            let capacity = field.capacity_field().as_slice();
            for (h, c) in heat.iter().zip(capacity) {
                assert!(*h >= 0.0 && *h <= *c, "heat {h} outside [0, {c}]");
            }
        }
    }
}

#[test]
fn test_disconnected_cells_exchange_nothing() {
    // Hot column | insulating column | cold column
    let mut field = ThermalField::new(3, 3);
    for row in 0..3 {
        cell(&mut field, row, 0, 10.0, 1.0, 10.0);
        cell(&mut field, row, 1, 10.0, 0.0, 0.0);
        cell(&mut field, row, 2, 10.0, 1.0, 0.0);
    }

    let mut stepper = DiffusionStepper::default();
    for _ in 0..50 {
        stepper.step(&mut field, 1.0).unwrap();
    }

    assert_eq!(stepper.components().count(), 2);
    for row in 0..3 {
        assert_eq!(field.heat(GridCoord::new(row, 0)).unwrap(), 10.0);
        assert_eq!(field.heat(GridCoord::new(row, 1)).unwrap(), 0.0);
        assert_eq!(field.heat(GridCoord::new(row, 2)).unwrap(), 0.0);
    }
}

#[test]
fn test_diagonal_neighbors_share_component_but_not_heat() {
    let mut field = ThermalField::new(2, 2);
    cell(&mut field, 0, 0, 10.0, 1.0, 10.0);
    cell(&mut field, 1, 1, 10.0, 1.0, 0.0);

    let mut stepper = DiffusionStepper::default();
    stepper.step(&mut field, 1.0).unwrap();

    assert_eq!(stepper.components().count(), 1);
    assert_eq!(field.heat(GridCoord::new(0, 0)).unwrap(), 10.0);
    assert_eq!(field.heat(GridCoord::new(1, 1)).unwrap(), 0.0);
}

#[test]
fn test_connected_pair_reaches_equilibrium() {
    let mut field = ThermalField::new(1, 2);
    cell(&mut field, 0, 0, 10.0, 1.0, 10.0);
    cell(&mut field, 0, 1, 10.0, 1.0, 0.0);
    let a = GridCoord::new(0, 0);
    let b = GridCoord::new(0, 1);

    let mut stepper = DiffusionStepper::default();
    let mut gap = (field.heat_ratio(a).unwrap() - field.heat_ratio(b).unwrap()).abs();
    for _ in 0..60 {
        stepper.step(&mut field, 1.0).unwrap();
        let next = (field.heat_ratio(a).unwrap() - field.heat_ratio(b).unwrap()).abs();
        assert!(next <= gap + 1e-7, "gap grew from {gap} to {next}");
        gap = next;
    }

    assert!(gap < 1e-3);
    assert_relative_eq!(field.heat(a).unwrap(), 5.0, epsilon = 1e-2);
    assert_relative_eq!(field.heat(b).unwrap(), 5.0, epsilon = 1e-2);
}

#[test]
fn test_two_cell_step_scenario() {
    let mut field = ThermalField::new(2, 1);
    cell(&mut field, 0, 0, 10.0, 1.0, 10.0);
    cell(&mut field, 1, 0, 10.0, 1.0, 0.0);

    DiffusionStepper::default().step(&mut field, 1.0).unwrap();

    assert_relative_eq!(field.heat(GridCoord::new(0, 0)).unwrap(), 9.0);
    assert_relative_eq!(field.heat(GridCoord::new(1, 0)).unwrap(), 1.0);
}

#[test]
fn test_stability_cap_prevents_overshoot() {
    let setup = || {
        let mut field = ThermalField::new(2, 1);
        cell(&mut field, 0, 0, 10.0, 1.0, 10.0);
        cell(&mut field, 1, 0, 10.0, 1.0, 0.0);
        field
    };

    // dt = 10 asks for a flow of 10: without a cap the pair swaps temperatures
    let mut unbounded = setup();
    DiffusionStepper::new(DiffusionParams::unbounded())
        .step(&mut unbounded, 10.0)
        .unwrap();
    assert_relative_eq!(unbounded.heat(GridCoord::new(0, 0)).unwrap(), 0.0);
    assert_relative_eq!(unbounded.heat(GridCoord::new(1, 0)).unwrap(), 10.0);

    // the default cap limits one tick to 0.25 × min(10, 10)
    let mut capped = setup();
    DiffusionStepper::default().step(&mut capped, 10.0).unwrap();
    assert_relative_eq!(capped.heat(GridCoord::new(0, 0)).unwrap(), 7.5);
    assert_relative_eq!(capped.heat(GridCoord::new(1, 0)).unwrap(), 2.5);
}

#[test]
fn test_heat_sink_scenario() {
    let mut field = ThermalField::new(1, 2);
    field
        .apply_params(
            GridCoord::new(0, 0),
            ThermalParams {
                heat_generation: -2.0,
                max_heat: 0.0,
                conductivity: 0.0,
            },
        )
        .unwrap();
    cell(&mut field, 0, 1, 10.0, 1.0, 5.0);

    DiffusionStepper::default().step(&mut field, 1.0).unwrap();

    assert_relative_eq!(field.heat(GridCoord::new(0, 1)).unwrap(), 3.0);
    assert_eq!(field.heat(GridCoord::new(0, 0)).unwrap(), 0.0);
}
