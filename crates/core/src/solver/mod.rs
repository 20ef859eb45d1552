//! Thermal field solver module
//!
//! Holds the per-cell thermal state ([`ThermalField`]), the connected-component
//! labelling that gates conduction ([`ComponentMap`]) and the per-tick
//! [`DiffusionStepper`].
//!
//! # Feature Flags
//!
//! - `parallel` (default): computes conduction deltas row-by-row with Rayon.
//!   Results are identical with and without the feature because every cell's
//!   net inflow is summed in a fixed neighbour order from a frozen snapshot.
//!
//! # Example
//!
//! ```rust
//! use reactor_sim_core::core_types::GridCoord;
//! use reactor_sim_core::solver::{DiffusionStepper, ThermalField, ThermalParams};
//!
//! let mut field = ThermalField::new(2, 1);
//! let pipe = ThermalParams { heat_generation: 0.0, max_heat: 10.0, conductivity: 1.0 };
//! field.apply_params(GridCoord::new(0, 0), pipe).unwrap();
//! field.apply_params(GridCoord::new(1, 0), pipe).unwrap();
//! field.set_heat(GridCoord::new(0, 0), 10.0).unwrap();
//!
//! let mut stepper = DiffusionStepper::default();
//! stepper.step(&mut field, 1.0).unwrap();
//! assert!((field.heat(GridCoord::new(1, 0)).unwrap() - 1.0).abs() < 1e-6);
//! ```

mod connectivity;
mod fields;
mod heat_transfer;
mod stepper;
mod thermal_field;

// Re-exports
pub use connectivity::{compute_components, ComponentMap, NO_COMPONENT};
pub use fields::FieldData;
pub use heat_transfer::{pair_flow, DiffusionParams, DEFAULT_STABILITY_FRACTION};
pub use stepper::DiffusionStepper;
pub use thermal_field::{ThermalField, ThermalParams};
