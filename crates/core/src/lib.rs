//! Reactor Heat Simulation Core Library
//!
//! Tick-driven thermal cellular simulation for an idle reactor game. A fixed
//! `rows × cols` grid holds placed objects (fuel rods, pipes, heat stores,
//! coolers); every tick heat is generated, conducted between connected
//! neighbours, drained by heat sinks and clamped, after which expired and
//! overheated objects are removed.
//!
//! ## Layout
//!
//! - [`solver`]: thermal field, connected components, diffusion stepper
//! - [`grid`]: occupancy of cells and the screen layout of the grid
//! - [`catalog`]: immutable templates that placement clones from
//! - [`simulation`]: lifecycle policy, economy and the [`ReactorSimulation`] facade
//!
//! ## Example
//!
//! ```rust
//! use reactor_sim_core::{Catalog, GridCoord, PurchaseOutcome, ReactorSimulation, SimulationConfig};
//!
//! let mut sim = ReactorSimulation::new(SimulationConfig::default(), Catalog::standard()).unwrap();
//! assert_eq!(sim.buy(GridCoord::new(4, 4), "uranium_rod"), PurchaseOutcome::Placed);
//!
//! let report = sim.advance(1.0).unwrap();
//! assert!(report.removals.is_empty());
//! assert!(sim.heat_ratio(GridCoord::new(4, 4)).unwrap() > 0.0);
//! ```

// Core types and utilities
pub mod core_types;

pub mod catalog;
pub mod grid;
pub mod simulation;
pub mod solver;

// Re-export core types
pub use core_types::{GridCoord, Seconds, SimError};

// Re-export main types
pub use catalog::{Catalog, CatalogEntry, Category};
pub use grid::{GridLayout, OccupancyGrid, PlacedObject};
pub use simulation::{
    IncomeSink, Ledger, PurchaseOutcome, ReactorSimulation, Removal, RemovalReason,
    SimulationConfig, SimulationStats, TickReport, MAX_CELLS,
};
pub use solver::{DiffusionParams, DiffusionStepper, ThermalField, ThermalParams};
