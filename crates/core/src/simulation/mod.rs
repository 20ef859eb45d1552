//! Reactor simulation facade
//!
//! `ReactorSimulation` owns every piece of reactor state and is the single
//! entry point a game loop drives:
//! - thermal field, occupancy grid and diffusion stepper
//! - the catalog placement clones from, and the money ledger
//! - the simulation clock
//!
//! Each [`ReactorSimulation::advance`] runs the diffusion step and then the
//! lifecycle policy to completion before returning, so readers always observe
//! a consistent tick.

mod config;
mod economy;
mod lifecycle;

pub use config::{SimulationConfig, MAX_CELLS};
pub use economy::{IncomeSink, Ledger};
pub use lifecycle::{tick_lifecycle, LifecycleReport, Removal, RemovalReason};

use crate::catalog::{Catalog, CatalogEntry};
use crate::core_types::{GridCoord, Seconds, SimError};
use crate::grid::{GridLayout, OccupancyGrid, PlacedObject};
use crate::solver::{DiffusionStepper, ThermalField};
use tracing::{debug, info, trace};

/// Result of a shop purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseOutcome {
    /// Object placed and its cost debited
    Placed,
    /// No catalog entry with that name
    UnknownItem,
    /// Balance below the entry's cost
    InsufficientFunds,
    /// Cell occupied or outside the grid
    CellUnavailable,
}

/// What happened during one [`ReactorSimulation::advance`]
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Tick number, starting at 1
    pub tick: u64,
    /// Simulation time after the tick
    pub now: Seconds,
    pub removals: Vec<Removal>,
    pub income: f64,
    pub total_heat: f32,
}

/// Statistics for the simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationStats {
    pub tick_count: u64,
    pub elapsed: Seconds,
    pub occupied_cells: usize,
    pub total_cells: usize,
    pub total_heat: f32,
    pub balance: f64,
}

/// Owned reactor state driven one tick at a time
#[derive(Debug, Clone)]
pub struct ReactorSimulation {
    field: ThermalField,
    grid: OccupancyGrid,
    stepper: DiffusionStepper,
    ledger: Ledger,
    catalog: Catalog,
    layout: GridLayout,
    /// Simulation clock in whole microseconds
    clock_micros: u64,
    tick_count: u64,
}

impl ReactorSimulation {
    /// Build an empty reactor
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidState`] if `config` fails validation.
    pub fn new(config: SimulationConfig, catalog: Catalog) -> Result<Self, SimError> {
        config.validate()?;
        info!(
            rows = config.rows,
            cols = config.cols,
            catalog_entries = catalog.len(),
            stability_fraction = ?config.diffusion.stability_fraction,
            "reactor simulation created"
        );

        Ok(Self {
            field: ThermalField::new(config.rows, config.cols),
            grid: OccupancyGrid::new(config.rows, config.cols),
            stepper: DiffusionStepper::new(config.diffusion),
            ledger: Ledger::new(config.starting_balance),
            catalog,
            layout: config.layout,
            clock_micros: 0,
            tick_count: 0,
        })
    }

    /// Advance the simulation by `dt` seconds
    ///
    /// Runs the diffusion step, advances the clock, then applies the lifecycle
    /// policy with income going to the ledger. The clock moves by `dt` rounded
    /// to the nearest microsecond, so repeated fractional steps still land
    /// exactly on whole-second timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidState`] if `dt` is negative or non-finite, or
    /// if the thermal field is corrupt. Nothing is mutated in that case.
    pub fn advance(&mut self, dt: f64) -> Result<TickReport, SimError> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(SimError::invalid_state(format!(
                "time step must be finite and >= 0, got {dt}"
            )));
        }
        let dt = Seconds::new(dt);

        self.stepper.step(&mut self.field, dt.as_f32())?;
        self.clock_micros = self.clock_micros.saturating_add(dt.as_micros());
        self.tick_count += 1;
        let now = self.now();

        let lifecycle = tick_lifecycle(
            &mut self.grid,
            &mut self.field,
            now,
            dt,
            &mut self.ledger,
        )?;

        let report = TickReport {
            tick: self.tick_count,
            now,
            removals: lifecycle.removals,
            income: lifecycle.income,
            total_heat: self.field.total_heat(),
        };
        debug!(
            tick = report.tick,
            now = %report.now,
            removals = report.removals.len(),
            total_heat = report.total_heat,
            balance = self.ledger.balance(),
            "tick complete"
        );
        Ok(report)
    }

    /// Place a fresh instance of `entry` at `coord`; `false` if occupied or out of bounds
    pub fn place(&mut self, coord: GridCoord, entry: &CatalogEntry) -> bool {
        let now = self.now();
        self.grid.place(&mut self.field, coord, entry, now)
    }

    /// Remove whatever occupies `coord`, zeroing its thermal state
    pub fn remove(&mut self, coord: GridCoord) -> Option<PlacedObject> {
        self.grid.remove(&mut self.field, coord)
    }

    /// Buy the catalog item `name` and place it at `coord`
    ///
    /// The cost is only debited when placement succeeds.
    pub fn buy(&mut self, coord: GridCoord, name: &str) -> PurchaseOutcome {
        let Some(entry) = self.catalog.get(name) else {
            trace!(name, "purchase of unknown item");
            return PurchaseOutcome::UnknownItem;
        };
        if !self.ledger.can_afford(entry.cost) {
            trace!(name, cost = entry.cost, balance = self.ledger.balance(), "purchase unaffordable");
            return PurchaseOutcome::InsufficientFunds;
        }
        let now = self.now();
        if !self.grid.place(&mut self.field, coord, entry, now) {
            return PurchaseOutcome::CellUnavailable;
        }
        let paid = self.ledger.try_spend(entry.cost);
        debug_assert!(paid, "affordability was checked before placement");
        PurchaseOutcome::Placed
    }

    /// Cell under a screen position
    #[must_use]
    pub fn cell_at(&self, x: f32, y: f32) -> Option<GridCoord> {
        self.layout.cell_at(x, y, self.rows(), self.cols())
    }

    /// `heat / capacity` at `coord`, 0 for cells without thermal mass
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OutOfBounds`] if `coord` lies outside the grid.
    pub fn heat_ratio(&self, coord: GridCoord) -> Result<f32, SimError> {
        self.field.heat_ratio(coord)
    }

    /// Remaining lifetime fraction of the object at `coord`
    ///
    /// `None` for empty cells and permanent objects.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OutOfBounds`] if `coord` lies outside the grid.
    pub fn remaining_time_ratio(&self, coord: GridCoord) -> Result<Option<f32>, SimError> {
        self.field.index_of(coord)?;
        Ok(self
            .grid
            .get(coord)
            .and_then(|object| object.remaining_time_ratio(self.now())))
    }

    /// # Errors
    ///
    /// Returns [`SimError::OutOfBounds`] if `coord` lies outside the grid.
    pub fn is_occupied(&self, coord: GridCoord) -> Result<bool, SimError> {
        self.field.index_of(coord)?;
        Ok(self.grid.is_occupied(coord))
    }

    #[must_use]
    pub fn object_at(&self, coord: GridCoord) -> Option<&PlacedObject> {
        self.grid.get(coord)
    }

    /// Heat ratio of every cell, row-major
    #[must_use]
    pub fn heat_ratios(&self) -> Vec<f32> {
        self.field.heat_ratios()
    }

    #[must_use]
    pub fn stats(&self) -> SimulationStats {
        SimulationStats {
            tick_count: self.tick_count,
            elapsed: self.now(),
            occupied_cells: self.grid.occupied_count(),
            total_cells: self.field.len(),
            total_heat: self.field.total_heat(),
            balance: self.ledger.balance(),
        }
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.field.rows()
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.field.cols()
    }

    /// Current simulation time
    #[must_use]
    pub fn now(&self) -> Seconds {
        Seconds::from_micros(self.clock_micros)
    }

    #[must_use]
    pub fn field(&self) -> &ThermalField {
        &self.field
    }

    #[must_use]
    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    /// Diffusion stepper, including the component map of the last tick
    #[must_use]
    pub fn stepper(&self) -> &DiffusionStepper {
        &self.stepper
    }
}
