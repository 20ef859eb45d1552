//! Occupancy of the reactor grid
//!
//! Each cell holds at most one [`PlacedObject`]. Placement and removal are the
//! only paths that write `generation`, `capacity` and `conductivity` into the
//! [`ThermalField`], so a cell is occupied exactly when those arrays carry the
//! placed object's declared values.

use crate::catalog::{CatalogEntry, Category};
use crate::core_types::{GridCoord, Seconds};
use crate::solver::{ThermalField, ThermalParams};
use tracing::{debug, trace, warn};

/// A live instance cloned from a [`CatalogEntry`]
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedObject {
    pub name: String,
    pub category: Category,
    pub cost: u64,
    /// Money earned per second
    pub income: f64,
    /// Lifetime; [`Seconds::ZERO`] means permanent
    pub timeout: Seconds,
    /// Simulation time at placement
    pub created_at: Seconds,
    /// Parameters mirrored into the thermal field
    pub params: ThermalParams,
    /// Copy of the field's heat at this cell as of the last lifecycle pass.
    /// The thermal field stays authoritative.
    pub current_heat: f32,
}

impl PlacedObject {
    /// Instantiate `entry` at simulation time `now`
    #[must_use]
    pub fn from_template(entry: &CatalogEntry, now: Seconds) -> Self {
        Self {
            name: entry.name.clone(),
            category: entry.category,
            cost: entry.cost,
            income: entry.income,
            timeout: entry.timeout(),
            created_at: now,
            params: entry.thermal,
            current_heat: 0.0,
        }
    }

    #[must_use]
    pub fn is_permanent(&self) -> bool {
        self.timeout == Seconds::ZERO
    }

    /// Time since placement at microsecond resolution, never negative
    #[must_use]
    pub fn elapsed(&self, now: Seconds) -> Seconds {
        Seconds::from_micros(now.as_micros().saturating_sub(self.created_at.as_micros()))
    }

    /// Whether a timed object has reached its timeout at `now`
    #[must_use]
    pub fn is_expired(&self, now: Seconds) -> bool {
        !self.is_permanent() && self.elapsed(now) >= self.timeout
    }

    /// Whether an active heat producer has filled its capacity.
    /// Passive stores and sinks never overheat.
    #[must_use]
    pub fn is_overheated(&self) -> bool {
        self.params.heat_generation > 0.0 && self.current_heat >= self.params.max_heat
    }

    /// `max(0, timeout - elapsed) / timeout`; `None` for permanent objects
    #[must_use]
    pub fn remaining_time_ratio(&self, now: Seconds) -> Option<f32> {
        if self.is_permanent() {
            return None;
        }
        let remaining = (self.timeout - self.elapsed(now)).max(Seconds::ZERO);
        Some((remaining.value() / self.timeout.value()) as f32)
    }
}

/// Row-major grid of optional [`PlacedObject`]s
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    cells: Vec<Option<PlacedObject>>,
    rows: usize,
    cols: usize,
}

impl OccupancyGrid {
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            cells: vec![None; rows * cols],
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

    fn slot(&self, coord: GridCoord) -> Option<usize> {
        coord
            .in_bounds(self.rows, self.cols)
            .then(|| coord.index(self.cols))
    }

    /// Place a fresh instance of `entry` at `coord`
    ///
    /// Returns `false` without mutating anything if the cell is occupied, the
    /// coordinate is outside the grid or the template is invalid. On success the
    /// object's thermal parameters are written into `field` and the cell's heat
    /// starts at 0.
    pub fn place(
        &mut self,
        field: &mut ThermalField,
        coord: GridCoord,
        entry: &CatalogEntry,
        now: Seconds,
    ) -> bool {
        let Some(idx) = self.slot(coord) else {
            warn!(%coord, rows = self.rows, cols = self.cols, "placement outside grid");
            return false;
        };
        if self.cells[idx].is_some() {
            trace!(%coord, name = %entry.name, "placement rejected, cell occupied");
            return false;
        }
        if let Err(err) = entry.validate() {
            warn!(%coord, %err, "placement rejected, invalid template");
            return false;
        }
        if let Err(err) = field.apply_params(coord, entry.thermal) {
            warn!(%coord, %err, "placement rejected, thermal field mismatch");
            return false;
        }

        debug!(%coord, name = %entry.name, created_at = %now, "object placed");
        self.cells[idx] = Some(PlacedObject::from_template(entry, now));
        true
    }

    /// Detach the object at `coord` and zero the thermal field there
    ///
    /// Empty or out-of-grid cells are a no-op returning `None`.
    pub fn remove(&mut self, field: &mut ThermalField, coord: GridCoord) -> Option<PlacedObject> {
        let idx = self.slot(coord)?;
        let object = self.cells[idx].take()?;
        if let Err(err) = field.clear(coord) {
            warn!(%coord, %err, "thermal field mismatch on removal");
        }
        debug!(%coord, name = %object.name, "object removed");
        Some(object)
    }

    #[must_use]
    pub fn is_occupied(&self, coord: GridCoord) -> bool {
        self.get(coord).is_some()
    }

    #[must_use]
    pub fn get(&self, coord: GridCoord) -> Option<&PlacedObject> {
        self.slot(coord).and_then(|idx| self.cells[idx].as_ref())
    }

    pub fn get_mut(&mut self, coord: GridCoord) -> Option<&mut PlacedObject> {
        let idx = self.slot(coord)?;
        self.cells[idx].as_mut()
    }

    /// Occupied cells in row-major order
    pub fn occupied(&self) -> impl Iterator<Item = (GridCoord, &PlacedObject)> {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(idx, cell)| {
                cell.as_ref()
                    .map(|object| (GridCoord::from_index(idx, cols), object))
            })
    }

    /// Coordinates of occupied cells in row-major order
    #[must_use]
    pub fn occupied_coords(&self) -> Vec<GridCoord> {
        self.occupied().map(|(coord, _)| coord).collect()
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}
