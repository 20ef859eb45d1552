//! Object lifecycle policy
//!
//! Runs once per tick after the diffusion step. For every occupied cell, in
//! row-major order:
//! 1. mirror the cell's heat into [`PlacedObject::current_heat`]
//! 2. accrue `income × dt` into the [`IncomeSink`]
//! 3. remove the object if its timeout has elapsed
//! 4. otherwise remove it if it produces heat and has reached its `max_heat`
//!
//! A cell removed by expiry is not checked for overheat in the same tick.

use super::economy::IncomeSink;
use crate::core_types::{GridCoord, Seconds, SimError};
use crate::grid::{OccupancyGrid, PlacedObject};
use crate::solver::ThermalField;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Why the policy removed an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalReason {
    /// Lifetime reached its timeout
    Expired,
    /// Heat reached capacity on an active heat producer
    Overheated,
}

impl fmt::Display for RemovalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemovalReason::Expired => f.write_str("expired"),
            RemovalReason::Overheated => f.write_str("overheated"),
        }
    }
}

/// One object removed by the policy
#[derive(Debug, Clone, PartialEq)]
pub struct Removal {
    pub coord: GridCoord,
    pub reason: RemovalReason,
    pub object: PlacedObject,
}

/// Outcome of one lifecycle pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LifecycleReport {
    pub removals: Vec<Removal>,
    /// Income accrued during the pass
    pub income: f64,
}

/// Apply the lifecycle policy at simulation time `now` after a step of `dt`
///
/// # Errors
///
/// Returns [`SimError::OutOfBounds`] if `grid` and `field` disagree on the grid
/// dimensions.
pub fn tick_lifecycle(
    grid: &mut OccupancyGrid,
    field: &mut ThermalField,
    now: Seconds,
    dt: Seconds,
    sink: &mut dyn IncomeSink,
) -> Result<LifecycleReport, SimError> {
    let mut report = LifecycleReport::default();

    for coord in grid.occupied_coords() {
        let heat = field.heat(coord)?;
        let Some(object) = grid.get_mut(coord) else {
            continue;
        };
        object.current_heat = heat;

        let income = object.income * dt.value();
        sink.accrue(income);
        report.income += income;

        let reason = if object.is_expired(now) {
            RemovalReason::Expired
        } else if object.is_overheated() {
            RemovalReason::Overheated
        } else {
            continue;
        };

        if let Some(object) = grid.remove(field, coord) {
            info!(%coord, name = %object.name, %reason, at = %now, "object removed by lifecycle");
            report.removals.push(Removal {
                coord,
                reason,
                object,
            });
        }
    }

    debug!(
        removals = report.removals.len(),
        income = report.income,
        "lifecycle pass"
    );
    Ok(report)
}
