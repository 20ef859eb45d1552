//! Immutable catalog templates
//!
//! A [`CatalogEntry`] describes one purchasable object. Placing an entry onto
//! the grid copies its declared fields into a fresh
//! [`PlacedObject`](crate::grid::PlacedObject); the entry itself is never mutated.

use crate::core_types::{Seconds, SimError};
use crate::solver::ThermalParams;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shop tab an entry is listed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Fuel rods
    #[serde(rename = "shop_logo")]
    Fuel,
    /// Pipes, passive stores and cooling devices
    #[serde(rename = "systems_logo")]
    Systems,
    #[serde(rename = "upgrade_logo")]
    Upgrade,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Fuel, Category::Systems, Category::Upgrade];

    /// Key used by catalog files and tab assets
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Category::Fuel => "shop_logo",
            Category::Systems => "systems_logo",
            Category::Upgrade => "upgrade_logo",
        }
    }

    /// Parse a catalog key back into a category
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Template for a purchasable object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub category: Category,
    /// Purchase price in money units
    pub cost: u64,
    /// Lifetime in seconds; 0 means permanent
    pub timeout_seconds: u32,
    /// Money earned per second while placed
    pub income: f64,
    #[serde(flatten)]
    pub thermal: ThermalParams,
}

impl CatalogEntry {
    /// Start a permanent, passive entry; refine it with the builder methods
    pub fn new(name: impl Into<String>, category: Category, cost: u64) -> Self {
        Self {
            name: name.into(),
            category,
            cost,
            timeout_seconds: 0,
            income: 0.0,
            thermal: ThermalParams::default(),
        }
    }

    pub fn with_timeout(mut self, seconds: u32) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn with_income(mut self, per_second: f64) -> Self {
        self.income = per_second;
        self
    }

    pub fn with_thermal(mut self, heat_generation: f32, max_heat: f32, conductivity: f32) -> Self {
        self.thermal = ThermalParams {
            heat_generation,
            max_heat,
            conductivity,
        };
        self
    }

    /// Whether placed instances never expire
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        self.timeout_seconds == 0
    }

    /// Declared lifetime
    #[must_use]
    pub fn timeout(&self) -> Seconds {
        Seconds::from(self.timeout_seconds)
    }

    /// Check that the template can be mirrored into a thermal field
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidState`] for an empty name, non-finite values,
    /// negative `max_heat` or `conductivity`, or negative generation on an
    /// entry that also stores heat (only pure sinks may cool).
    pub fn validate(&self) -> Result<(), SimError> {
        let ThermalParams {
            heat_generation,
            max_heat,
            conductivity,
        } = self.thermal;

        if self.name.is_empty() {
            return Err(SimError::invalid_state("catalog entry has an empty name"));
        }
        if !self.income.is_finite() {
            return Err(SimError::invalid_state(format!(
                "catalog entry '{}': income must be finite, got {}",
                self.name, self.income
            )));
        }
        if !(heat_generation.is_finite() && max_heat.is_finite() && conductivity.is_finite()) {
            return Err(SimError::invalid_state(format!(
                "catalog entry '{}': thermal parameters must be finite",
                self.name
            )));
        }
        if max_heat < 0.0 || conductivity < 0.0 {
            return Err(SimError::invalid_state(format!(
                "catalog entry '{}': max_heat and conductivity must be >= 0, got {max_heat} and {conductivity}",
                self.name
            )));
        }
        if heat_generation < 0.0 && max_heat > 0.0 {
            return Err(SimError::invalid_state(format!(
                "catalog entry '{}': negative generation requires max_heat == 0",
                self.name
            )));
        }
        Ok(())
    }
}
