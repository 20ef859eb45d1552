//! Catalog of purchasable objects
//!
//! The catalog is the immutable template registry that placement clones from.
//! Entries are keyed by name and listed in insertion order, which is the order
//! a shop panel presents them in.

mod entry;

pub use entry::{CatalogEntry, Category};

use crate::core_types::SimError;
use rustc_hash::FxHashMap;
use tracing::debug;

/// Name-keyed registry of [`CatalogEntry`] templates
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: FxHashMap<String, CatalogEntry>,
    order: Vec<String>,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock reactor parts: four fuel rods, a passive heat store,
    /// four pipe grades and the level-1 cooler
    #[must_use]
    pub fn standard() -> Self {
        let entries = [
            CatalogEntry::new("uranium_rod", Category::Fuel, 10)
                .with_timeout(15)
                .with_income(1.0)
                .with_thermal(1.0, 5.0, 1.0),
            CatalogEntry::new("yellow_rod", Category::Fuel, 20)
                .with_timeout(20)
                .with_income(4.0)
                .with_thermal(4.0, 20.0, 2.0),
            CatalogEntry::new("red_rod", Category::Fuel, 50)
                .with_timeout(25)
                .with_income(5.0)
                .with_thermal(8.0, 40.0, 4.0),
            CatalogEntry::new("blue_rod", Category::Fuel, 250)
                .with_timeout(30)
                .with_income(16.0)
                .with_thermal(16.0, 80.0, 8.0),
            CatalogEntry::new("heat_sink", Category::Systems, 25).with_thermal(0.0, 300.0, 0.1),
            CatalogEntry::new("pipe", Category::Systems, 25).with_thermal(0.0, 30.0, 2.0),
            CatalogEntry::new("pipe_mk2", Category::Systems, 25).with_thermal(0.0, 120.0, 8.0),
            CatalogEntry::new("pipe_mk3", Category::Systems, 25).with_thermal(0.0, 240.0, 16.0),
            CatalogEntry::new("pipe_mk4", Category::Systems, 25).with_thermal(0.0, 480.0, 32.0),
            CatalogEntry::new("lvl1_cooling", Category::Systems, 25).with_thermal(-0.025, 0.0, 0.0),
        ];

        let mut catalog = Self::new();
        for entry in entries {
            catalog.order.push(entry.name.clone());
            catalog.entries.insert(entry.name.clone(), entry);
        }
        catalog
    }

    /// Add or replace an entry, returning the replaced template
    ///
    /// A replaced entry keeps its original listing position.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidState`] if the entry fails
    /// [`CatalogEntry::validate`]; the catalog is unchanged.
    pub fn insert(&mut self, entry: CatalogEntry) -> Result<Option<CatalogEntry>, SimError> {
        entry.validate()?;
        debug!(name = %entry.name, category = %entry.category, "catalog entry registered");

        let name = entry.name.clone();
        let previous = self.entries.insert(name.clone(), entry);
        if previous.is_none() {
            self.order.push(name);
        }
        Ok(previous)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Entries in listing order
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.order.iter().filter_map(|name| self.entries.get(name))
    }

    /// Entries of one shop tab, in listing order
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &CatalogEntry> {
        self.entries().filter(move |e| e.category == category)
    }
}
