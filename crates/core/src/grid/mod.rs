//! Reactor grid occupancy and screen layout

mod layout;
mod occupancy;

// Re-export main types
pub use layout::GridLayout;
pub use occupancy::{OccupancyGrid, PlacedObject};
