//! Core types and utilities

pub mod coord;
pub mod error;
pub mod units;

pub use coord::{GridCoord, NEIGHBORS_4, NEIGHBORS_8};
pub use error::SimError;
pub use units::Seconds;
