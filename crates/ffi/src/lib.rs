//! C ABI for the reactor thermal simulation
//!
//! Exposes [`reactor_sim_core::ReactorSimulation`] behind an opaque
//! `ReactorInstance` pointer. Every fallible call returns a
//! [`ReactorErrorCode`]; the message for the last failure on the calling thread
//! is available from [`reactor_sim_get_last_error`]. A C header is generated into
//! the repository root by the build script.
//!
//! Typical host loop (C++):
//!
//! ```cpp
//! ReactorConfig config = reactor_sim_default_config();
//! ReactorInstance* sim = nullptr;
//! reactor_sim_new(config, &sim);
//!
//! ReactorPurchaseOutcome outcome;
//! reactor_sim_buy(sim, 4, 4, "uranium_rod", &outcome);
//!
//! while (running) {
//!     uint32_t removed = 0;
//!     reactor_sim_advance(sim, frame_seconds, &removed);
//! }
//! reactor_sim_destroy(sim);
//! ```

mod error;
mod helpers;
mod instance;
mod placement;
mod queries;
mod simulation;

pub use error::{reactor_sim_get_last_error, reactor_sim_get_last_error_code, ReactorErrorCode};
pub use instance::{
    reactor_sim_default_config, reactor_sim_destroy, reactor_sim_new, ReactorConfig,
    ReactorInstance,
};
pub use placement::{reactor_sim_buy, reactor_sim_remove, ReactorPurchaseOutcome};
pub use queries::{
    reactor_sim_cell_at, reactor_sim_get_cell, reactor_sim_get_heat_ratios, reactor_sim_get_stats,
    CellState, ReactorStats,
};
pub use simulation::reactor_sim_advance;
