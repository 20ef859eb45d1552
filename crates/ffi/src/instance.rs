use reactor_sim_core::{
    Catalog, DiffusionParams, GridLayout, ReactorSimulation, SimulationConfig,
};
use std::ptr;
use std::sync::{Mutex, RwLock};

use crate::error::{DefaultReactorError, ReactorErrorCode};
use crate::helpers::{track_error, track_result};

/// C-compatible reactor configuration.
///
/// Obtain defaults from `reactor_sim_default_config()` and override fields as needed.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReactorConfig {
    /// Grid rows (must be > 0)
    pub rows: u32,
    /// Grid columns (must be > 0)
    pub cols: u32,
    /// Screen x of the grid's top-left corner (pixels)
    pub origin_x: f32,
    /// Screen y of the grid's top-left corner (pixels)
    pub origin_y: f32,
    /// Edge length of one cell (pixels, must be > 0)
    pub cell_size: f32,
    /// Per-tick transfer cap as a fraction of the smaller capacity.
    /// Values `<= 0` disable the cap.
    pub stability_fraction: f32,
    /// Money available at start
    pub starting_balance: f64,
}

impl From<SimulationConfig> for ReactorConfig {
    fn from(config: SimulationConfig) -> Self {
        Self {
            // Validated grids stay within `MAX_CELLS`, which fits in u32;
            // anything larger saturates so it is still rejected on the way back.
            rows: u32::try_from(config.rows).unwrap_or(u32::MAX),
            cols: u32::try_from(config.cols).unwrap_or(u32::MAX),
            origin_x: config.layout.origin_x,
            origin_y: config.layout.origin_y,
            cell_size: config.layout.cell_size,
            stability_fraction: config.diffusion.stability_fraction.unwrap_or(0.0),
            starting_balance: config.starting_balance,
        }
    }
}

impl From<ReactorConfig> for SimulationConfig {
    fn from(config: ReactorConfig) -> Self {
        let diffusion = if config.stability_fraction > 0.0 {
            DiffusionParams::with_stability_fraction(config.stability_fraction)
        } else {
            DiffusionParams::unbounded()
        };
        Self {
            rows: config.rows as usize,
            cols: config.cols as usize,
            layout: GridLayout {
                origin_x: config.origin_x,
                origin_y: config.origin_y,
                cell_size: config.cell_size,
            },
            diffusion,
            starting_balance: config.starting_balance,
        }
    }
}

/// The reactor simulation context handed to the host engine.
///
/// # Thread Safety
/// The simulation is protected by an `RwLock`:
/// - **Multiple concurrent readers** (cell and stats queries): `.read()` lock
/// - **Exclusive writer** (advance, buy, remove): `.write()` lock
///
/// Queries are frequent and ticks happen once per frame, so readers rarely block.
pub struct ReactorInstance {
    pub(crate) sim: RwLock<ReactorSimulation>,
    /// Cached heat-ratio snapshot reused across calls to
    /// `reactor_sim_get_heat_ratios` to avoid per-frame allocations.
    pub(crate) heat_snapshot: Mutex<Vec<f32>>,
}

impl ReactorInstance {
    /// Creates a reactor with the stock catalog.
    ///
    /// # Errors
    ///
    /// Returns `ReactorErrorCode::InvalidParameter` if the configuration is rejected.
    pub(crate) fn new(config: ReactorConfig) -> Result<Self, DefaultReactorError> {
        let config = SimulationConfig::from(config);
        let cells = config.rows.saturating_mul(config.cols);
        let sim = ReactorSimulation::new(config, Catalog::standard())
            .map_err(|err| DefaultReactorError::invalid_parameter(err.to_string()))?;

        Ok(Self {
            sim: RwLock::new(sim),
            heat_snapshot: Mutex::new(Vec::with_capacity(cells)),
        })
    }
}

/// Default reactor configuration: 10x10 grid at (450, 50) with 50 px cells,
/// stability fraction 0.25 and a starting balance of 500 000.
#[no_mangle]
pub extern "C" fn reactor_sim_default_config() -> ReactorConfig {
    ReactorConfig::from(SimulationConfig::default())
}

/// Create a new reactor and return it via out-parameter.
///
/// Returns
/// - `ReactorErrorCode::Ok` (0) - success, `out_instance` contains a valid pointer
/// - `ReactorErrorCode::NullPointer` - `out_instance` is null
/// - `ReactorErrorCode::InvalidParameter` - the configuration was rejected
///
/// Call `reactor_sim_get_last_error()` for a human-readable description.
///
/// # Safety
///
/// - `out_instance` must be a valid, non-null pointer to writable memory.
/// - The caller takes ownership of the returned instance and MUST call
///   `reactor_sim_destroy` exactly once.
///
/// Example (C++)
/// ```cpp
/// ReactorInstance* sim = nullptr;
/// ReactorErrorCode err = reactor_sim_new(reactor_sim_default_config(), &sim);
/// if (err != ReactorErrorCode::Ok) {
///     fprintf(stderr, "Failed to create reactor: %s\n", reactor_sim_get_last_error());
///     return;
/// }
/// // ... use sim ...
/// reactor_sim_destroy(sim);
/// ```
#[no_mangle]
pub unsafe extern "C" fn reactor_sim_new(
    config: ReactorConfig,
    out_instance: *mut *mut ReactorInstance,
) -> ReactorErrorCode {
    if out_instance.is_null() {
        return track_error(&DefaultReactorError::null_pointer("out_instance"));
    }

    match track_result(ReactorInstance::new(config)) {
        Ok(instance) => {
            unsafe {
                *out_instance = Box::into_raw(Box::new(instance));
            }
            ReactorErrorCode::Ok
        }
        Err(code) => {
            unsafe {
                // Set to null on error (per documentation contract)
                *out_instance = ptr::null_mut();
            }
            code
        }
    }
}

/// Destroys a reactor previously created by `reactor_sim_new`.
///
/// If `ptr` is null, this function is a no-op.
///
/// # Safety
/// - The pointer MUST have been created by `reactor_sim_new`.
/// - The pointer MUST NOT have been freed already.
/// - After calling this function, the caller must not use the pointer again.
#[no_mangle]
pub unsafe extern "C" fn reactor_sim_destroy(ptr: *mut ReactorInstance) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: The pointer was created by `Box::into_raw` in `reactor_sim_new`
    // and has not been freed.
    unsafe {
        drop(Box::from_raw(ptr));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReactorError;
    use reactor_sim_core::MAX_CELLS;

    #[test]
    fn test_default_config_round_trips() {
        let config = reactor_sim_default_config();
        assert_eq!((config.rows, config.cols), (10, 10));
        assert_eq!(config.stability_fraction, 0.25);
        assert_eq!(SimulationConfig::from(config), SimulationConfig::default());
    }

    #[test]
    fn test_large_dimensions_saturate_instead_of_truncating() {
        let huge = SimulationConfig {
            rows: usize::MAX,
            ..SimulationConfig::default()
        };
        let config = ReactorConfig::from(huge);
        assert_eq!(config.rows, u32::MAX);
        assert!(SimulationConfig::from(config).validate().is_err());
    }

    #[test]
    fn test_oversized_grid_is_rejected() {
        let config = ReactorConfig {
            rows: u32::MAX,
            cols: u32::MAX,
            ..reactor_sim_default_config()
        };
        let err = ReactorInstance::new(config).err().unwrap();
        assert_eq!(err.code(), ReactorErrorCode::InvalidParameter);

        let one_too_many = ReactorConfig {
            rows: 1,
            cols: MAX_CELLS as u32 + 1,
            ..reactor_sim_default_config()
        };
        assert!(ReactorInstance::new(one_too_many).is_err());
    }
}
