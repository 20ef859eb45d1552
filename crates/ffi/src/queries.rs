use reactor_sim_core::{GridCoord, ReactorSimulation, SimError};
use std::ptr;

use crate::error::{DefaultReactorError, ReactorErrorCode};
use crate::helpers::{handle_ffi_result_error, instance_from_ptr, track_error, with_sim};
use crate::instance::ReactorInstance;

#[repr(C)]
/// FFI-friendly snapshot of one grid cell for rendering.
/// Keep this layout stable for C/C++/C# consumers.
pub struct CellState {
    /// Whether an object occupies the cell.
    pub occupied: bool,

    /// Stored heat.
    pub heat: f32,

    /// Heat capacity (the object's max heat), 0 for empty cells and sinks.
    pub capacity: f32,

    /// `heat / capacity`, 0 when capacity is 0.
    pub heat_ratio: f32,

    /// Remaining lifetime fraction (0.0 - 1.0), or -1 for empty cells and
    /// permanent objects.
    pub remaining_time_ratio: f32,
}

impl CellState {
    fn read(sim: &ReactorSimulation, coord: GridCoord) -> Result<Self, SimError> {
        let field = sim.field();
        Ok(Self {
            occupied: sim.is_occupied(coord)?,
            heat: field.heat(coord)?,
            capacity: field.capacity(coord)?,
            heat_ratio: sim.heat_ratio(coord)?,
            remaining_time_ratio: sim.remaining_time_ratio(coord)?.unwrap_or(-1.0),
        })
    }
}

#[repr(C)]
/// FFI-friendly reactor statistics.
pub struct ReactorStats {
    /// Ticks advanced so far.
    pub tick_count: u64,
    /// Simulation time in seconds.
    pub elapsed_seconds: f64,
    /// Cells holding an object.
    pub occupied_cells: u32,
    /// Cells in the grid.
    pub total_cells: u32,
    /// Heat stored across the grid.
    pub total_heat: f32,
    /// Current money balance.
    pub balance: f64,
}

/// Fill `out_cell` with the state of cell (`row`, `col`).
///
/// Returns
/// - `ReactorErrorCode::Ok` (0) on success
/// - `ReactorErrorCode::NullPointer` if `ptr` or `out_cell` is null
/// - `ReactorErrorCode::OutOfBounds` if the coordinate lies outside the grid
///
/// # Safety
/// - `ptr` must be null or a valid pointer returned by `reactor_sim_new`.
/// - `out_cell` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn reactor_sim_get_cell(
    ptr: *const ReactorInstance,
    row: u32,
    col: u32,
    out_cell: *mut CellState,
) -> ReactorErrorCode {
    if out_cell.is_null() {
        return track_error(&DefaultReactorError::null_pointer("out_cell"));
    }

    handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr)? };
        let coord = GridCoord::new(row as usize, col as usize);
        let cell = with_sim(instance, |sim| CellState::read(sim, coord))??;
        unsafe {
            *out_cell = cell;
        }
        Ok::<(), DefaultReactorError>(())
    })
}

/// Map a screen position to a grid cell.
///
/// - `out_found` receives whether the position lies on the grid; `out_row` and
///   `out_col` are only written when it does.
///
/// # Safety
/// - `ptr` must be null or a valid pointer returned by `reactor_sim_new`.
/// - `out_row`, `out_col` and `out_found` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn reactor_sim_cell_at(
    ptr: *const ReactorInstance,
    x: f32,
    y: f32,
    out_row: *mut u32,
    out_col: *mut u32,
    out_found: *mut bool,
) -> ReactorErrorCode {
    if out_row.is_null() || out_col.is_null() || out_found.is_null() {
        return track_error(&DefaultReactorError::null_pointer("out_row/out_col/out_found"));
    }

    handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr)? };
        let cell = with_sim(instance, |sim| sim.cell_at(x, y))?;
        unsafe {
            *out_found = cell.is_some();
            if let Some(coord) = cell {
                *out_row = coord.row as u32;
                *out_col = coord.col as u32;
            }
        }
        Ok::<(), DefaultReactorError>(())
    })
}

/// Fill `out_stats` with the reactor statistics.
///
/// # Safety
/// - `ptr` must be null or a valid pointer returned by `reactor_sim_new`.
/// - `out_stats` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn reactor_sim_get_stats(
    ptr: *const ReactorInstance,
    out_stats: *mut ReactorStats,
) -> ReactorErrorCode {
    if out_stats.is_null() {
        return track_error(&DefaultReactorError::null_pointer("out_stats"));
    }

    handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr)? };
        let stats = with_sim(instance, ReactorSimulation::stats)?;
        unsafe {
            *out_stats = ReactorStats {
                tick_count: stats.tick_count,
                elapsed_seconds: stats.elapsed.value(),
                occupied_cells: stats.occupied_cells as u32,
                total_cells: stats.total_cells as u32,
                total_heat: stats.total_heat,
                balance: stats.balance,
            };
        }
        Ok::<(), DefaultReactorError>(())
    })
}

/// Return a borrowed pointer to a row-major snapshot of every cell's heat ratio.
///
/// Reuses an internal buffer protected by a Mutex, so the returned pointer is
/// valid until the next call to this function. **DO NOT FREE THIS POINTER**.
///
/// Returns
/// - `ReactorErrorCode::Ok` (0) with the array in `out_array` and its length in `out_len`
/// - `ReactorErrorCode::NullPointer` if `ptr`, `out_len` or `out_array` is null
/// - `ReactorErrorCode::LockPoisoned` if an internal lock is poisoned
///
/// # Safety
/// - `ptr` must be null or a valid pointer returned by `reactor_sim_new`.
/// - `out_len` and `out_array` must be null or valid for writes.
///
/// # Example Usage (C++)
/// ```cpp
/// uintptr_t len = 0;
/// const float* ratios = nullptr;
/// if (reactor_sim_get_heat_ratios(sim, &len, &ratios) == ReactorErrorCode::Ok) {
///     for (uintptr_t i = 0; i < len; i++) {
///         // Use ratios[i] - no need to free
///     }
/// }
/// ```
#[no_mangle]
pub unsafe extern "C" fn reactor_sim_get_heat_ratios(
    ptr: *const ReactorInstance,
    out_len: *mut usize,
    out_array: *mut *const f32,
) -> ReactorErrorCode {
    if out_len.is_null() {
        return track_error(&DefaultReactorError::null_pointer("out_len"));
    }
    if out_array.is_null() {
        unsafe {
            *out_len = 0;
        }
        return track_error(&DefaultReactorError::null_pointer("out_array"));
    }

    let result = handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr)? };
        let mut snapshot = instance
            .heat_snapshot
            .lock()
            .map_err(|_| DefaultReactorError::lock_poisoned("heat_snapshot"))?;
        snapshot.clear();
        with_sim(instance, |sim| snapshot.extend(sim.heat_ratios()))?;

        unsafe {
            *out_len = snapshot.len();
            *out_array = snapshot.as_ptr();
        }
        Ok::<(), DefaultReactorError>(())
    });

    // Set to null on error (per documentation contract)
    if result != ReactorErrorCode::Ok {
        unsafe {
            *out_array = ptr::null();
            *out_len = 0;
        }
    }

    result
}
