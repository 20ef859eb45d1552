use reactor_sim_core::{GridCoord, PurchaseOutcome};
use std::ffi::CStr;
use std::os::raw::c_char;

use crate::error::{DefaultReactorError, ReactorErrorCode};
use crate::helpers::{handle_ffi_result_error, instance_from_ptr, track_error, with_sim_mut};
use crate::instance::ReactorInstance;

/// C-compatible result of `reactor_sim_buy`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactorPurchaseOutcome {
    /// Object placed and its cost debited.
    Placed = 0,
    /// No catalog entry with that name.
    UnknownItem = 1,
    /// Balance below the entry's cost.
    InsufficientFunds = 2,
    /// Cell occupied or outside the grid.
    CellUnavailable = 3,
}

impl From<PurchaseOutcome> for ReactorPurchaseOutcome {
    fn from(outcome: PurchaseOutcome) -> Self {
        match outcome {
            PurchaseOutcome::Placed => Self::Placed,
            PurchaseOutcome::UnknownItem => Self::UnknownItem,
            PurchaseOutcome::InsufficientFunds => Self::InsufficientFunds,
            PurchaseOutcome::CellUnavailable => Self::CellUnavailable,
        }
    }
}

/// Buy the catalog item `name` and place it at (`row`, `col`).
///
/// The outcome of the purchase is a routine game state, reported via
/// `out_outcome`; the return code only signals caller errors.
///
/// Returns
/// - `ReactorErrorCode::Ok` (0) with `out_outcome` set
/// - `ReactorErrorCode::NullPointer` if `ptr`, `name` or `out_outcome` is null
/// - `ReactorErrorCode::InvalidParameter` if `name` is not valid UTF-8
/// - `ReactorErrorCode::LockPoisoned` if the simulation lock is poisoned
///
/// # Safety
/// - `ptr` must be null or a valid pointer returned by `reactor_sim_new`.
/// - `name` must be null or a valid null-terminated C string.
/// - `out_outcome` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn reactor_sim_buy(
    ptr: *const ReactorInstance,
    row: u32,
    col: u32,
    name: *const c_char,
    out_outcome: *mut ReactorPurchaseOutcome,
) -> ReactorErrorCode {
    if out_outcome.is_null() {
        return track_error(&DefaultReactorError::null_pointer("out_outcome"));
    }
    if name.is_null() {
        return track_error(&DefaultReactorError::null_pointer("name"));
    }

    handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr)? };
        let name = unsafe { CStr::from_ptr(name) }.to_str().map_err(|err| {
            DefaultReactorError::invalid_parameter(format!("item name is not UTF-8: {err}"))
        })?;
        let coord = GridCoord::new(row as usize, col as usize);

        let outcome = with_sim_mut(instance, |sim| sim.buy(coord, name))?;
        unsafe {
            *out_outcome = outcome.into();
        }
        Ok::<(), DefaultReactorError>(())
    })
}

/// Remove the object at (`row`, `col`), zeroing its thermal state.
///
/// - `out_removed` (optional) receives whether an object was removed. If null, ignored.
///
/// Returns
/// - `ReactorErrorCode::Ok` (0) on success, including when the cell was empty
/// - `ReactorErrorCode::NullPointer` if `ptr` is null
/// - `ReactorErrorCode::OutOfBounds` if the coordinate lies outside the grid
/// - `ReactorErrorCode::LockPoisoned` if the simulation lock is poisoned
///
/// # Safety
/// - `ptr` must be null or a valid pointer returned by `reactor_sim_new`.
/// - `out_removed` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn reactor_sim_remove(
    ptr: *const ReactorInstance,
    row: u32,
    col: u32,
    out_removed: *mut bool,
) -> ReactorErrorCode {
    handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr)? };
        let coord = GridCoord::new(row as usize, col as usize);

        let removed = with_sim_mut(instance, |sim| {
            sim.is_occupied(coord)?;
            Ok::<bool, reactor_sim_core::SimError>(sim.remove(coord).is_some())
        })??;

        if !out_removed.is_null() {
            unsafe {
                *out_removed = removed;
            }
        }
        Ok::<(), DefaultReactorError>(())
    })
}
