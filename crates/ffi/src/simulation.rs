use crate::error::{DefaultReactorError, ReactorErrorCode};
use crate::helpers::{handle_ffi_result_error, instance_from_ptr, with_sim_mut};
use crate::instance::ReactorInstance;

/// Advance the reactor by `dt` seconds: diffusion, then expiry/overheat removal
/// and income.
///
/// Thread-safe: acquires the `RwLock` write lock for the tick.
///
/// - `out_removed` (optional) receives the number of objects removed this tick.
///   If null, ignored.
///
/// Returns
/// - `ReactorErrorCode::Ok` (0) on success
/// - `ReactorErrorCode::NullPointer` if `ptr` is null
/// - `ReactorErrorCode::InvalidState` if `dt` is negative or non-finite
/// - `ReactorErrorCode::LockPoisoned` if the simulation lock is poisoned
///
/// # Safety
/// - `ptr` must be null or a valid pointer returned by `reactor_sim_new`.
/// - `out_removed` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn reactor_sim_advance(
    ptr: *const ReactorInstance,
    dt: f64,
    out_removed: *mut u32,
) -> ReactorErrorCode {
    handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr)? };
        let report = with_sim_mut(instance, |sim| sim.advance(dt))??;

        if !out_removed.is_null() {
            unsafe {
                *out_removed = report.removals.len() as u32;
            }
        }

        Ok::<(), DefaultReactorError>(())
    })
}
