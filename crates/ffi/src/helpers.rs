use crate::error::{with_last_error_mut, DefaultReactorError, ReactorError, ReactorErrorCode};
use crate::instance::ReactorInstance;
use reactor_sim_core::ReactorSimulation;
use std::ffi::CString;

/// Set the thread-local error message and code.
/// Accepts any type implementing `ReactorError` trait.
pub(crate) fn set_last_error(error: &impl ReactorError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
#[inline]
pub(crate) fn track_error(error: &impl ReactorError) -> ReactorErrorCode {
    set_last_error(error);
    error.code()
}

/// Clear the thread-local error message and code.
/// Called on successful operations.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = ReactorErrorCode::Ok;
    });
}

/// Record the outcome of `result` and reduce its error to a code.
pub(crate) fn track_result<T>(
    result: Result<T, DefaultReactorError>,
) -> Result<T, ReactorErrorCode> {
    match result {
        Ok(value) => {
            clear_last_error();
            Ok(value)
        }
        Err(error) => Err(track_error(&error)),
    }
}

/// Run an FFI body and translate its result into an error code.
pub(crate) fn handle_ffi_result_error<F>(body: F) -> ReactorErrorCode
where
    F: FnOnce() -> Result<(), DefaultReactorError>,
{
    match track_result(body()) {
        Ok(()) => ReactorErrorCode::Ok,
        Err(code) => code,
    }
}

/// Borrow the instance behind a pointer handed out by `reactor_sim_new`.
///
/// # Safety
/// `ptr` must be null or a live pointer returned by `reactor_sim_new`.
pub(crate) unsafe fn instance_from_ptr<'a>(
    ptr: *const ReactorInstance,
) -> Result<&'a ReactorInstance, DefaultReactorError> {
    unsafe { ptr.as_ref() }.ok_or_else(|| DefaultReactorError::null_pointer("ptr"))
}

/// Run `func` under the simulation read lock.
pub(crate) fn with_sim<F, R>(instance: &ReactorInstance, func: F) -> Result<R, DefaultReactorError>
where
    F: FnOnce(&ReactorSimulation) -> R,
{
    let sim = instance
        .sim
        .read()
        .map_err(|_| DefaultReactorError::lock_poisoned("sim"))?;
    Ok(func(&sim))
}

/// Run `func` under the simulation write lock.
pub(crate) fn with_sim_mut<F, R>(
    instance: &ReactorInstance,
    func: F,
) -> Result<R, DefaultReactorError>
where
    F: FnOnce(&mut ReactorSimulation) -> R,
{
    let mut sim = instance
        .sim
        .write()
        .map_err(|_| DefaultReactorError::lock_poisoned("sim"))?;
    Ok(func(&mut sim))
}
