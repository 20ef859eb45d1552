use reactor_sim_core::SimError;
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Common interface for FFI error types.
///
/// - `code()` - Returns the error code to be passed across FFI boundary
/// - `msg()` - Returns the error message for diagnostic purposes
pub(crate) trait ReactorError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> ReactorErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `ReactorError` for FFI failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultReactorError {
    code: ReactorErrorCode,
    msg: String,
}

impl DefaultReactorError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out_instance"`, `"ptr"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: ReactorErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for poisoned lock.
    ///
    /// # Arguments
    /// * `lock_name` - The name of the lock that was poisoned (e.g., `"sim"`, `"heat_snapshot"`)
    pub fn lock_poisoned(lock_name: &str) -> Self {
        Self {
            code: ReactorErrorCode::LockPoisoned,
            msg: format!("Lock '{lock_name}' was poisoned by a panic in another thread"),
        }
    }

    /// Create error for invalid parameter.
    ///
    /// # Arguments
    /// * `message` - Description of the error
    pub fn invalid_parameter(message: String) -> Self {
        Self {
            code: ReactorErrorCode::InvalidParameter,
            msg: message,
        }
    }
}

impl From<SimError> for DefaultReactorError {
    fn from(error: SimError) -> Self {
        let code = match error {
            SimError::OutOfBounds { .. } => ReactorErrorCode::OutOfBounds,
            SimError::InvalidState(_) => ReactorErrorCode::InvalidState,
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

impl ReactorError for DefaultReactorError {
    fn code(&self) -> ReactorErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by reactor simulation functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactorErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Lock poisoned: internal synchronization primitive was poisoned by a panic.
    LockPoisoned = 2,

    /// Invalid parameter passed to function (bad config, non-UTF-8 name).
    InvalidParameter = 3,

    /// Grid coordinate outside the reactor.
    OutOfBounds = 4,

    /// Simulation contract violation (negative time step, corrupt state).
    InvalidState = 5,
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    /// The CString is stored to keep the pointer handed out by
    /// `reactor_sim_get_last_error` alive.
    static LAST_ERROR: RefCell<(Option<CString>, ReactorErrorCode)> = const { RefCell::new((None, ReactorErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, ReactorErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, ReactorErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if an error occurred.
/// - `null` if the last call on this thread succeeded.
///
/// # Thread Safety
/// Error messages are stored per-thread, so each thread has its own independent
/// error state.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread that
/// sets or clears the error, or until the thread terminates.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```cpp
/// ReactorInstance* sim = nullptr;
/// ReactorErrorCode err = reactor_sim_new(reactor_sim_default_config(), &sim);
/// if (err != ReactorErrorCode::Ok) {
///     const char* error = reactor_sim_get_last_error();
///     if (error) {
///         printf("Reactor creation failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn reactor_sim_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code.
///
/// Returns:
/// - `ReactorErrorCode::Ok` (0) if the last call on this thread succeeded
/// - The specific error code from the last failed operation
#[no_mangle]
pub extern "C" fn reactor_sim_get_last_error_code() -> ReactorErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
