//! FFI (Foreign Function Interface) for editors embedding minslide
//!
//! The editor owns the timeline and exposes it as an [`FfiHost`] callback
//! table; minslide owns the session state behind an opaque pointer.

use crate::error::ErrorCode;
use crate::host::callback::{CallbackHost, FfiHost};
use crate::{logging, Error, Result, SlideShowSession, SlideShowSettings};
use libc::{c_char, size_t};
use std::ffi::{CStr, CString};
use std::ptr;

/// FFI result structure
#[repr(C)]
pub struct FfiResult {
    pub code: ErrorCode,
    pub message: *mut c_char,
}

impl FfiResult {
    fn ok() -> Self {
        Self {
            code: ErrorCode::Ok,
            message: ptr::null_mut(),
        }
    }

    fn error(code: ErrorCode, message: &str) -> Self {
        let message = CString::new(message.replace('\0', " "))
            .map(CString::into_raw)
            .unwrap_or(ptr::null_mut());
        Self { code, message }
    }

    fn from_error(err: &Error) -> Self {
        Self::error(ErrorCode::from(err), &err.to_string())
    }
}

/// Run `op` with the session and a host view of `host`, writing its value to `out`
///
/// # Safety
/// - `session` must be null or a pointer returned by `minslide_session_new`
/// - `host` must be null or point to a valid `FfiHost`
/// - `out` must be null or valid for writes
unsafe fn run<T>(
    session: *mut SlideShowSession,
    host: *const FfiHost,
    out: *mut T,
    op: impl FnOnce(&mut SlideShowSession, &mut CallbackHost<'_>) -> Result<T>,
) -> FfiResult {
    if session.is_null() {
        return FfiResult::error(ErrorCode::InvalidInput, "Session is null");
    }
    if host.is_null() {
        return FfiResult::error(ErrorCode::InvalidInput, "Host is null");
    }

    let session = &mut *session;
    let mut host = CallbackHost::new(&*host);

    match op(session, &mut host) {
        Ok(value) => {
            if !out.is_null() {
                *out = value;
            }
            FfiResult::ok()
        }
        Err(e) => FfiResult::from_error(&e),
    }
}

/// Parse a settings document, null meaning defaults
///
/// # Safety
/// - `settings_json` must be a valid null-terminated string or null
unsafe fn parse_settings(settings_json: *const c_char) -> Result<SlideShowSettings> {
    if settings_json.is_null() {
        return Ok(SlideShowSettings::default());
    }

    let json = CStr::from_ptr(settings_json)
        .to_str()
        .map_err(|_| Error::InvalidInput("Settings are not valid UTF-8".to_string()))?;
    SlideShowSettings::from_json(json)
}

/// Create a new session
///
/// Free it with `minslide_session_free`.
#[no_mangle]
pub extern "C" fn minslide_session_new() -> *mut SlideShowSession {
    Box::into_raw(Box::new(SlideShowSession::new()))
}

/// Free a session
///
/// # Safety
/// - `session` must be null or a pointer returned by `minslide_session_new`
#[no_mangle]
pub unsafe extern "C" fn minslide_session_free(session: *mut SlideShowSession) {
    if !session.is_null() {
        drop(Box::from_raw(session));
    }
}

/// Build the clip registry, splitting a lone image strip first
///
/// # Safety
/// - `session` must be a pointer returned by `minslide_session_new`
/// - `host` must point to a valid `FfiHost`
/// - `out_count` must be null or valid for writes
#[no_mangle]
pub unsafe extern "C" fn minslide_initialize(
    session: *mut SlideShowSession,
    host: *const FfiHost,
    out_count: *mut size_t,
) -> FfiResult {
    run(session, host, out_count, |session, host| {
        session.initialize(host)
    })
}

/// Advance the playhead one frame
///
/// # Safety
/// See `minslide_initialize`; `out_frame` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn minslide_next_frame(
    session: *mut SlideShowSession,
    host: *const FfiHost,
    out_frame: *mut i64,
) -> FfiResult {
    run(session, host, out_frame, |session, host| {
        session.next_frame(host)
    })
}

/// Step the playhead back one frame, stopping at frame 1
///
/// # Safety
/// See `minslide_initialize`; `out_frame` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn minslide_prev_frame(
    session: *mut SlideShowSession,
    host: *const FfiHost,
    out_frame: *mut i64,
) -> FfiResult {
    run(session, host, out_frame, |session, host| {
        session.prev_frame(host)
    })
}

/// Rotate the clip under the playhead a quarter turn counter-clockwise
///
/// # Safety
/// See `minslide_initialize`.
#[no_mangle]
pub unsafe extern "C" fn minslide_rotate_left(
    session: *mut SlideShowSession,
    host: *const FfiHost,
) -> FfiResult {
    run(session, host, ptr::null_mut(), |session, host| {
        session.rotate_left(host).map(|_| ())
    })
}

/// Rotate the clip under the playhead a quarter turn clockwise
///
/// # Safety
/// See `minslide_initialize`.
#[no_mangle]
pub unsafe extern "C" fn minslide_rotate_right(
    session: *mut SlideShowSession,
    host: *const FfiHost,
) -> FfiResult {
    run(session, host, ptr::null_mut(), |session, host| {
        session.rotate_right(host).map(|_| ())
    })
}

/// Fit every image clip into the output frame
///
/// # Safety
/// See `minslide_initialize`; `out_count` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn minslide_fix_scale(
    session: *mut SlideShowSession,
    host: *const FfiHost,
    out_count: *mut size_t,
) -> FfiResult {
    run(session, host, out_count, |session, host| {
        session.fix_scale(host)
    })
}

/// Lay out the slide show with transitions and configure the export
///
/// `settings_json` is a settings document (null for defaults). On success
/// the last rendered frame is written to `out_frame_end`.
///
/// # Safety
/// See `minslide_initialize`; `settings_json` must be a valid
/// null-terminated string or null, `out_frame_end` null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn minslide_finish(
    session: *mut SlideShowSession,
    host: *const FfiHost,
    settings_json: *const c_char,
    out_frame_end: *mut i64,
) -> FfiResult {
    let settings = match parse_settings(settings_json) {
        Ok(settings) => settings,
        Err(e) => return FfiResult::from_error(&e),
    };

    run(session, host, out_frame_end, |session, host| {
        session.finish(host, &settings).map(|plan| plan.frame_end)
    })
}

/// Stretch the slides without transitions and configure the export
///
/// # Safety
/// Same as `minslide_finish`.
#[no_mangle]
pub unsafe extern "C" fn minslide_finish_stretched(
    session: *mut SlideShowSession,
    host: *const FfiHost,
    settings_json: *const c_char,
    out_frame_end: *mut i64,
) -> FfiResult {
    let settings = match parse_settings(settings_json) {
        Ok(settings) => settings,
        Err(e) => return FfiResult::from_error(&e),
    };

    run(session, host, out_frame_end, |session, host| {
        session
            .finish_stretched(host, &settings)
            .map(|plan| plan.frame_end)
    })
}

/// Install a log subscriber writing to stderr, filtered by `RUST_LOG`
#[no_mangle]
pub extern "C" fn minslide_init_logging() {
    logging::init();
}

/// Free a result's message string
///
/// # Safety
/// - `result` must point to a valid `FfiResult` that was returned by a minslide function
#[no_mangle]
pub unsafe extern "C" fn minslide_free_result(result: *mut FfiResult) {
    if result.is_null() {
        return;
    }

    let result = &mut *result;
    if !result.message.is_null() {
        // Reclaim the CString and let it drop
        let _ = CString::from_raw(result.message);
        result.message = ptr::null_mut();
    }
}

/// Get version string
#[no_mangle]
pub extern "C" fn minslide_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
