// Sat Oct 17 2026 - Alex

//! C ABI over a process-wide [`PatternRegistry`].
//!
//! Every entry point returns `0` on success and `-1` on failure, in which case
//! the failure code is kept until the next failing call and can be read back
//! with [`getLastError`]. Calls must not overlap: the registry and the error
//! slot are shared by the whole process.

#![allow(non_snake_case)]

use crate::config::ScannerConfig;
use crate::pattern::{BestMatch, ErrorCode, PatternHandle, PatternRegistry, ScanError};
use crate::utils::logging::LoggingUtils;
use libc::{c_char, c_int};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::ffi::CStr;
use std::sync::atomic::{AtomicI32, Ordering};

/// Capacity of the buffer behind [`getLastError`], terminator included.
pub const MAX_ERROR_MESSAGE_LEN: usize = 90;

static REGISTRY: Lazy<Mutex<PatternRegistry>> = Lazy::new(|| Mutex::new(PatternRegistry::new()));
static LAST_ERROR_CODE: AtomicI32 = AtomicI32::new(0);
static ERROR_MESSAGE: Mutex<[u8; MAX_ERROR_MESSAGE_LEN]> = parking_lot::const_mutex([0; MAX_ERROR_MESSAGE_LEN]);

pub fn last_error_code() -> i32 {
    LAST_ERROR_CODE.load(Ordering::Relaxed)
}

pub fn record_error(code: ErrorCode) {
    LAST_ERROR_CODE.store(code.as_i32(), Ordering::Relaxed);
}

fn fail(err: ScanError) -> c_int {
    log::debug!("FFI call failed: {}", err);
    record_error(err.code());
    -1
}

fn invalid_argument(what: &str) -> c_int {
    fail(ScanError::InvalidArgument(what.to_string()))
}

/// Text for the most recent failure code.
///
/// The returned NUL-terminated string lives in a buffer that the next call
/// overwrites; copy it out before calling again.
#[no_mangle]
pub extern "C" fn getLastError() -> *const c_char {
    let message = ErrorCode::describe(last_error_code()).as_bytes();
    let mut buffer = ERROR_MESSAGE.lock();
    let len = message.len().min(MAX_ERROR_MESSAGE_LEN - 1);
    buffer[..len].copy_from_slice(&message[..len]);
    buffer[len] = 0;
    buffer.as_ptr() as *const c_char
}

/// # Safety
///
/// `pattern` must point to a NUL-terminated string and `regex_ptr` to
/// writable storage for one `usize`.
#[no_mangle]
pub unsafe extern "C" fn compilePattern(pattern: *const c_char, regex_ptr: *mut usize) -> c_int {
    if pattern.is_null() || regex_ptr.is_null() {
        return invalid_argument("null pointer passed to compilePattern");
    }

    let source = CStr::from_ptr(pattern).to_bytes();
    match REGISTRY.lock().compile_bytes(source) {
        Ok(handle) => {
            *regex_ptr = handle.to_raw();
            0
        }
        Err(e) => fail(e),
    }
}

/// # Safety
///
/// `patterns` must point to `pattern_count` handles written by [`compilePattern`].
#[no_mangle]
pub unsafe extern "C" fn disposeCompiledPatterns(patterns: *const usize, pattern_count: c_int) -> c_int {
    let Some(raw) = raw_slice(patterns, pattern_count) else {
        return invalid_argument("bad pattern list passed to disposeCompiledPatterns");
    };

    let handles: Vec<PatternHandle> = raw.iter().filter_map(|&r| PatternHandle::from_raw(r)).collect();
    REGISTRY.lock().dispose(&handles);
    0
}

/// Writes `[winning index, offsets address, offsets length]` to `result_info`.
///
/// No match writes `[0, 0, 0]` and still returns `0`. A non-null offsets
/// buffer belongs to the caller and must be released with [`freeBestMatch`].
///
/// # Safety
///
/// `patterns` must point to `pattern_count` handles, `utf8_string` to
/// `str_len` readable bytes, and `result_info` to three writable `usize`s.
#[no_mangle]
pub unsafe extern "C" fn findBestMatch(
    patterns: *const usize,
    pattern_count: c_int,
    utf8_string: *const u8,
    str_len: c_int,
    start_offset: c_int,
    result_info: *mut usize,
) -> c_int {
    if result_info.is_null() {
        return invalid_argument("null result buffer passed to findBestMatch");
    }
    let Some(raw) = raw_slice(patterns, pattern_count) else {
        return invalid_argument("bad pattern list passed to findBestMatch");
    };
    let Some(haystack) = raw_slice(utf8_string, str_len) else {
        return invalid_argument("bad haystack passed to findBestMatch");
    };

    let Some(handles) = raw.iter().map(|&r| PatternHandle::from_raw(r)).collect::<Option<Vec<_>>>() else {
        return fail(ScanError::InvalidArgument("null pattern handle".to_string()));
    };

    let best = match REGISTRY.lock().find_best_match(&handles, haystack, start_offset.max(0) as usize) {
        Ok(best) => best,
        Err(e) => return fail(e),
    };

    let (index, buffer, len) = best.into_raw_parts();
    let info = std::slice::from_raw_parts_mut(result_info, 3);
    info[0] = index;
    info[1] = buffer as usize;
    info[2] = len;
    0
}

/// # Safety
///
/// `buffer` and `len` must be the address and length written by one
/// successful [`findBestMatch`] call, released at most once.
#[no_mangle]
pub unsafe extern "C" fn freeBestMatch(buffer: *mut usize, len: usize) {
    BestMatch::free_raw(buffer, len);
}

/// Replaces the engine settings used by later [`compilePattern`] calls and
/// installs a logger at the configured level.
///
/// # Safety
///
/// `json` must point to a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn configureScanner(json: *const c_char) -> c_int {
    if json.is_null() {
        return invalid_argument("null pointer passed to configureScanner");
    }
    let Ok(json) = CStr::from_ptr(json).to_str() else {
        return fail(ScanError::Config("configuration is not valid UTF-8".to_string()));
    };

    let config = match ScannerConfig::from_json(json) {
        Ok(config) => config,
        Err(e) => return fail(ScanError::Config(e)),
    };

    LoggingUtils::init_from_level_name(&config.log_level);
    REGISTRY.lock().reconfigure(&config);
    log::debug!("Scanner reconfigured: {:?}", config);
    0
}

unsafe fn raw_slice<'a, T>(ptr: *const T, len: c_int) -> Option<&'a [T]> {
    if len < 0 {
        return None;
    }
    if len == 0 {
        return Some(&[]);
    }
    if ptr.is_null() {
        return None;
    }
    Some(std::slice::from_raw_parts(ptr, len as usize))
}
