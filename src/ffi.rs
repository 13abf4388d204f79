//! FFI bindings for Trackk Flux
//!
//! This module provides C-compatible functions for calling Flux from the
//! capture app. All functions use C strings (null-terminated) and return
//! allocated memory that must be freed by the caller using `trackk_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::pipeline::{frames_to_feedback_json, JumpingJackProcessor};

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Set the last error message
fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clear the last error message
fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

// ============================================================================
// Stateless API
// ============================================================================

/// Score a JSON array of frames with default settings and return payload JSON.
///
/// # Safety
/// - `frames_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `trackk_free_string`.
/// - Returns NULL on error; call `trackk_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn trackk_frames_to_feedback(frames_json: *const c_char) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(frames_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    match frames_to_feedback_json(json_str) {
        Ok(payload) => string_to_cstr(&payload),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Stateful Processor API
// ============================================================================

/// Opaque handle to a JumpingJackProcessor
pub struct TrackkProcessorHandle {
    processor: JumpingJackProcessor,
}

/// Create a new processor with default configuration.
///
/// # Safety
/// - Returns a pointer to a newly allocated processor.
/// - Must be freed with `trackk_processor_free`.
#[no_mangle]
pub unsafe extern "C" fn trackk_processor_new(include_series: bool) -> *mut TrackkProcessorHandle {
    clear_last_error();

    let processor = JumpingJackProcessor::new().with_series(include_series);
    let handle = Box::new(TrackkProcessorHandle { processor });
    Box::into_raw(handle)
}

/// Free a processor.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `trackk_processor_new`.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn trackk_processor_free(processor: *mut TrackkProcessorHandle) {
    if !processor.is_null() {
        drop(Box::from_raw(processor));
    }
}

/// Score a JSON array of frames with a processor.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `trackk_processor_new`.
/// - `frames_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `trackk_free_string`.
/// - Returns NULL on error; call `trackk_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn trackk_processor_analyze(
    processor: *mut TrackkProcessorHandle,
    frames_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return ptr::null_mut();
    }

    let handle = &*processor;

    let json_str = match cstr_to_string(frames_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    match handle.processor.process_json(&json_str) {
        Ok(payload) => string_to_cstr(&payload),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Save processor configuration to JSON.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `trackk_processor_new`.
/// - Returns a newly allocated string that must be freed with `trackk_free_string`.
/// - Returns NULL on error; call `trackk_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn trackk_processor_save_config(
    processor: *mut TrackkProcessorHandle,
) -> *mut c_char {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return ptr::null_mut();
    }

    let handle = &*processor;

    match handle.processor.save_config() {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Load processor configuration from JSON.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `trackk_processor_new`.
/// - `json` must be a valid null-terminated C string.
/// - Returns 0 on success, non-zero on error.
/// - On error, call `trackk_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn trackk_processor_load_config(
    processor: *mut TrackkProcessorHandle,
    json: *const c_char,
) -> i32 {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return -1;
    }

    let handle = &mut *processor;

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return -1;
        }
    };

    match handle.processor.load_config(&json_str) {
        Ok(()) => 0,
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by Trackk functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a Trackk function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn trackk_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next Trackk function call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn trackk_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn trackk_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
