//! FFI bindings for Screen Wellness
//!
//! This module provides C-compatible functions for calling the analyzer from other languages.
//! All functions use C strings (null-terminated) and return allocated memory that
//! must be freed by the caller using `wellness_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::analyzer::{parse_snapshot, WellnessAnalyzer};
use crate::config::InsightConfig;
use crate::insight::InsightService;
use crate::types::InsightResponse;

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

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
// Analysis
// ============================================================================

/// Analyze a usage snapshot JSON and return the analysis result JSON.
///
/// # Safety
/// - `json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `wellness_free_string`.
/// - Returns NULL on error; call `wellness_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn wellness_analyze(json: *const c_char) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    match WellnessAnalyzer::new().analyze_json(&json_str) {
        Ok(result) => string_to_cstr(&result),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Analyze a snapshot and attach an insight under `llm_insight`.
///
/// The insight generator is configured from the environment. When
/// `use_template` is non-zero the local template is used unconditionally.
///
/// # Safety
/// - `json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `wellness_free_string`.
/// - Returns NULL on error; call `wellness_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn wellness_analyze_with_insight(
    json: *const c_char,
    use_template: i32,
) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    let snapshot = match parse_snapshot(&json_str) {
        Ok(s) => s,
        Err(e) => {
            set_last_error(&e.to_string());
            return ptr::null_mut();
        }
    };

    let service = if use_template != 0 {
        InsightService::template_only()
    } else {
        InsightService::from_config(&InsightConfig::from_env())
    };

    let analysis = WellnessAnalyzer::new().analyze(&snapshot);
    let llm_insight = service.generate(&analysis, &snapshot);
    let response = InsightResponse {
        analysis,
        llm_insight,
    };

    match serde_json::to_string(&response) {
        Ok(result) => string_to_cstr(&result),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by wellness functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a wellness function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn wellness_free_string(ptr: *mut c_char) {
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
/// - The returned pointer is valid until the next wellness function call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn wellness_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

/// Get the library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn wellness_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;

    unsafe fn take_string(ptr: *mut c_char) -> String {
        assert!(!ptr.is_null());
        let s = CStr::from_ptr(ptr).to_str().unwrap().to_string();
        wellness_free_string(ptr);
        s
    }

    #[test]
    fn test_ffi_analyze() {
        let input = CString::new(r#"{"total_screen_time_minutes": 0}"#).unwrap();

        unsafe {
            let result = take_string(wellness_analyze(input.as_ptr()));
            let value: serde_json::Value = serde_json::from_str(&result).unwrap();
            assert_eq!(value["overall_score"], 66.0);
            assert!(wellness_last_error().is_null());
        }
    }

    #[test]
    fn test_ffi_analyze_with_template_insight() {
        let input = CString::new(r#"{"total_screen_time_minutes": 120}"#).unwrap();

        unsafe {
            let result = take_string(wellness_analyze_with_insight(input.as_ptr(), 1));
            let value: serde_json::Value = serde_json::from_str(&result).unwrap();
            assert!(value["llm_insight"].as_str().unwrap().starts_with("Your wellness score"));
            assert_eq!(value["metrics"]["total_screen_time_hours"], 2.0);
        }
    }

    #[test]
    fn test_ffi_error_handling() {
        let invalid = CString::new("not valid json").unwrap();

        unsafe {
            let result = wellness_analyze(invalid.as_ptr());
            assert!(result.is_null());

            let error = wellness_last_error();
            assert!(!error.is_null());
            let message = CStr::from_ptr(error).to_str().unwrap();
            assert!(message.contains("parse"));

            assert!(wellness_analyze(ptr::null()).is_null());
        }
    }

    #[test]
    fn test_ffi_version() {
        unsafe {
            let version = CStr::from_ptr(wellness_version()).to_str().unwrap();
            assert_eq!(version, env!("CARGO_PKG_VERSION"));
        }
    }
}
