//! C-ABI wrapper around `maximo-core`.
//!
//! # Overview
//! Lets a workflow host written in any language with a C FFI drive the
//! Maximo activities: it asks for the request an activity needs, performs
//! the HTTP exchange itself, and hands the response back for parsing.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Activities are addressed by name; inputs and outputs are JSON C
//!   strings, so two entry points cover the whole registry.
//! - A single `FfiResult` envelope with `FfiDataTag` + `void* data`
//!   conveys success payloads and errors uniformly.
//! - The C caller owns all returned pointers and must call the matching
//!   `maximo_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use maximo_core::{HttpResponse, MaximoError, Registry, ServiceConfig};
use serde_json::Value;

use types::*;

/// Borrow a non-null C string as UTF-8.
fn read_str<'a>(ptr: *const c_char, name: &str) -> Result<&'a str, MaximoError> {
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|_| MaximoError::InvalidInput(format!("{name} is not valid UTF-8")))
}

fn parse_inputs(json: &str) -> Result<Value, MaximoError> {
    serde_json::from_str(json).map_err(|e| MaximoError::InvalidInput(format!("invalid inputs JSON: {e}")))
}

fn lossy(ptr: *const c_char) -> String {
    if ptr.is_null() {
        String::new()
    } else {
        unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
    }
}

fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let headers = if resp.headers.is_null() || resp.headers_len == 0 {
        Vec::new()
    } else {
        unsafe { std::slice::from_raw_parts(resp.headers, resp.headers_len as usize) }
            .iter()
            .filter(|h| !h.key.is_null())
            .map(|h| (lossy(h.key), lossy(h.value)))
            .collect()
    };
    HttpResponse {
        status: resp.status,
        headers,
        body: lossy(resp.body),
    }
}

// ---------------------------------------------------------------------------
// Registry lifecycle
// ---------------------------------------------------------------------------

/// Create a registry holding every Maximo activity.
///
/// Returns null only if an internal panic occurs. Free with
/// `maximo_registry_free`.
#[unsafe(no_mangle)]
pub extern "C" fn maximo_registry_new() -> *mut FfiRegistry {
    catch_unwind(|| {
        Box::into_raw(Box::new(FfiRegistry {
            inner: Registry::standard(),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a registry created by `maximo_registry_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn maximo_registry_free(registry: *mut FfiRegistry) {
    if !registry.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(registry) });
        }));
    }
}

/// Names of the registered activities as a JSON array (`data_tag = Json`).
#[unsafe(no_mangle)]
pub extern "C" fn maximo_activity_names(registry: *const FfiRegistry) -> *mut FfiResult {
    catch_unwind(AssertUnwindSafe(|| {
        if registry.is_null() {
            return FfiResult::null_arg("registry");
        }
        let registry = unsafe { &*registry };
        let names: Vec<Value> = registry.inner.names().map(Value::from).collect();
        FfiResult::ok_json(&Value::Array(names))
    }))
    .unwrap_or_else(|_| FfiResult::panic("panic in maximo_activity_names"))
}

// ---------------------------------------------------------------------------
// Build / parse
// ---------------------------------------------------------------------------

/// Validate `inputs_json` for `activity` and build its request.
///
/// On success `data_tag` is `Request` and `data` is an `FfiHttpRequest`
/// owned by the result. Validation failures come back as `MissingInput`,
/// `InvalidInput` or `Config` results.
#[unsafe(no_mangle)]
pub extern "C" fn maximo_build_request(
    registry: *const FfiRegistry,
    activity: *const c_char,
    inputs_json: *const c_char,
) -> *mut FfiResult {
    catch_unwind(AssertUnwindSafe(|| {
        if registry.is_null() {
            return FfiResult::null_arg("registry");
        }
        if activity.is_null() {
            return FfiResult::null_arg("activity");
        }
        if inputs_json.is_null() {
            return FfiResult::null_arg("inputs_json");
        }
        let registry = unsafe { &*registry };
        let built = read_str(activity, "activity").and_then(|activity| {
            let inputs = parse_inputs(read_str(inputs_json, "inputs_json")?)?;
            registry.inner.build_request(activity, &inputs)
        });
        match built {
            Ok(req) => FfiResult::ok_request(req),
            Err(e) => FfiResult::from_error(e),
        }
    }))
    .unwrap_or_else(|_| FfiResult::panic("panic in maximo_build_request"))
}

/// Parse the host's response to a request built for the same `activity`
/// and `inputs_json`.
///
/// On success `data_tag` is `Json` and `data` is the output record. A
/// non-2xx response yields a `Request` result with `http_status` set.
#[unsafe(no_mangle)]
pub extern "C" fn maximo_parse_response(
    registry: *const FfiRegistry,
    activity: *const c_char,
    inputs_json: *const c_char,
    response: *const FfiHttpResponse,
) -> *mut FfiResult {
    catch_unwind(AssertUnwindSafe(|| {
        if registry.is_null() {
            return FfiResult::null_arg("registry");
        }
        if activity.is_null() {
            return FfiResult::null_arg("activity");
        }
        if inputs_json.is_null() {
            return FfiResult::null_arg("inputs_json");
        }
        if response.is_null() {
            return FfiResult::null_arg("response");
        }
        let registry = unsafe { &*registry };
        let response = ffi_response_to_core(unsafe { &*response });
        let parsed = read_str(activity, "activity").and_then(|activity| {
            let inputs = parse_inputs(read_str(inputs_json, "inputs_json")?)?;
            registry.inner.parse_response(activity, &inputs, response)
        });
        match parsed {
            Ok(outputs) => FfiResult::ok_json(&outputs),
            Err(e) => FfiResult::from_error(e),
        }
    }))
    .unwrap_or_else(|_| FfiResult::panic("panic in maximo_parse_response"))
}

/// `CreateMaximoService` inputs assembled from `MAXIMO_*` environment
/// variables and the optional `MAXIMO_CONFIG` TOML file.
#[unsafe(no_mangle)]
pub extern "C" fn maximo_service_inputs_from_env() -> *mut FfiResult {
    catch_unwind(|| {
        let inputs = ServiceConfig::load().and_then(|config| {
            serde_json::to_value(config.to_inputs())
                .map_err(|e| MaximoError::Serialization(e.to_string()))
        });
        match inputs {
            Ok(inputs) => FfiResult::ok_json(&inputs),
            Err(e) => FfiResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiResult::panic("panic in maximo_service_inputs_from_env"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

fn free_request_fields(req: &FfiHttpRequest) {
    free_c_string(req.url);
    free_c_string(req.body);
    if !req.headers.is_null() {
        let headers = unsafe {
            Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                req.headers,
                req.headers_len as usize,
            ))
        };
        for h in headers.iter() {
            free_c_string(h.key);
            free_c_string(h.value);
        }
    }
}

/// Move the request out of a successful `maximo_build_request` result.
///
/// Returns null when `result` is null or carries no request. Afterwards the
/// result no longer owns the request: release it with `maximo_free_request`,
/// and the result itself with `maximo_free_result`, in either order.
#[unsafe(no_mangle)]
pub extern "C" fn maximo_result_take_request(result: *mut FfiResult) -> *mut FfiHttpRequest {
    if result.is_null() {
        return std::ptr::null_mut();
    }
    catch_unwind(AssertUnwindSafe(|| {
        let result = unsafe { &mut *result };
        if result.data_tag != FfiDataTag::Request || result.data.is_null() {
            return std::ptr::null_mut();
        }
        let req = result.data as *mut FfiHttpRequest;
        result.data = std::ptr::null_mut();
        result.data_tag = FfiDataTag::None;
        req
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Free a request obtained from `maximo_result_take_request`. Safe to call
/// with null.
///
/// A request still inside its `FfiResult` is released by
/// `maximo_free_result`; never pass it here as well.
#[unsafe(no_mangle)]
pub extern "C" fn maximo_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let req = unsafe { Box::from_raw(req) };
        free_request_fields(&req);
    }));
}

/// Free a result and whatever its `data` points to. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn maximo_free_result(result: *mut FfiResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        free_c_string(result.error_body);
        if !result.data.is_null() {
            match result.data_tag {
                FfiDataTag::Request => maximo_free_request(result.data as *mut FfiHttpRequest),
                FfiDataTag::Json => free_c_string(result.data as *mut c_char),
                FfiDataTag::None => {}
            }
        }
    }));
}

/// Free a string returned by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn maximo_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| free_c_string(s)));
    }
}
