//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Requests leave Rust as plain C data the host executes itself; responses
//! come back the same way. Activity inputs and outputs cross as JSON C
//! strings so one pair of entry points covers every activity.

use std::ffi::{c_void, CString};
use std::os::raw::c_char;

use maximo_core::{HttpMethod, HttpRequest, MaximoError, Registry};
use serde_json::Value;

/// Opaque handle to a `Registry` of every Maximo activity.
pub struct FfiRegistry {
    pub(crate) inner: Registry,
}

/// Owned C string. Interior NULs cannot occur in JSON or header text we
/// produce; should one appear the string is emptied.
pub(crate) fn c_string(s: String) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Wire method. PATCH never appears: it travels as POST with
/// `x-method-override`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Delete = 2,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

/// A header owned by an `FfiHttpRequest`.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// The single request an activity needs. `url` is absolute and already
/// carries the query string; `body` is null when there is none.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    pub(crate) fn from_core(req: HttpRequest) -> *mut Self {
        let body = req.body.map_or(std::ptr::null_mut(), c_string);

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: c_string(k),
                    value: c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url: c_string(req.url),
            headers,
            headers_len,
            body,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-owned)
// ---------------------------------------------------------------------------

/// A header borrowed from the caller.
#[repr(C)]
pub struct FfiResponseHeader {
    pub key: *const c_char,
    pub value: *const c_char,
}

/// The response the host received. Read, never freed, by this library.
/// `headers` may be null when `headers_len` is 0; a null `body` reads as
/// empty.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub headers: *const FfiResponseHeader,
    pub headers_len: u32,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    MissingInput = 1,
    InvalidInput = 2,
    Config = 3,
    Request = 4,
    Serialization = 5,
    Deserialization = 6,
    Transport = 7,
    UnknownActivity = 8,
    Panic = 9,
    NullArg = 10,
}

impl From<&MaximoError> for FfiErrorCode {
    fn from(err: &MaximoError) -> Self {
        match err {
            MaximoError::MissingInput(_) => FfiErrorCode::MissingInput,
            MaximoError::InvalidInput(_) => FfiErrorCode::InvalidInput,
            MaximoError::Config(_) => FfiErrorCode::Config,
            MaximoError::Request(_) => FfiErrorCode::Request,
            MaximoError::Serialization(_) => FfiErrorCode::Serialization,
            MaximoError::Deserialization(_) => FfiErrorCode::Deserialization,
            MaximoError::Transport(_) => FfiErrorCode::Transport,
            MaximoError::UnknownActivity(_) => FfiErrorCode::UnknownActivity,
        }
    }
}

/// Tells `maximo_free_result` what `FfiResult::data` points to.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    /// `*mut FfiHttpRequest`
    Request = 1,
    /// `*mut c_char` holding a JSON document.
    Json = 2,
}

/// Result envelope for every fallible entry point.
///
/// On success `error_code` is `Ok`, `error_message` is null and `data` is
/// tagged by `data_tag`. On failure `data` is null; `http_status` is set
/// for `Request` errors and `error_body` carries Maximo's parsed error
/// object as JSON when one was returned.
#[repr(C)]
pub struct FfiResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub error_body: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub data: *mut c_void,
}

impl FfiResult {
    fn boxed(self) -> *mut Self {
        Box::into_raw(Box::new(self))
    }

    fn ok(data_tag: FfiDataTag, data: *mut c_void) -> *mut Self {
        FfiResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            error_body: std::ptr::null_mut(),
            http_status: 0,
            data_tag,
            data,
        }
        .boxed()
    }

    fn failure(error_code: FfiErrorCode, message: String) -> Self {
        FfiResult {
            error_code,
            error_message: c_string(message),
            error_body: std::ptr::null_mut(),
            http_status: 0,
            data_tag: FfiDataTag::None,
            data: std::ptr::null_mut(),
        }
    }

    pub(crate) fn ok_request(req: HttpRequest) -> *mut Self {
        Self::ok(FfiDataTag::Request, FfiHttpRequest::from_core(req) as *mut c_void)
    }

    pub(crate) fn ok_json(value: &Value) -> *mut Self {
        match serde_json::to_string(value) {
            Ok(json) => Self::ok(FfiDataTag::Json, c_string(json) as *mut c_void),
            Err(e) => Self::from_error(MaximoError::Serialization(e.to_string())),
        }
    }

    pub(crate) fn from_error(err: MaximoError) -> *mut Self {
        let mut result = Self::failure(FfiErrorCode::from(&err), err.to_string());
        if let MaximoError::Request(request_error) = &err {
            result.http_status = request_error.status_code;
            if let Some(body) = &request_error.error {
                result.error_body = c_string(body.to_string());
            }
        }
        result.boxed()
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::NullArg, format!("null argument: {name}")).boxed()
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiErrorCode::Panic, msg.to_string()).boxed()
    }
}
