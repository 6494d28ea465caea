//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Requests cross as plain C data (method enum, path, header array, body).
//! Results cross as one `FfiResult` envelope whose payload is a JSON string,
//! so the mobile host decodes records with its own JSON library instead of
//! mirroring every DTO as a C struct. Conversion functions live here to keep
//! `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use marketplace_core::{ApiError, HttpMethod, MarketplaceClient, Operation, ResourceKind};
use serde_json::Value;

/// Opaque handle to a `MarketplaceClient` and its credential cache. C callers
/// receive a pointer to this and pass it back into every FFI function.
pub struct FfiClient {
    pub(crate) inner: MarketplaceClient,
}

/// Copy `s` into a heap C string owned by the caller. Interior NULs are
/// dropped rather than failing the whole call.
pub(crate) fn to_c_string(s: impl Into<String>) -> *mut c_char {
    let s: String = s.into();
    let s = if s.contains('\0') { s.replace('\0', "") } else { s };
    CString::new(s).unwrap_or_default().into_raw()
}

// ---------------------------------------------------------------------------
// Selectors
// ---------------------------------------------------------------------------

/// Resource selector. Passed across the boundary as its `u32` value.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiResource {
    Users = 0,
    Orders = 1,
    OrderItems = 2,
    Products = 3,
    Stores = 4,
    Reviews = 5,
}

impl FfiResource {
    pub(crate) fn from_raw(raw: u32) -> Option<ResourceKind> {
        let kind = match raw {
            0 => ResourceKind::Users,
            1 => ResourceKind::Orders,
            2 => ResourceKind::OrderItems,
            3 => ResourceKind::Products,
            4 => ResourceKind::Stores,
            5 => ResourceKind::Reviews,
            _ => return None,
        };
        Some(kind)
    }
}

/// Operation selector. Passed across the boundary as its `u32` value.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiOperation {
    List = 0,
    Get = 1,
    Create = 2,
    Update = 3,
    Delete = 4,
}

impl FfiOperation {
    pub(crate) fn from_raw(raw: u32) -> Option<Operation> {
        let op = match raw {
            0 => Operation::List,
            1 => Operation::Get,
            2 => Operation::Create,
            3 => Operation::Update,
            4 => Operation::Delete,
            _ => return None,
        };
        Some(op)
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Delete = 3,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// `path` is the absolute URL. `headers` already carries
/// `authorization: Bearer ...` when the cached token qualified; the host
/// must send every header as given.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: marketplace_core::HttpRequest) -> *mut Self {
        let path = to_c_string(req.path);
        let body = match req.body {
            Some(b) => to_c_string(b),
            None => std::ptr::null_mut(),
        };

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: to_c_string(k),
                    value: to_c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path,
            headers,
            headers_len,
            body,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing a request, then
/// passes a pointer to a `mkt_parse_*` function. The FFI layer reads but
/// does not free these fields. A null `body` is treated as empty.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    NotFound = 1,
    Http = 2,
    Deserialization = 3,
    Serialization = 4,
    Panic = 5,
    NullArg = 6,
    InvalidArg = 7,
    Storage = 8,
}

/// Result envelope for every call that can fail.
///
/// On success `error_code` is `Ok`, `error_message` is null and `data_json`
/// holds the JSON payload (null when the call has none). On failure
/// `error_code` describes the category, `error_message` is a human-readable
/// C string, `http_status` carries the server status when there was one, and
/// `data_json` is null.
#[repr(C)]
pub struct FfiResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_json: *mut c_char,
}

impl FfiResult {
    fn boxed(
        error_code: FfiErrorCode,
        error_message: *mut c_char,
        http_status: u16,
        data_json: *mut c_char,
    ) -> *mut Self {
        Box::into_raw(Box::new(FfiResult {
            error_code,
            error_message,
            http_status,
            data_json,
        }))
    }

    /// Build a success result carrying `value` as JSON.
    pub(crate) fn ok_json(value: &Value) -> *mut Self {
        Self::boxed(
            FfiErrorCode::Ok,
            std::ptr::null_mut(),
            0,
            to_c_string(value.to_string()),
        )
    }

    /// Build a success result carrying any serializable payload.
    pub(crate) fn ok_serialized<T: serde::Serialize>(value: &T) -> *mut Self {
        match serde_json::to_value(value) {
            Ok(value) => Self::ok_json(&value),
            Err(e) => Self::from_error(ApiError::SerializationError(e.to_string())),
        }
    }

    /// Build a success result with no payload.
    pub(crate) fn ok_empty() -> *mut Self {
        Self::boxed(FfiErrorCode::Ok, std::ptr::null_mut(), 0, std::ptr::null_mut())
    }

    /// Build an error result from an `ApiError`.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let error_code = match &err {
            ApiError::NotFound => FfiErrorCode::NotFound,
            ApiError::HttpError { .. } => FfiErrorCode::Http,
            ApiError::DeserializationError(_) => FfiErrorCode::Deserialization,
            ApiError::SerializationError(_) => FfiErrorCode::Serialization,
            ApiError::MissingId(_) | ApiError::MissingBody(_) => FfiErrorCode::InvalidArg,
            ApiError::Storage(_) => FfiErrorCode::Storage,
        };
        tracing::debug!(error = %err, "FFI call failed");
        Self::boxed(
            error_code,
            to_c_string(err.to_string()),
            err.status().unwrap_or(0),
            std::ptr::null_mut(),
        )
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::boxed(
            FfiErrorCode::NullArg,
            to_c_string(format!("null argument: {name}")),
            0,
            std::ptr::null_mut(),
        )
    }

    /// Build an error result for an argument that is present but unusable.
    pub(crate) fn invalid_arg(message: impl Into<String>) -> *mut Self {
        Self::boxed(
            FfiErrorCode::InvalidArg,
            to_c_string(message),
            0,
            std::ptr::null_mut(),
        )
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(FfiErrorCode::Panic, to_c_string(msg), 0, std::ptr::null_mut())
    }
}
