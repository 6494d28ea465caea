//! C-ABI wrapper around `marketplace-core` for the mobile app.
//!
//! # Overview
//! Exposes the credential cache, the request dispatcher and every resource
//! client through `extern "C"` functions, so the host can build and parse
//! HTTP requests/responses with its own networking stack.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Resources and operations are selected at runtime by `u32` codes (see
//!   `FfiResource` and `FfiOperation`) instead of one export per pair.
//! - A single `FfiResult` envelope with a JSON payload conveys success
//!   values and errors uniformly.
//! - The C caller owns all returned pointers and must call the matching
//!   `mkt_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use marketplace_core::{
    FileStorage, HttpResponse, LoginRequest, MarketplaceClient, MemoryStorage, Session,
    SessionStore, UserProfile,
};
use serde_json::json;

use types::*;

/// Borrow a C string as `&str`. Null and invalid UTF-8 both yield `None`.
fn c_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

fn session_json(session: &Session) -> serde_json::Value {
    json!({
        "token": session.token,
        "user": session.user,
    })
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a client bound to `base_url` with its own credential cache.
///
/// `storage_dir` selects a directory for the persisted token and profile;
/// null keeps them in memory for the lifetime of the handle. The cache starts
/// empty: call `mkt_session_load` to restore a previous session.
///
/// Returns null if `base_url` is null or if an internal panic occurs.
/// The caller must free the returned pointer with `mkt_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn mkt_client_new(
    base_url: *const c_char,
    storage_dir: *const c_char,
) -> *mut FfiClient {
    catch_unwind(|| {
        let Some(url) = c_str(base_url) else {
            return std::ptr::null_mut();
        };
        let session = match c_str(storage_dir) {
            Some(dir) => SessionStore::new(FileStorage::new(dir)),
            None => SessionStore::new(MemoryStorage::new()),
        };
        let client = MarketplaceClient::new(url, Arc::new(session));
        Box::into_raw(Box::new(FfiClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `mkt_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn mkt_client_free(client: *mut FfiClient) {
    if !client.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(client) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Credential cache
// ---------------------------------------------------------------------------

/// Restore the cached session from storage.
///
/// Never fails on missing or unreadable entries; the payload is
/// `{"token": ..., "user": ...}` with nulls for whatever could not be read.
#[unsafe(no_mangle)]
pub extern "C" fn mkt_session_load(client: *const FfiClient) -> *mut FfiResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiResult::null_arg("client");
        }
        let client = unsafe { &*client };
        let session = client.inner.session().load_session();
        FfiResult::ok_json(&session_json(&session))
    }))
    .unwrap_or_else(|_| FfiResult::panic("panic in mkt_session_load"))
}

/// The in-memory session, without touching storage.
#[unsafe(no_mangle)]
pub extern "C" fn mkt_session_get(client: *const FfiClient) -> *mut FfiResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiResult::null_arg("client");
        }
        let client = unsafe { &*client };
        let session = client.inner.session().snapshot();
        FfiResult::ok_json(&session_json(&session))
    }))
    .unwrap_or_else(|_| FfiResult::panic("panic in mkt_session_get"))
}

/// Persist `token`, or clear it when `token` is null or empty.
#[unsafe(no_mangle)]
pub extern "C" fn mkt_session_set_token(
    client: *const FfiClient,
    token: *const c_char,
) -> *mut FfiResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiResult::null_arg("client");
        }
        let client = unsafe { &*client };
        if !token.is_null() && c_str(token).is_none() {
            return FfiResult::invalid_arg("token is not valid UTF-8");
        }
        match client.inner.session().set_token(c_str(token)) {
            Ok(()) => FfiResult::ok_empty(),
            Err(e) => FfiResult::from_error(e.into()),
        }
    }))
    .unwrap_or_else(|_| FfiResult::panic("panic in mkt_session_set_token"))
}

/// Persist the profile given as JSON, or clear it when `user_json` is null.
#[unsafe(no_mangle)]
pub extern "C" fn mkt_session_set_user(
    client: *const FfiClient,
    user_json: *const c_char,
) -> *mut FfiResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiResult::null_arg("client");
        }
        let client = unsafe { &*client };
        let user = if user_json.is_null() {
            None
        } else {
            let raw = c_str(user_json).unwrap_or("");
            match serde_json::from_str::<UserProfile>(raw) {
                Ok(user) => Some(user),
                Err(e) => return FfiResult::invalid_arg(format!("invalid user profile: {e}")),
            }
        };
        match client.inner.session().set_user(user.as_ref()) {
            Ok(()) => FfiResult::ok_empty(),
            Err(e) => FfiResult::from_error(e.into()),
        }
    }))
    .unwrap_or_else(|_| FfiResult::panic("panic in mkt_session_set_user"))
}

/// Clear the token and the profile, in memory and in storage.
#[unsafe(no_mangle)]
pub extern "C" fn mkt_session_logout(client: *const FfiClient) -> *mut FfiResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiResult::null_arg("client");
        }
        let client = unsafe { &*client };
        match client.inner.logout() {
            Ok(()) => FfiResult::ok_empty(),
            Err(e) => FfiResult::from_error(e),
        }
    }))
    .unwrap_or_else(|_| FfiResult::panic("panic in mkt_session_logout"))
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build a request for `operation` on `resource` (see `FfiResource` and
/// `FfiOperation` for the codes).
///
/// `id` is used by get/update/delete and ignored otherwise. `body_json` is
/// required for create/update and is validated against the resource's
/// request shape before anything is built.
///
/// Returns null if `client` is null, a code is unknown, or the body is
/// missing or invalid.
/// The caller must free the returned pointer with `mkt_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn mkt_build_request(
    client: *const FfiClient,
    resource: u32,
    operation: u32,
    id: i64,
    body_json: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let (Some(kind), Some(op)) =
            (FfiResource::from_raw(resource), FfiOperation::from_raw(operation))
        else {
            return std::ptr::null_mut();
        };
        match client.inner.build_dynamic(kind, op, Some(id), c_str(body_json)) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(e) => {
                tracing::debug!(error = %e, resource = %kind, operation = %op, "FFI build failed");
                std::ptr::null_mut()
            }
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Build the login request. The cached token, if any, is attached as usual.
///
/// Returns null if any argument is null.
#[unsafe(no_mangle)]
pub extern "C" fn mkt_build_login(
    client: *const FfiClient,
    email: *const c_char,
    password: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let (Some(email), Some(password)) = (c_str(email), c_str(password)) else {
            return std::ptr::null_mut();
        };
        let input = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        match client.inner.build_login(&input) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Build the dashboard statistics request.
#[unsafe(no_mangle)]
pub extern "C" fn mkt_build_dashboard_stats(client: *const FfiClient) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_dashboard_stats())
    }))
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

/// Convert an `FfiHttpResponse` to a core `HttpResponse`.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    HttpResponse::new(resp.status, c_str(resp.body).unwrap_or(""))
}

/// Parse the response of `operation` on `resource`.
///
/// On success `data_json` is the record or list, re-encoded with every
/// field present, or the delete confirmation as a JSON string.
#[unsafe(no_mangle)]
pub extern "C" fn mkt_parse_response(
    client: *const FfiClient,
    resource: u32,
    operation: u32,
    response: *const FfiHttpResponse,
) -> *mut FfiResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiResult::null_arg("client");
        }
        if response.is_null() {
            return FfiResult::null_arg("response");
        }
        let (Some(kind), Some(op)) =
            (FfiResource::from_raw(resource), FfiOperation::from_raw(operation))
        else {
            return FfiResult::invalid_arg(format!(
                "unknown resource/operation: {resource}/{operation}"
            ));
        };
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        match client.inner.parse_dynamic(kind, op, ffi_response_to_core(resp)) {
            Ok(value) => FfiResult::ok_json(&value),
            Err(e) => FfiResult::from_error(e),
        }
    }))
    .unwrap_or_else(|_| FfiResult::panic("panic in mkt_parse_response"))
}

/// Parse a login response and sign the session in: the token and profile are
/// cached before this returns. The payload is the full auth response.
#[unsafe(no_mangle)]
pub extern "C" fn mkt_parse_login(
    client: *const FfiClient,
    response: *const FfiHttpResponse,
) -> *mut FfiResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiResult::null_arg("client");
        }
        if response.is_null() {
            return FfiResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        match client.inner.complete_login(ffi_response_to_core(resp)) {
            Ok(auth) => FfiResult::ok_serialized(&auth),
            Err(e) => FfiResult::from_error(e),
        }
    }))
    .unwrap_or_else(|_| FfiResult::panic("panic in mkt_parse_login"))
}

/// Parse a dashboard statistics response.
#[unsafe(no_mangle)]
pub extern "C" fn mkt_parse_dashboard_stats(
    client: *const FfiClient,
    response: *const FfiHttpResponse,
) -> *mut FfiResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiResult::null_arg("client");
        }
        if response.is_null() {
            return FfiResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        match client.inner.parse_dashboard_stats(ffi_response_to_core(resp)) {
            Ok(stats) => FfiResult::ok_serialized(&stats),
            Err(e) => FfiResult::from_error(e),
        }
    }))
    .unwrap_or_else(|_| FfiResult::panic("panic in mkt_parse_dashboard_stats"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `mkt_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn mkt_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        if !req.path.is_null() {
            drop(unsafe { CString::from_raw(req.path) });
        }
        if !req.body.is_null() {
            drop(unsafe { CString::from_raw(req.body) });
        }
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers: Box<[FfiHeader]> = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                if !h.key.is_null() {
                    drop(unsafe { CString::from_raw(h.key) });
                }
                if !h.value.is_null() {
                    drop(unsafe { CString::from_raw(h.value) });
                }
            }
        }
    });
}

/// Free an `FfiResult` returned by any `mkt_session_*` or `mkt_parse_*`
/// function. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn mkt_free_result(result: *mut FfiResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.data_json.is_null() {
            drop(unsafe { CString::from_raw(result.data_json) });
        }
    });
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const BASE_URL: &std::ffi::CStr = c"http://localhost:8080/api";
    const JWT: &std::ffi::CStr = c"eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiJhZG1pbiJ9.c2ln";

    fn new_client() -> *mut FfiClient {
        let client = mkt_client_new(BASE_URL.as_ptr(), std::ptr::null());
        assert!(!client.is_null());
        client
    }

    /// Read a C string owned by the library without freeing it.
    fn read(ptr: *const c_char) -> String {
        assert!(!ptr.is_null());
        unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string()
    }

    fn result_json(result: *mut FfiResult) -> serde_json::Value {
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Ok, "unexpected error");
        let value = serde_json::from_str(&read(r.data_json)).unwrap();
        mkt_free_result(result);
        value
    }

    fn headers(req: &FfiHttpRequest) -> Vec<(String, String)> {
        if req.headers.is_null() {
            return Vec::new();
        }
        let slice = unsafe { std::slice::from_raw_parts(req.headers, req.headers_len as usize) };
        slice.iter().map(|h| (read(h.key), read(h.value))).collect()
    }

    #[test]
    fn client_new_and_free() {
        let client = new_client();
        mkt_client_free(client);
    }

    #[test]
    fn client_new_null_url_returns_null() {
        let client = mkt_client_new(std::ptr::null(), std::ptr::null());
        assert!(client.is_null());
    }

    #[test]
    fn client_free_null_is_safe() {
        mkt_client_free(std::ptr::null_mut());
    }

    #[test]
    fn build_list_without_token_has_no_headers() {
        let client = new_client();
        let req = mkt_build_request(
            client,
            FfiResource::Stores as u32,
            FfiOperation::List as u32,
            0,
            std::ptr::null(),
        );
        assert!(!req.is_null());
        let r = unsafe { &*req };
        assert!(matches!(r.method, FfiHttpMethod::Get));
        assert_eq!(read(r.path), "http://localhost:8080/api/stores");
        assert_eq!(r.headers_len, 0);
        assert!(r.body.is_null());
        mkt_free_request(req);
        mkt_client_free(client);
    }

    #[test]
    fn token_set_through_ffi_is_attached() {
        let client = new_client();
        mkt_free_result(mkt_session_set_token(client, JWT.as_ptr()));

        let req = mkt_build_request(
            client,
            FfiResource::OrderItems as u32,
            FfiOperation::Delete as u32,
            3,
            std::ptr::null(),
        );
        let r = unsafe { &*req };
        assert!(matches!(r.method, FfiHttpMethod::Delete));
        assert_eq!(read(r.path), "http://localhost:8080/api/orderItems/3");
        assert_eq!(
            headers(r),
            vec![("authorization".to_string(), format!("Bearer {}", JWT.to_str().unwrap()))]
        );
        mkt_free_request(req);
        mkt_client_free(client);
    }

    #[test]
    fn malformed_token_is_not_attached() {
        let client = new_client();
        mkt_free_result(mkt_session_set_token(client, c"opaque".as_ptr()));
        let req = mkt_build_request(
            client,
            FfiResource::Users as u32,
            FfiOperation::List as u32,
            0,
            std::ptr::null(),
        );
        assert_eq!(unsafe { &*req }.headers_len, 0);
        mkt_free_request(req);
        mkt_client_free(client);
    }

    #[test]
    fn build_create_validates_body() {
        let client = new_client();
        let body = c"{\"rating\":5,\"comment\":\"Great\",\"productId\":3,\"userId\":1}";
        let req = mkt_build_request(
            client,
            FfiResource::Reviews as u32,
            FfiOperation::Create as u32,
            0,
            body.as_ptr(),
        );
        assert!(!req.is_null());
        let r = unsafe { &*req };
        assert!(matches!(r.method, FfiHttpMethod::Post));
        let sent: serde_json::Value = serde_json::from_str(&read(r.body)).unwrap();
        assert_eq!(sent["comment"], "Great");
        mkt_free_request(req);

        let bad = mkt_build_request(
            client,
            FfiResource::Reviews as u32,
            FfiOperation::Create as u32,
            0,
            c"{\"rating\":5}".as_ptr(),
        );
        assert!(bad.is_null());

        let missing = mkt_build_request(
            client,
            FfiResource::Reviews as u32,
            FfiOperation::Update as u32,
            1,
            std::ptr::null(),
        );
        assert!(missing.is_null());
        mkt_client_free(client);
    }

    #[test]
    fn unknown_codes_return_null() {
        let client = new_client();
        let req = mkt_build_request(client, 42, 0, 0, std::ptr::null());
        assert!(req.is_null());
        let req = mkt_build_request(client, 0, 9, 0, std::ptr::null());
        assert!(req.is_null());
        mkt_client_free(client);
    }

    #[test]
    fn build_login_posts_credentials() {
        let client = new_client();
        let req = mkt_build_login(client, c"admin@marketplace.test".as_ptr(), c"admin123".as_ptr());
        let r = unsafe { &*req };
        assert!(matches!(r.method, FfiHttpMethod::Post));
        assert_eq!(read(r.path), "http://localhost:8080/api/auth/login");
        let sent: serde_json::Value = serde_json::from_str(&read(r.body)).unwrap();
        assert_eq!(sent["email"], "admin@marketplace.test");
        mkt_free_request(req);

        assert!(mkt_build_login(client, std::ptr::null(), c"x".as_ptr()).is_null());
        mkt_client_free(client);
    }

    #[test]
    fn parse_login_signs_session_in() {
        let client = new_client();
        let body = c"{\"token\":\"a.b.c\",\"authuserId\":1,\"email\":\"admin@marketplace.test\",\"role\":\"ADMIN\"}";
        let resp = FfiHttpResponse {
            status: 200,
            body: body.as_ptr(),
        };
        let auth = result_json(mkt_parse_login(client, &resp));
        assert_eq!(auth["token"], "a.b.c");

        let session = result_json(mkt_session_get(client));
        assert_eq!(session["token"], "a.b.c");
        assert_eq!(session["user"]["id"], 1);

        mkt_free_result(mkt_session_logout(client));
        let session = result_json(mkt_session_get(client));
        assert!(session["token"].is_null());
        assert!(session["user"].is_null());
        mkt_client_free(client);
    }

    #[test]
    fn parse_login_failure_reports_status() {
        let client = new_client();
        let resp = FfiHttpResponse {
            status: 401,
            body: c"Bad credentials".as_ptr(),
        };
        let result = mkt_parse_login(client, &resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Http);
        assert_eq!(r.http_status, 401);
        assert!(r.data_json.is_null());
        mkt_free_result(result);
        mkt_client_free(client);
    }

    #[test]
    fn parse_response_unwraps_envelope() {
        let client = new_client();
        let body = c"{\"success\":true,\"message\":\"ok\",\"data\":[{\"id\":1,\"rating\":4,\"comment\":\"Fine\",\"productId\":2,\"userId\":1}]}";
        let resp = FfiHttpResponse {
            status: 200,
            body: body.as_ptr(),
        };
        let list = result_json(mkt_parse_response(
            client,
            FfiResource::Reviews as u32,
            FfiOperation::List as u32,
            &resp,
        ));
        assert_eq!(list[0]["comment"], "Fine");
        mkt_client_free(client);
    }

    #[test]
    fn parse_delete_returns_message() {
        let client = new_client();
        let resp = FfiHttpResponse {
            status: 200,
            body: c"Product deleted successfully.".as_ptr(),
        };
        let message = result_json(mkt_parse_response(
            client,
            FfiResource::Products as u32,
            FfiOperation::Delete as u32,
            &resp,
        ));
        assert_eq!(message, "Product deleted successfully.");
        mkt_client_free(client);
    }

    #[test]
    fn parse_not_found() {
        let client = new_client();
        let resp = FfiHttpResponse {
            status: 404,
            body: std::ptr::null(),
        };
        let result = mkt_parse_response(
            client,
            FfiResource::Orders as u32,
            FfiOperation::Get as u32,
            &resp,
        );
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::NotFound);
        assert_eq!(r.http_status, 404);
        mkt_free_result(result);
        mkt_client_free(client);
    }

    #[test]
    fn parse_dashboard_stats_bare_object() {
        let client = new_client();
        let resp = FfiHttpResponse {
            status: 200,
            body: c"{\"totalProducts\":2,\"totalStores\":1}".as_ptr(),
        };
        let stats = result_json(mkt_parse_dashboard_stats(client, &resp));
        assert_eq!(stats["totalProducts"], 2);
        assert_eq!(stats["productsPerStore"], serde_json::json!([]));
        mkt_client_free(client);
    }

    #[test]
    fn parse_null_arguments() {
        let resp = FfiHttpResponse {
            status: 200,
            body: std::ptr::null(),
        };
        let result = mkt_parse_response(std::ptr::null(), 0, 0, &resp);
        assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::NullArg);
        mkt_free_result(result);

        let client = new_client();
        let result = mkt_parse_response(client, 0, 0, std::ptr::null());
        assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::NullArg);
        mkt_free_result(result);

        let result = mkt_parse_response(client, 0, 77, &resp);
        assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::InvalidArg);
        mkt_free_result(result);
        mkt_client_free(client);
    }

    #[test]
    fn set_user_rejects_bad_json_and_clears_on_null() {
        let client = new_client();
        let result = mkt_session_set_user(client, c"{\"id\":\"x\"}".as_ptr());
        assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::InvalidArg);
        mkt_free_result(result);

        mkt_free_result(mkt_session_set_user(
            client,
            c"{\"id\":5,\"email\":\"ops@marketplace.test\"}".as_ptr(),
        ));
        assert_eq!(result_json(mkt_session_get(client))["user"]["id"], 5);

        mkt_free_result(mkt_session_set_user(client, std::ptr::null()));
        assert!(result_json(mkt_session_get(client))["user"].is_null());
        mkt_client_free(client);
    }

    #[test]
    fn file_storage_session_survives_new_handle() {
        let dir = tempfile::tempdir().unwrap();
        let dir_c = CString::new(dir.path().to_str().unwrap()).unwrap();

        let first = mkt_client_new(BASE_URL.as_ptr(), dir_c.as_ptr());
        mkt_free_result(mkt_session_set_token(first, JWT.as_ptr()));
        mkt_client_free(first);

        let second = mkt_client_new(BASE_URL.as_ptr(), dir_c.as_ptr());
        assert!(result_json(mkt_session_get(second))["token"].is_null());
        let loaded = result_json(mkt_session_load(second));
        assert_eq!(loaded["token"], JWT.to_str().unwrap());
        mkt_client_free(second);
    }

    #[test]
    fn free_functions_accept_null() {
        mkt_free_request(std::ptr::null_mut());
        mkt_free_result(std::ptr::null_mut());
    }
}
