//! C-ABI wrapper around `xayn-core`.
//!
//! # Overview
//! Exposes the personalization API through `extern "C"` functions so any
//! language with a C FFI can build and parse HTTP requests/responses without
//! linking to Rust's async runtime or serde directly.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Per-operation `xayn_build_*` / `xayn_parse_*` mirrors the core
//!   `RequestBuilder` 1:1. The user id is passed on every build call; the
//!   host owns it.
//! - A single `FfiXaynResult` envelope with `FfiDataTag` + `void* data`
//!   conveys success payloads and errors uniformly.
//! - The C caller owns all returned pointers and must call the matching
//!   `xayn_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use xayn_core::{HttpResponse, IngestedDocument, RequestBuilder};

use types::*;

/// Borrow a C string as `&str`, or `None` when it is not valid UTF-8.
///
/// # Safety
/// `ptr` must be non-null and point to a NUL-terminated string.
unsafe fn borrow_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new request builder bound to `base_url` and `api_key`.
///
/// Returns null if either argument is null or not UTF-8, or if an internal
/// panic occurs. The caller must free the returned pointer with
/// `xayn_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn xayn_client_new(
    base_url: *const c_char,
    api_key: *const c_char,
) -> *mut FfiXaynClient {
    catch_unwind(|| {
        if base_url.is_null() || api_key.is_null() {
            return std::ptr::null_mut();
        }
        let (Some(url), Some(key)) = (unsafe { borrow_str(base_url) }, unsafe { borrow_str(api_key) })
        else {
            return std::ptr::null_mut();
        };
        let inner = RequestBuilder::new(url, key);
        Box::into_raw(Box::new(FfiXaynClient { inner }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `xayn_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn xayn_client_free(client: *mut FfiXaynClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build the request fetching personalized documents for `user_id`.
///
/// A negative `count` omits the `count` query parameter.
/// Returns null if `client` or `user_id` is null.
/// The caller must free the returned pointer with `xayn_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn xayn_build_personalized_documents(
    client: *const FfiXaynClient,
    user_id: *const c_char,
    count: i32,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() || user_id.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let Some(user_id) = (unsafe { borrow_str(user_id) }) else {
            return std::ptr::null_mut();
        };
        let count = u32::try_from(count).ok();
        let req = client.inner.build_personalized_documents(user_id, count);
        FfiHttpRequest::from_core(req)
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the request registering a positive interaction with `document_id`.
///
/// Returns null if any argument is null or if serialization fails.
#[unsafe(no_mangle)]
pub extern "C" fn xayn_build_like_document(
    client: *const FfiXaynClient,
    user_id: *const c_char,
    document_id: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() || user_id.is_null() || document_id.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let (Some(user_id), Some(document_id)) =
            (unsafe { borrow_str(user_id) }, unsafe { borrow_str(document_id) })
        else {
            return std::ptr::null_mut();
        };
        match client.inner.build_like_document(user_id, document_id) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the request ingesting a batch of documents.
///
/// `documents_json` is a JSON array of `{"id", "snippet", "properties"}`
/// objects; `properties` may be omitted.
/// Returns null if an argument is null or `documents_json` does not decode.
#[unsafe(no_mangle)]
pub extern "C" fn xayn_build_add_documents(
    client: *const FfiXaynClient,
    documents_json: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() || documents_json.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let Some(raw) = (unsafe { borrow_str(documents_json) }) else {
            return std::ptr::null_mut();
        };
        let documents: Vec<IngestedDocument> = match serde_json::from_str(raw) {
            Ok(d) => d,
            Err(_) => return std::ptr::null_mut(),
        };
        match client.inner.build_add_documents(&documents) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

/// Convert an `FfiHttpResponse` to a core `HttpResponse`.
///
/// A null body is read as empty and a null content type adds no header.
/// Either one that is not UTF-8 is rejected.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> Result<HttpResponse, *mut FfiXaynResult> {
    let mut headers = Vec::new();
    if !resp.content_type.is_null() {
        match unsafe { borrow_str(resp.content_type) } {
            Some(ct) => headers.push(("Content-Type".to_string(), ct.to_string())),
            None => {
                return Err(FfiXaynResult::invalid_arg("response", "content type is not UTF-8"))
            }
        }
    }
    let body = if resp.body.is_null() {
        String::new()
    } else {
        match unsafe { borrow_str(resp.body) } {
            Some(s) => s.to_string(),
            None => return Err(FfiXaynResult::invalid_arg("response", "body is not UTF-8")),
        }
    };
    Ok(HttpResponse {
        status: resp.status,
        headers,
        body,
    })
}

/// Shared null check and conversion for every `xayn_parse_*` entry point.
fn with_response(
    response: *const FfiHttpResponse,
    parse: impl FnOnce(HttpResponse) -> *mut FfiXaynResult,
) -> *mut FfiXaynResult {
    if response.is_null() {
        return FfiXaynResult::null_arg("response");
    }
    let resp = unsafe { &*response };
    match ffi_response_to_core(resp) {
        Ok(core_resp) => parse(core_resp),
        Err(result) => result,
    }
}

/// Parse the response of a personalized-documents request.
///
/// Returns a result with `data_tag = PersonalizedDocuments` on success.
#[unsafe(no_mangle)]
pub extern "C" fn xayn_parse_personalized_documents(
    response: *const FfiHttpResponse,
) -> *mut FfiXaynResult {
    catch_unwind(|| {
        with_response(response, |resp| {
            match RequestBuilder::parse_personalized_documents(resp) {
                Ok(list) => FfiXaynResult::ok_documents(list),
                Err(e) => FfiXaynResult::from_error(e),
            }
        })
    })
    .unwrap_or_else(|_| FfiXaynResult::panic("panic in xayn_parse_personalized_documents"))
}

/// Parse the response of a like-document request.
///
/// Returns a result with `data_tag = None` on success.
#[unsafe(no_mangle)]
pub extern "C" fn xayn_parse_like_document(response: *const FfiHttpResponse) -> *mut FfiXaynResult {
    catch_unwind(|| {
        with_response(response, |resp| match RequestBuilder::parse_like_document(resp) {
            Ok(()) => FfiXaynResult::ok_empty(),
            Err(e) => FfiXaynResult::from_error(e),
        })
    })
    .unwrap_or_else(|_| FfiXaynResult::panic("panic in xayn_parse_like_document"))
}

/// Parse the response of an add-documents request.
///
/// Returns a result with `data_tag = None` on success.
#[unsafe(no_mangle)]
pub extern "C" fn xayn_parse_add_documents(response: *const FfiHttpResponse) -> *mut FfiXaynResult {
    catch_unwind(|| {
        with_response(response, |resp| match RequestBuilder::parse_add_documents(resp) {
            Ok(()) => FfiXaynResult::ok_empty(),
            Err(e) => FfiXaynResult::from_error(e),
        })
    })
    .unwrap_or_else(|_| FfiXaynResult::panic("panic in xayn_parse_add_documents"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

/// Free an `FfiHttpRequest` returned by any `xayn_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn xayn_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.url);
        free_c_string(req.body);
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Vec::from_raw_parts(req.headers, req.headers_len as usize, req.headers_len as usize)
            };
            for h in headers {
                free_c_string(h.key);
                free_c_string(h.value);
            }
        }
    });
}

/// Free an `FfiXaynResult` returned by any `xayn_parse_*` function.
/// Safe to call with null. Uses `data_tag` to determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn xayn_free_result(result: *mut FfiXaynResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        if result.data.is_null() {
            return;
        }
        match result.data_tag {
            FfiDataTag::PersonalizedDocuments => {
                let list =
                    unsafe { Box::from_raw(result.data as *mut FfiPersonalizedDocumentList) };
                if !list.items.is_null() && list.len > 0 {
                    let items = unsafe {
                        Vec::from_raw_parts(list.items, list.len as usize, list.len as usize)
                    };
                    for item in items {
                        free_c_string(item.id);
                        free_c_string(item.properties_json);
                    }
                }
            }
            FfiDataTag::None => {}
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn xayn_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| free_c_string(s));
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
