//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! tagged enums with explicit discriminants. Document properties are
//! heterogeneous, so they cross the boundary as a JSON object string rather
//! than a C structure. Conversion functions live here to keep `lib.rs`
//! focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use xayn_core::{ErrorKind, HttpMethod, PersonalizedDocumentsResponse, RequestBuilder, XaynError};

/// Opaque handle to a `RequestBuilder`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiXaynClient {
    pub(crate) inner: RequestBuilder,
}

/// Convert to an owned C string. Interior NUL bytes yield an empty string.
pub(crate) fn c_string(s: impl Into<Vec<u8>>) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Patch = 2,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Patch => FfiHttpMethod::Patch,
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
/// `url` already contains the encoded query string. Built by
/// `xayn_build_*` functions; the C caller executes the request and passes
/// the response back through `xayn_parse_*`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: xayn_core::HttpRequest) -> *mut Self {
        let url = c_string(req.url());
        let body = match req.body {
            Some(b) => c_string(b),
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
                    key: c_string(k),
                    value: c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url,
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
/// The C caller constructs this on the stack after executing an HTTP request,
/// then passes a pointer to a `xayn_parse_*` function. The FFI layer reads
/// but does not free these fields. `content_type` may be null when the
/// host has no `Content-Type` header to report.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub content_type: *const c_char,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiXaynResult`. Codes 1-7 mirror `ErrorKind`.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    UnknownError = 1,
    InvalidRequest = 2,
    InvalidUserId = 3,
    InvalidUserOrDocumentId = 4,
    UserNotFound = 5,
    UnableToCreateListForUser = 6,
    DocumentsNotSuccessfullyUploaded = 7,
    NullArg = 8,
    InvalidArg = 9,
    Panic = 10,
}

impl From<ErrorKind> for FfiErrorCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::UnknownError => FfiErrorCode::UnknownError,
            ErrorKind::InvalidRequest => FfiErrorCode::InvalidRequest,
            ErrorKind::InvalidUserId => FfiErrorCode::InvalidUserId,
            ErrorKind::InvalidUserOrDocumentId => FfiErrorCode::InvalidUserOrDocumentId,
            ErrorKind::UserNotFound => FfiErrorCode::UserNotFound,
            ErrorKind::UnableToCreateListForUser => FfiErrorCode::UnableToCreateListForUser,
            ErrorKind::DocumentsNotSuccessfullyUploaded => {
                FfiErrorCode::DocumentsNotSuccessfullyUploaded
            }
        }
    }
}

/// Tag that tells `xayn_free_result` what `FfiXaynResult::data` points to.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    PersonalizedDocuments = 1,
}

/// A personalized document exposed to C. `properties_json` is a JSON object.
#[repr(C)]
pub struct FfiPersonalizedDocument {
    pub id: *mut c_char,
    pub score: i64,
    pub properties_json: *mut c_char,
}

/// The ranked list of personalized documents exposed to C.
#[repr(C)]
pub struct FfiPersonalizedDocumentList {
    pub items: *mut FfiPersonalizedDocument,
    pub len: u32,
}

/// Result envelope for all parse operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the parsed payload (tagged by `data_tag`).
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string, `http_status` is the status that caused it (0
/// if none), and `data` is null.
#[repr(C)]
pub struct FfiXaynResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub data: *mut std::ffi::c_void,
}

impl FfiXaynResult {
    fn boxed(
        error_code: FfiErrorCode,
        error_message: *mut c_char,
        http_status: u16,
        data_tag: FfiDataTag,
        data: *mut std::ffi::c_void,
    ) -> *mut Self {
        Box::into_raw(Box::new(FfiXaynResult {
            error_code,
            error_message,
            http_status,
            data_tag,
            data,
        }))
    }

    /// Build a success result carrying the ranked document list.
    pub(crate) fn ok_documents(response: PersonalizedDocumentsResponse) -> *mut Self {
        let len = response.documents.len() as u32;
        let items = if response.documents.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_docs: Box<[FfiPersonalizedDocument]> = response
                .documents
                .into_iter()
                .map(|d| FfiPersonalizedDocument {
                    id: c_string(d.id),
                    score: d.score,
                    properties_json: c_string(
                        serde_json::to_string(&d.properties).unwrap_or_else(|_| "{}".to_string()),
                    ),
                })
                .collect();
            Box::into_raw(ffi_docs) as *mut FfiPersonalizedDocument
        };

        let list = Box::new(FfiPersonalizedDocumentList { items, len });
        Self::boxed(
            FfiErrorCode::Ok,
            std::ptr::null_mut(),
            0,
            FfiDataTag::PersonalizedDocuments,
            Box::into_raw(list) as *mut std::ffi::c_void,
        )
    }

    /// Build a success result with no data payload.
    pub(crate) fn ok_empty() -> *mut Self {
        Self::boxed(
            FfiErrorCode::Ok,
            std::ptr::null_mut(),
            0,
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }

    /// Build an error result from a `XaynError`.
    pub(crate) fn from_error(err: XaynError) -> *mut Self {
        Self::boxed(
            err.kind.into(),
            c_string(err.to_string()),
            err.status.unwrap_or(0),
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::NullArg, &format!("null argument: {name}"))
    }

    /// Build an error result for an argument that is present but unusable.
    pub(crate) fn invalid_arg(name: &str, reason: &str) -> *mut Self {
        Self::failure(FfiErrorCode::InvalidArg, &format!("invalid argument {name}: {reason}"))
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiErrorCode::Panic, msg)
    }

    fn failure(code: FfiErrorCode, msg: &str) -> *mut Self {
        Self::boxed(code, c_string(msg), 0, FfiDataTag::None, std::ptr::null_mut())
    }
}
