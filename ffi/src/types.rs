//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! tagged enums with explicit discriminants. Optional numbers travel as a
//! `has_*` flag plus value. Conversion functions live here to keep `lib.rs`
//! focused on the `extern "C"` surface.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use tumblr_core::error::ApiError;
use tumblr_core::http::{HttpMethod, HttpRequest};
use tumblr_core::params::{LikesRequestParams, PostRequestParams, PostType};
use tumblr_core::types::Post;

/// Opaque handle to a `Blog`. C callers receive a pointer to this and pass
/// it back into every FFI function.
pub struct FfiBlog {
    pub(crate) inner: tumblr_core::Blog,
}

/// Copy a Rust string into a heap C string owned by the caller, cut at the
/// first interior NUL the same way a C reader would see it.
pub(crate) fn c_string(s: impl Into<Vec<u8>>) -> *mut c_char {
    let mut bytes = s.into();
    if let Some(nul) = bytes.iter().position(|&b| b == 0) {
        bytes.truncate(nul);
    }
    CString::new(bytes).unwrap_or_default().into_raw()
}

fn c_string_opt(s: Option<String>) -> *mut c_char {
    s.map_or(std::ptr::null_mut(), |s| c_string(s))
}

/// Read a caller-owned C string. Null maps to `None`. Invalid UTF-8 becomes
/// U+FFFD: `post_type` and `filter` then fail validation, while a `tag` is
/// sent with the replacement characters percent-encoded.
///
/// # Safety
/// `p` must be null or point to a NUL-terminated string.
pub(crate) unsafe fn read_str(p: *const c_char) -> Option<String> {
    if p.is_null() {
        return None;
    }
    Some(CStr::from_ptr(p).to_string_lossy().into_owned())
}

// ---------------------------------------------------------------------------
// Request parameters (caller-provided)
// ---------------------------------------------------------------------------

/// Parameters for `tumblr_build_posts`. Null strings mean "unset".
#[repr(C)]
pub struct FfiPostRequestParams {
    pub post_type: *const c_char,
    pub has_id: bool,
    pub id: u64,
    pub tag: *const c_char,
    pub limit: i32,
    pub has_offset: bool,
    pub offset: u64,
    pub reblog_info: bool,
    pub notes_info: bool,
    pub filter: *const c_char,
}

impl FfiPostRequestParams {
    /// # Safety
    /// Every string field must be null or point to a NUL-terminated string.
    pub(crate) unsafe fn to_core(&self) -> Result<PostRequestParams, ApiError> {
        let post_type = match read_str(self.post_type) {
            Some(s) if !s.is_empty() => Some(s.parse::<PostType>()?),
            _ => None,
        };
        Ok(PostRequestParams {
            post_type,
            id: self.has_id.then_some(self.id),
            tag: read_str(self.tag),
            limit: self.limit,
            offset: self.has_offset.then_some(self.offset),
            reblog_info: self.reblog_info,
            notes_info: self.notes_info,
            filter: read_str(self.filter),
        })
    }
}

/// Parameters for `tumblr_build_likes`.
#[repr(C)]
pub struct FfiLikesRequestParams {
    pub limit: i32,
    pub has_offset: bool,
    pub offset: u64,
}

impl From<&FfiLikesRequestParams> for LikesRequestParams {
    fn from(p: &FfiLikesRequestParams) -> Self {
        LikesRequestParams {
            limit: p.limit,
            offset: p.has_offset.then_some(p.offset),
        }
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug)]
pub enum FfiHttpMethod {
    Get = 0,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
        }
    }
}

/// A single query parameter as a key-value pair of C strings.
#[repr(C)]
pub struct FfiQueryParam {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// A request descriptor as C-compatible plain data.
///
/// `full_url` is ready to hand to an HTTP client; `url` and `query` expose
/// the same information unrendered.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub full_url: *mut c_char,
    pub query: *mut FfiQueryParam,
    pub query_len: u32,
}

impl FfiHttpRequest {
    fn from_core(req: HttpRequest) -> Result<Self, ApiError> {
        let full_url = c_string(req.full_url()?);
        let query_len = req.query.len() as u32;
        let query = if req.query.is_empty() {
            std::ptr::null_mut()
        } else {
            let params: Box<[FfiQueryParam]> = req
                .query
                .into_iter()
                .map(|(k, v)| FfiQueryParam {
                    key: c_string(k),
                    value: c_string(v),
                })
                .collect();
            Box::into_raw(params) as *mut FfiQueryParam
        };

        Ok(FfiHttpRequest {
            method: req.method.into(),
            url: c_string(req.url),
            full_url,
            query,
            query_len,
        })
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing a request,
/// then passes a pointer to a `tumblr_parse_*` function. The FFI layer reads
/// but does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiTumblrResult`.
#[repr(C)]
#[derive(Debug)]
pub enum FfiErrorCode {
    Ok = 0,
    MalformedBaseUrl = 1,
    InvalidLimit = 2,
    InvalidFilter = 3,
    InvalidPostType = 4,
    NotFound = 5,
    Http = 6,
    Deserialization = 7,
    Panic = 8,
    NullArg = 9,
}

/// Tag that tells `tumblr_free_result` what `FfiTumblrResult::data` points to.
#[repr(C)]
#[derive(Debug)]
pub enum FfiDataTag {
    None = 0,
    Request = 1,
    PostList = 2,
}

/// A single post exposed to C. Optional text fields are null when absent;
/// `note_count` is 0 when the API omitted it.
#[repr(C)]
pub struct FfiPost {
    pub id: u64,
    pub blog_name: *mut c_char,
    pub post_url: *mut c_char,
    pub post_type: *mut c_char,
    pub timestamp: u64,
    pub note_count: u64,
    pub title: *mut c_char,
    pub body: *mut c_char,
    pub caption: *mut c_char,
}

impl From<Post> for FfiPost {
    fn from(post: Post) -> Self {
        FfiPost {
            id: post.id,
            blog_name: c_string(post.blog_name),
            post_url: c_string(post.post_url),
            post_type: c_string(post.post_type.as_str()),
            timestamp: post.timestamp,
            note_count: post.note_count.unwrap_or(0),
            title: c_string_opt(post.title),
            body: c_string_opt(post.body),
            caption: c_string_opt(post.caption),
        }
    }
}

/// A list of posts exposed to C.
#[repr(C)]
pub struct FfiPostList {
    pub items: *mut FfiPost,
    pub len: u32,
}

/// Result envelope for every build and parse operation.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the payload tagged by `data_tag`.
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string, and `data` is null.
#[repr(C)]
pub struct FfiTumblrResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub data: *mut std::ffi::c_void,
}

impl FfiTumblrResult {
    fn boxed(self) -> *mut Self {
        Box::into_raw(Box::new(self))
    }

    fn failure(error_code: FfiErrorCode, http_status: u16, msg: &str) -> *mut Self {
        FfiTumblrResult {
            error_code,
            error_message: c_string(msg),
            http_status,
            data_tag: FfiDataTag::None,
            data: std::ptr::null_mut(),
        }
        .boxed()
    }

    /// Build a success result carrying an `FfiHttpRequest`.
    pub(crate) fn ok_request(req: HttpRequest) -> *mut Self {
        let ffi_req = match FfiHttpRequest::from_core(req) {
            Ok(r) => Box::new(r),
            Err(e) => return Self::from_error(e),
        };
        FfiTumblrResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            data_tag: FfiDataTag::Request,
            data: Box::into_raw(ffi_req) as *mut std::ffi::c_void,
        }
        .boxed()
    }

    /// Build a success result carrying an `FfiPostList`.
    pub(crate) fn ok_post_list(posts: Vec<Post>) -> *mut Self {
        let len = posts.len() as u32;
        let items = if posts.is_empty() {
            std::ptr::null_mut()
        } else {
            let items: Box<[FfiPost]> = posts.into_iter().map(FfiPost::from).collect();
            Box::into_raw(items) as *mut FfiPost
        };

        let ffi_list = Box::new(FfiPostList { items, len });
        FfiTumblrResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            data_tag: FfiDataTag::PostList,
            data: Box::into_raw(ffi_list) as *mut std::ffi::c_void,
        }
        .boxed()
    }

    /// Build an error result from an `ApiError`.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let msg = err.to_string();
        let (error_code, http_status) = match err {
            ApiError::MalformedBaseUrl(_) => (FfiErrorCode::MalformedBaseUrl, 0),
            ApiError::InvalidLimit(_) => (FfiErrorCode::InvalidLimit, 0),
            ApiError::InvalidFilter(_) => (FfiErrorCode::InvalidFilter, 0),
            ApiError::InvalidPostType(_) => (FfiErrorCode::InvalidPostType, 0),
            ApiError::NotFound => (FfiErrorCode::NotFound, 404),
            ApiError::HttpError { status, .. } => (FfiErrorCode::Http, status),
            ApiError::DeserializationError(_) => (FfiErrorCode::Deserialization, 0),
        };
        Self::failure(error_code, http_status, &msg)
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::NullArg, 0, &format!("null argument: {name}"))
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiErrorCode::Panic, 0, msg)
    }
}
