//! C-ABI wrapper around `tumblr-core`.
//!
//! # Overview
//! Exposes blog request building and response parsing through `extern "C"`
//! functions so any language with a C FFI can drive the blog API without
//! linking to serde or a URL library directly.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Per-operation `build_*` / `parse_*` mirrors the core API 1:1.
//! - A single `FfiTumblrResult` envelope with `FfiDataTag` + `void* data`
//!   carries requests, post lists and errors uniformly, so a rejected
//!   parameter reports why instead of returning a bare null.
//! - The C caller owns all returned pointers and must call the matching
//!   `tumblr_*_free` / `tumblr_free_*` function to release them.

pub mod types;

use std::ffi::CString;
use std::os::raw::c_char;
use std::panic::catch_unwind;

use tumblr_core::http::HttpResponse;
use tumblr_core::params::{LikesRequestParams, PostRequestParams};

use types::*;

// ---------------------------------------------------------------------------
// Blog lifecycle
// ---------------------------------------------------------------------------

/// Create a `Blog` for `hostname` against the public API.
///
/// Returns null if `hostname` is null or if an internal panic occurs.
/// The caller must free the returned pointer with `tumblr_blog_free`.
#[unsafe(no_mangle)]
pub extern "C" fn tumblr_blog_new(hostname: *const c_char) -> *mut FfiBlog {
    catch_unwind(|| {
        let Some(hostname) = (unsafe { read_str(hostname) }) else {
            return std::ptr::null_mut();
        };
        let blog = tumblr_core::Blog::new(&hostname);
        Box::into_raw(Box::new(FfiBlog { inner: blog }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Create a `Blog` for `hostname` against another API root.
///
/// Returns null if either argument is null. A malformed `api_base` is
/// reported by the first build call.
#[unsafe(no_mangle)]
pub extern "C" fn tumblr_blog_with_api_base(
    hostname: *const c_char,
    api_base: *const c_char,
) -> *mut FfiBlog {
    catch_unwind(|| {
        let (Some(hostname), Some(api_base)) =
            (unsafe { read_str(hostname) }, unsafe { read_str(api_base) })
        else {
            return std::ptr::null_mut();
        };
        let blog = tumblr_core::Blog::with_api_base(&hostname, &api_base);
        Box::into_raw(Box::new(FfiBlog { inner: blog }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a `Blog` created by `tumblr_blog_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn tumblr_blog_free(blog: *mut FfiBlog) {
    if !blog.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(blog) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build a request for the blog's posts.
///
/// `params` may be null for defaults. Returns a result with
/// `data_tag = Request` on success, or the validation error.
#[unsafe(no_mangle)]
pub extern "C" fn tumblr_build_posts(
    blog: *const FfiBlog,
    params: *const FfiPostRequestParams,
) -> *mut FfiTumblrResult {
    catch_unwind(|| {
        if blog.is_null() {
            return FfiTumblrResult::null_arg("blog");
        }
        let blog = unsafe { &*blog };
        let params = if params.is_null() {
            PostRequestParams::default()
        } else {
            match unsafe { (*params).to_core() } {
                Ok(p) => p,
                Err(e) => return FfiTumblrResult::from_error(e),
            }
        };
        match blog.inner.build_posts(&params) {
            Ok(req) => FfiTumblrResult::ok_request(req),
            Err(e) => FfiTumblrResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiTumblrResult::panic("panic in tumblr_build_posts"))
}

/// Build a request for the posts the blog liked.
///
/// `params` may be null for the first page at server defaults.
#[unsafe(no_mangle)]
pub extern "C" fn tumblr_build_likes(
    blog: *const FfiBlog,
    params: *const FfiLikesRequestParams,
) -> *mut FfiTumblrResult {
    catch_unwind(|| {
        if blog.is_null() {
            return FfiTumblrResult::null_arg("blog");
        }
        let blog = unsafe { &*blog };
        let result = if params.is_null() {
            blog.inner.build_likes()
        } else {
            let params = LikesRequestParams::from(unsafe { &*params });
            blog.inner.build_likes_page(&params)
        };
        match result {
            Ok(req) => FfiTumblrResult::ok_request(req),
            Err(e) => FfiTumblrResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiTumblrResult::panic("panic in tumblr_build_likes"))
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

/// Convert an `FfiHttpResponse` to a core `HttpResponse`. A null body is an
/// empty body.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    HttpResponse {
        status: resp.status,
        body: unsafe { read_str(resp.body) }.unwrap_or_default(),
    }
}

/// Parse the response to a `tumblr_build_posts` request.
///
/// Returns a result with `data_tag = PostList` on success.
#[unsafe(no_mangle)]
pub extern "C" fn tumblr_parse_posts(
    blog: *const FfiBlog,
    response: *const FfiHttpResponse,
) -> *mut FfiTumblrResult {
    catch_unwind(|| {
        if blog.is_null() {
            return FfiTumblrResult::null_arg("blog");
        }
        if response.is_null() {
            return FfiTumblrResult::null_arg("response");
        }
        let blog = unsafe { &*blog };
        let core_resp = ffi_response_to_core(unsafe { &*response });
        match blog.inner.parse_posts(core_resp) {
            Ok(posts) => FfiTumblrResult::ok_post_list(posts),
            Err(e) => FfiTumblrResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiTumblrResult::panic("panic in tumblr_parse_posts"))
}

/// Parse the response to a `tumblr_build_likes` request.
///
/// Returns a result with `data_tag = PostList` on success.
#[unsafe(no_mangle)]
pub extern "C" fn tumblr_parse_likes(
    blog: *const FfiBlog,
    response: *const FfiHttpResponse,
) -> *mut FfiTumblrResult {
    catch_unwind(|| {
        if blog.is_null() {
            return FfiTumblrResult::null_arg("blog");
        }
        if response.is_null() {
            return FfiTumblrResult::null_arg("response");
        }
        let blog = unsafe { &*blog };
        let core_resp = ffi_response_to_core(unsafe { &*response });
        match blog.inner.parse_likes(core_resp) {
            Ok(posts) => FfiTumblrResult::ok_post_list(posts),
            Err(e) => FfiTumblrResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiTumblrResult::panic("panic in tumblr_parse_likes"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiTumblrResult` returned by any `tumblr_build_*` or
/// `tumblr_parse_*` function. Safe to call with null. Uses `data_tag` to
/// determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn tumblr_free_result(result: *mut FfiTumblrResult) {
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
            FfiDataTag::Request => {
                let req = unsafe { Box::from_raw(result.data as *mut FfiHttpRequest) };
                free_ffi_request_fields(&req);
            }
            FfiDataTag::PostList => {
                let list = unsafe { Box::from_raw(result.data as *mut FfiPostList) };
                if !list.items.is_null() && list.len > 0 {
                    let items = unsafe {
                        Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                            list.items,
                            list.len as usize,
                        ))
                    };
                    for item in items.iter() {
                        free_ffi_post_fields(item);
                    }
                }
            }
            FfiDataTag::None => {}
        }
    });
}

/// Free the strings and query array of an `FfiHttpRequest` (but not the
/// struct itself).
fn free_ffi_request_fields(req: &FfiHttpRequest) {
    free_c_string(req.url);
    free_c_string(req.full_url);
    if !req.query.is_null() && req.query_len > 0 {
        let params = unsafe {
            Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                req.query,
                req.query_len as usize,
            ))
        };
        for p in params.iter() {
            free_c_string(p.key);
            free_c_string(p.value);
        }
    }
}

/// Free the C-string fields of an `FfiPost` (but not the struct itself).
fn free_ffi_post_fields(post: &FfiPost) {
    for s in [
        post.blog_name,
        post.post_url,
        post.post_type,
        post.title,
        post.body,
        post.caption,
    ] {
        free_c_string(s);
    }
}

fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn tumblr_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| free_c_string(s));
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::{CStr, CString};

    fn new_blog() -> *mut FfiBlog {
        let hostname = CString::new("example.tumblr.com").unwrap();
        tumblr_blog_new(hostname.as_ptr())
    }

    fn str_at(p: *const c_char) -> &'static str {
        unsafe { CStr::from_ptr(p) }.to_str().unwrap()
    }

    fn empty_params() -> FfiPostRequestParams {
        FfiPostRequestParams {
            post_type: std::ptr::null(),
            has_id: false,
            id: 0,
            tag: std::ptr::null(),
            limit: 0,
            has_offset: false,
            offset: 0,
            reblog_info: false,
            notes_info: false,
            filter: std::ptr::null(),
        }
    }

    fn request_of(result: *mut FfiTumblrResult) -> &'static FfiHttpRequest {
        let r = unsafe { &*result };
        assert!(matches!(r.error_code, FfiErrorCode::Ok));
        assert!(matches!(r.data_tag, FfiDataTag::Request));
        unsafe { &*(r.data as *const FfiHttpRequest) }
    }

    #[test]
    fn blog_new_and_free() {
        let blog = new_blog();
        assert!(!blog.is_null());
        tumblr_blog_free(blog);
    }

    #[test]
    fn blog_new_null_returns_null() {
        assert!(tumblr_blog_new(std::ptr::null()).is_null());
        let base = CString::new("http://localhost:3000/v2/blog/").unwrap();
        assert!(tumblr_blog_with_api_base(std::ptr::null(), base.as_ptr()).is_null());
    }

    #[test]
    fn blog_free_null_is_safe() {
        tumblr_blog_free(std::ptr::null_mut());
    }

    #[test]
    fn build_posts_null_params_uses_defaults() {
        let blog = new_blog();
        let result = tumblr_build_posts(blog, std::ptr::null());
        let req = request_of(result);
        assert!(matches!(req.method, FfiHttpMethod::Get));
        assert_eq!(str_at(req.url), "http://api.tumblr.com/v2/blog/example.tumblr.com/posts");
        assert_eq!(str_at(req.full_url), str_at(req.url));
        assert_eq!(req.query_len, 0);
        assert!(req.query.is_null());

        tumblr_free_result(result);
        tumblr_blog_free(blog);
    }

    #[test]
    fn build_posts_with_type_id_and_tag() {
        let blog = new_blog();
        let post_type = CString::new("photo").unwrap();
        let tag = CString::new("cats").unwrap();
        let params = FfiPostRequestParams {
            post_type: post_type.as_ptr(),
            has_id: true,
            id: 42,
            tag: tag.as_ptr(),
            ..empty_params()
        };
        let result = tumblr_build_posts(blog, &params);
        let req = request_of(result);
        assert_eq!(
            str_at(req.full_url),
            "http://api.tumblr.com/v2/blog/example.tumblr.com/posts/photo?id=42&tag=cats"
        );
        assert_eq!(req.query_len, 2);
        let query = unsafe { std::slice::from_raw_parts(req.query, req.query_len as usize) };
        assert_eq!(str_at(query[0].key), "id");
        assert_eq!(str_at(query[0].value), "42");
        assert_eq!(str_at(query[1].key), "tag");
        assert_eq!(str_at(query[1].value), "cats");

        tumblr_free_result(result);
        tumblr_blog_free(blog);
    }

    #[test]
    fn build_posts_invalid_limit_reports_error() {
        let blog = new_blog();
        let params = FfiPostRequestParams { limit: 25, ..empty_params() };
        let result = tumblr_build_posts(blog, &params);
        let r = unsafe { &*result };
        assert!(matches!(r.error_code, FfiErrorCode::InvalidLimit));
        assert!(matches!(r.data_tag, FfiDataTag::None));
        assert!(r.data.is_null());
        assert!(str_at(r.error_message).contains("25"));

        tumblr_free_result(result);
        tumblr_blog_free(blog);
    }

    #[test]
    fn build_posts_invalid_filter_reports_error() {
        let blog = new_blog();
        let filter = CString::new("xml").unwrap();
        let params = FfiPostRequestParams { filter: filter.as_ptr(), ..empty_params() };
        let result = tumblr_build_posts(blog, &params);
        let r = unsafe { &*result };
        assert!(matches!(r.error_code, FfiErrorCode::InvalidFilter));

        tumblr_free_result(result);
        tumblr_blog_free(blog);
    }

    #[test]
    fn build_posts_unknown_type_reports_error() {
        let blog = new_blog();
        let post_type = CString::new("gif").unwrap();
        let params = FfiPostRequestParams { post_type: post_type.as_ptr(), ..empty_params() };
        let result = tumblr_build_posts(blog, &params);
        let r = unsafe { &*result };
        assert!(matches!(r.error_code, FfiErrorCode::InvalidPostType));

        tumblr_free_result(result);
        tumblr_blog_free(blog);
    }

    #[test]
    fn build_posts_malformed_base_reports_error() {
        let hostname = CString::new("example.tumblr.com").unwrap();
        let base = CString::new("not a url").unwrap();
        let blog = tumblr_blog_with_api_base(hostname.as_ptr(), base.as_ptr());
        let result = tumblr_build_posts(blog, std::ptr::null());
        let r = unsafe { &*result };
        assert!(matches!(r.error_code, FfiErrorCode::MalformedBaseUrl));

        tumblr_free_result(result);
        tumblr_blog_free(blog);
    }

    #[test]
    fn build_posts_non_utf8_tag_is_sent_replaced() {
        let blog = new_blog();
        let tag = CString::new(vec![b'c', b'a', 0xff, b't']).unwrap();
        let params = FfiPostRequestParams { tag: tag.as_ptr(), ..empty_params() };
        let result = tumblr_build_posts(blog, &params);
        let req = request_of(result);
        assert_eq!(
            str_at(req.full_url),
            "http://api.tumblr.com/v2/blog/example.tumblr.com/posts?tag=ca%EF%BF%BDt"
        );

        tumblr_free_result(result);
        tumblr_blog_free(blog);
    }

    #[test]
    fn build_posts_non_utf8_filter_reports_error() {
        let blog = new_blog();
        let filter = CString::new(vec![b'h', 0xfe, b'm', b'l']).unwrap();
        let params = FfiPostRequestParams { filter: filter.as_ptr(), ..empty_params() };
        let result = tumblr_build_posts(blog, &params);
        let r = unsafe { &*result };
        assert!(matches!(r.error_code, FfiErrorCode::InvalidFilter));

        tumblr_free_result(result);
        tumblr_blog_free(blog);
    }

    #[test]
    fn build_posts_null_blog_returns_null_arg() {
        let result = tumblr_build_posts(std::ptr::null(), std::ptr::null());
        let r = unsafe { &*result };
        assert!(matches!(r.error_code, FfiErrorCode::NullArg));
        tumblr_free_result(result);
    }

    #[test]
    fn build_likes_with_and_without_params() {
        let blog = new_blog();
        let result = tumblr_build_likes(blog, std::ptr::null());
        let req = request_of(result);
        assert_eq!(str_at(req.full_url), "http://api.tumblr.com/v2/blog/example.tumblr.com/likes");
        tumblr_free_result(result);

        let params = FfiLikesRequestParams { limit: 10, has_offset: true, offset: 20 };
        let result = tumblr_build_likes(blog, &params);
        let req = request_of(result);
        assert_eq!(
            str_at(req.full_url),
            "http://api.tumblr.com/v2/blog/example.tumblr.com/likes?limit=10&offset=20"
        );
        tumblr_free_result(result);

        tumblr_blog_free(blog);
    }

    #[test]
    fn parse_posts_two_items() {
        let blog = new_blog();
        let body = CString::new(
            r#"{"meta":{"status":200,"msg":"OK"},"response":{"posts":[
                {"id":1,"blog_name":"example","post_url":"http://example.tumblr.com/post/1",
                 "type":"text","timestamp":10,"title":"First","note_count":3},
                {"id":2,"blog_name":"example","post_url":"http://example.tumblr.com/post/2",
                 "type":"photo","timestamp":20,"caption":"Second"}
            ]}}"#,
        )
        .unwrap();
        let resp = FfiHttpResponse { status: 200, body: body.as_ptr() };
        let result = tumblr_parse_posts(blog, &resp);
        let r = unsafe { &*result };
        assert!(matches!(r.error_code, FfiErrorCode::Ok));
        assert!(matches!(r.data_tag, FfiDataTag::PostList));

        let list = unsafe { &*(r.data as *const FfiPostList) };
        assert_eq!(list.len, 2);
        let items = unsafe { std::slice::from_raw_parts(list.items, list.len as usize) };
        assert_eq!(items[0].id, 1);
        assert_eq!(str_at(items[0].post_type), "text");
        assert_eq!(str_at(items[0].title), "First");
        assert_eq!(items[0].note_count, 3);
        assert!(items[0].caption.is_null());
        assert_eq!(str_at(items[1].post_type), "photo");
        assert_eq!(str_at(items[1].caption), "Second");
        assert_eq!(items[1].note_count, 0);
        assert!(items[1].title.is_null());

        tumblr_free_result(result);
        tumblr_blog_free(blog);
    }

    #[test]
    fn parse_posts_title_with_nul_is_cut_at_the_nul() {
        let blog = new_blog();
        let body = CString::new(
            r#"{"meta":{"status":200,"msg":"OK"},"response":{"posts":[
                {"id":1,"blog_name":"example","post_url":"http://example.tumblr.com/post/1",
                 "type":"text","timestamp":10,"title":"before\u0000after"}]}}"#,
        )
        .unwrap();
        let resp = FfiHttpResponse { status: 200, body: body.as_ptr() };
        let result = tumblr_parse_posts(blog, &resp);
        let r = unsafe { &*result };
        assert!(matches!(r.error_code, FfiErrorCode::Ok));
        let list = unsafe { &*(r.data as *const FfiPostList) };
        let items = unsafe { std::slice::from_raw_parts(list.items, list.len as usize) };
        assert_eq!(str_at(items[0].title), "before");
        assert_eq!(str_at(items[0].blog_name), "example");

        tumblr_free_result(result);
        tumblr_blog_free(blog);
    }

    #[test]
    fn parse_posts_empty() {
        let blog = new_blog();
        let body = CString::new(r#"{"meta":{"status":200,"msg":"OK"},"response":{"posts":[]}}"#).unwrap();
        let resp = FfiHttpResponse { status: 200, body: body.as_ptr() };
        let result = tumblr_parse_posts(blog, &resp);
        let r = unsafe { &*result };
        let list = unsafe { &*(r.data as *const FfiPostList) };
        assert_eq!(list.len, 0);
        assert!(list.items.is_null());

        tumblr_free_result(result);
        tumblr_blog_free(blog);
    }

    #[test]
    fn parse_posts_not_found() {
        let blog = new_blog();
        let resp = FfiHttpResponse { status: 404, body: std::ptr::null() };
        let result = tumblr_parse_posts(blog, &resp);
        let r = unsafe { &*result };
        assert!(matches!(r.error_code, FfiErrorCode::NotFound));
        assert_eq!(r.http_status, 404);
        assert!(!r.error_message.is_null());

        tumblr_free_result(result);
        tumblr_blog_free(blog);
    }

    #[test]
    fn parse_likes_http_error_keeps_status() {
        let blog = new_blog();
        let body = CString::new("slow down").unwrap();
        let resp = FfiHttpResponse { status: 429, body: body.as_ptr() };
        let result = tumblr_parse_likes(blog, &resp);
        let r = unsafe { &*result };
        assert!(matches!(r.error_code, FfiErrorCode::Http));
        assert_eq!(r.http_status, 429);

        tumblr_free_result(result);
        tumblr_blog_free(blog);
    }

    #[test]
    fn parse_likes_success() {
        let blog = new_blog();
        let body = CString::new(
            r#"{"meta":{"status":200,"msg":"OK"},"response":{"liked_count":1,"liked_posts":[
                {"id":9,"blog_name":"other","post_url":"http://other.tumblr.com/post/9",
                 "type":"quote","timestamp":5}]}}"#,
        )
        .unwrap();
        let resp = FfiHttpResponse { status: 200, body: body.as_ptr() };
        let result = tumblr_parse_likes(blog, &resp);
        let r = unsafe { &*result };
        assert!(matches!(r.error_code, FfiErrorCode::Ok));
        let list = unsafe { &*(r.data as *const FfiPostList) };
        assert_eq!(list.len, 1);
        let items = unsafe { std::slice::from_raw_parts(list.items, list.len as usize) };
        assert_eq!(str_at(items[0].blog_name), "other");

        tumblr_free_result(result);
        tumblr_blog_free(blog);
    }

    #[test]
    fn parse_null_response_returns_null_arg() {
        let blog = new_blog();
        let result = tumblr_parse_posts(blog, std::ptr::null());
        let r = unsafe { &*result };
        assert!(matches!(r.error_code, FfiErrorCode::NullArg));

        tumblr_free_result(result);
        tumblr_blog_free(blog);
    }

    #[test]
    fn free_result_null_is_safe() {
        tumblr_free_result(std::ptr::null_mut());
    }

    #[test]
    fn free_string_null_is_safe() {
        tumblr_free_string(std::ptr::null_mut());
    }
}
