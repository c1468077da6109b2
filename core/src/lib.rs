//! Synchronous API client core for reading blogs over the Tumblr v2 API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, making the core fully deterministic and testable.
//!
//! # Design
//! - `Blog` is a plain value: hostname plus API root.
//! - Each read is split into `build_*` (produces a request) and `parse_*`
//!   (consumes a response), so the I/O boundary is explicit.
//! - Parameters are validated before a request exists; a failed build
//!   returns an error and nothing else.
//! - Types use owned `String` / collection fields to simplify FFI mapping.

pub mod blog;
pub mod client;
pub mod error;
pub mod http;
pub mod params;
pub mod types;

pub use blog::{Blog, API_BASE};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use params::{LikesRequestParams, PostRequestParams, PostType, MAX_LIMIT};
pub use types::Post;
