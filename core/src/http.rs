//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `HttpRequest` values and parses `HttpResponse` values without
//! ever touching the network; the caller (host) executes the actual I/O.
//!
//! Query parameters live in a `BTreeMap` so keys stay unique and two
//! descriptors built from equal inputs compare equal regardless of insertion
//! order. The query string is rendered only when the host asks for
//! `full_url`.

use std::collections::BTreeMap;

use url::Url;

use crate::error::ApiError;

/// HTTP method for a request. The blog read endpoints are all `GET`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
        }
    }
}

/// A fully specified, not-yet-executed request.
///
/// Built by `Blog::build_*` methods. `url` carries scheme, host and joined
/// path but no query string; `query` holds every parameter that was set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: BTreeMap<String, String>,
}

impl HttpRequest {
    /// The absolute URL with the form-encoded query string attached.
    ///
    /// Any query or fragment already on `url` is replaced, so the parameters
    /// appear exactly once.
    pub fn full_url(&self) -> Result<String, ApiError> {
        let mut url = Url::parse(&self.url)
            .map_err(|e| ApiError::MalformedBaseUrl(format!("{}: {e}", self.url)))?;
        url.set_fragment(None);
        url.set_query(None);
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url.into())
    }
}

/// An HTTP response described as plain data.
///
/// Constructed by the caller after executing an `HttpRequest`, then passed
/// to `Blog::parse_*` methods for decoding.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}
