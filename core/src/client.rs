//! Stateless request builder and response parser for the blog API.
//!
//! # Design
//! `Blog` carries only its hostname and API root. Each read is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. The caller executes the HTTP round-trip
//! in between, keeping the core deterministic and free of I/O.
//!
//! Parameters are validated before any URL work starts. Query parameters
//! accumulate in one map owned by the call and are moved into the request
//! once at the end.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::blog::{join_path, Blog};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::params::{LikesRequestParams, PostRequestParams};
use crate::types::{Envelope, LikesResponse, Post, PostsResponse};

impl Blog {
    /// Request for the posts this blog published.
    pub fn build_posts(&self, params: &PostRequestParams) -> Result<HttpRequest, ApiError> {
        params.validate()?;

        let mut url = self.entity_url("posts")?;
        if let Some(post_type) = params.post_type {
            let path = join_path(url.path(), [post_type.as_str()]);
            url.set_path(&path);
        }

        let mut query = BTreeMap::new();
        if let Some(id) = params.id {
            query.insert("id".to_string(), id.to_string());
        }
        if let Some(tag) = params.tag.as_deref().filter(|t| !t.is_empty()) {
            query.insert("tag".to_string(), tag.to_string());
        }
        if params.limit != 0 {
            query.insert("limit".to_string(), params.limit.to_string());
        }
        if let Some(offset) = params.offset {
            query.insert("offset".to_string(), offset.to_string());
        }
        if params.reblog_info {
            query.insert("reblog_info".to_string(), "true".to_string());
        }
        if params.notes_info {
            query.insert("notes_info".to_string(), "true".to_string());
        }
        if let Some(filter) = params.filter.as_deref().filter(|f| !f.is_empty()) {
            query.insert("filter".to_string(), filter.to_string());
        }

        debug!(url = %url, params = query.len(), "built posts request");
        Ok(get(url.into(), query))
    }

    /// Request for the posts this blog liked, first page at server defaults.
    pub fn build_likes(&self) -> Result<HttpRequest, ApiError> {
        self.build_likes_page(&LikesRequestParams::default())
    }

    pub fn build_likes_page(&self, params: &LikesRequestParams) -> Result<HttpRequest, ApiError> {
        params.validate()?;

        let url = self.entity_url("likes")?;
        let mut query = BTreeMap::new();
        if params.limit != 0 {
            query.insert("limit".to_string(), params.limit.to_string());
        }
        if let Some(offset) = params.offset {
            query.insert("offset".to_string(), offset.to_string());
        }

        debug!(url = %url, params = query.len(), "built likes request");
        Ok(get(url.into(), query))
    }

    pub fn parse_posts(&self, response: HttpResponse) -> Result<Vec<Post>, ApiError> {
        let payload: PostsResponse = decode(&response)?;
        debug!(blog = %self.base_hostname(), posts = payload.posts.len(), "decoded posts");
        Ok(payload.posts)
    }

    pub fn parse_likes(&self, response: HttpResponse) -> Result<Vec<Post>, ApiError> {
        let payload: LikesResponse = decode(&response)?;
        debug!(blog = %self.base_hostname(), posts = payload.liked_posts.len(), "decoded likes");
        Ok(payload.liked_posts)
    }
}

fn get(url: String, query: BTreeMap<String, String>) -> HttpRequest {
    HttpRequest {
        method: HttpMethod::Get,
        url,
        query,
    }
}

/// Check the HTTP status and the envelope's `meta.status`, then unwrap the
/// `response` payload.
fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    check_status(response, 200)?;
    let envelope: Envelope<T> = serde_json::from_str(&response.body)
        .map_err(|e| ApiError::DeserializationError(e.to_string()))?;
    if let Some(meta) = envelope.meta.filter(|m| m.status != 200) {
        return Err(ApiError::HttpError {
            status: meta.status,
            body: meta.msg,
        });
    }
    Ok(envelope.response)
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
