//! Decoded API entities.
//!
//! # Design
//! These types cover the fields a caller needs to list and link posts; every
//! other field the API sends is ignored. They are defined independently from
//! the mock-server's schema so integration tests catch drift between the two.

use serde::{Deserialize, Serialize};

use crate::params::PostType;

/// One published item on a blog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    pub id: u64,
    pub blog_name: String,
    pub post_url: String,
    #[serde(rename = "type")]
    pub post_type: PostType,
    pub timestamp: u64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// Status block the API puts next to every payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Meta {
    pub status: u16,
    #[serde(default)]
    pub msg: String,
}

/// `{"meta": ..., "response": ...}` wrapper around every payload. Proxies
/// and mirrors sometimes strip `meta`, so it is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub meta: Option<Meta>,
    pub response: T,
}

/// Payload of the posts endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PostsResponse {
    pub posts: Vec<Post>,
    #[serde(default)]
    pub total_posts: Option<u64>,
}

/// Payload of the likes endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct LikesResponse {
    pub liked_posts: Vec<Post>,
    #[serde(default)]
    pub liked_count: Option<u64>,
}
