//! Request parameter types and their validation rules.
//!
//! # Design
//! Optional fields are `Option`s so "unset" never collides with a legitimate
//! zero value. `limit` stays a plain integer where `0` means "server
//! default", matching how the API itself treats it. Validation runs limit
//! first, then filter, and stops at the first violation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Largest page size the API accepts.
pub const MAX_LIMIT: i32 = 20;

/// The kinds of post a blog can publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    Text,
    Quote,
    Link,
    Answer,
    Video,
    Audio,
    Photo,
    Chat,
}

impl PostType {
    pub const ALL: [PostType; 8] = [
        PostType::Text,
        PostType::Quote,
        PostType::Link,
        PostType::Answer,
        PostType::Video,
        PostType::Audio,
        PostType::Photo,
        PostType::Chat,
    ];

    /// Wire form, also used as the URL path segment.
    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::Text => "text",
            PostType::Quote => "quote",
            PostType::Link => "link",
            PostType::Answer => "answer",
            PostType::Video => "video",
            PostType::Audio => "audio",
            PostType::Photo => "photo",
            PostType::Chat => "chat",
        }
    }
}

impl fmt::Display for PostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostType {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PostType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ApiError::InvalidPostType(s.to_string()))
    }
}

/// Parameters for `Blog::build_posts`.
///
/// `Default` yields a request for any post type with no query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostRequestParams {
    pub post_type: Option<PostType>,
    pub id: Option<u64>,
    pub tag: Option<String>,
    /// Page size in `0..=20`; `0` leaves it to the server.
    pub limit: i32,
    pub offset: Option<u64>,
    pub reblog_info: bool,
    pub notes_info: bool,
    /// `"html"`, `"raw"`, or empty for the default text format.
    pub filter: Option<String>,
}

impl PostRequestParams {
    /// Check the limit range, then the filter value.
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_limit(self.limit)?;
        match self.filter.as_deref() {
            None | Some("") | Some("html") | Some("raw") => Ok(()),
            Some(other) => Err(ApiError::InvalidFilter(other.to_string())),
        }
    }
}

/// Pagination for `Blog::build_likes_page`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LikesRequestParams {
    pub limit: i32,
    pub offset: Option<u64>,
}

impl LikesRequestParams {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_limit(self.limit)
    }
}

fn validate_limit(limit: i32) -> Result<(), ApiError> {
    if (0..=MAX_LIMIT).contains(&limit) {
        Ok(())
    } else {
        Err(ApiError::InvalidLimit(limit))
    }
}
