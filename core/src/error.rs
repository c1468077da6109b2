//! Error types for the Tumblr blog API client.
//!
//! # Design
//! Build-time failures (`MalformedBaseUrl`, `InvalidLimit`, `InvalidFilter`,
//! `InvalidPostType`) are raised before any descriptor exists, so a caller
//! never receives a half-built request. Parse-time failures mirror the HTTP
//! outcome: `NotFound` for an unknown blog, `HttpError` for every other
//! non-200 status, `DeserializationError` for a body that is not the expected
//! envelope.

use std::fmt;

/// Errors returned by request building and response parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The API base could not be parsed as an absolute URL.
    MalformedBaseUrl(String),

    /// `limit` was outside `0..=20`.
    InvalidLimit(i32),

    /// `filter` was set to something other than `"html"` or `"raw"`.
    InvalidFilter(String),

    /// A post type string did not name one of the known post types.
    InvalidPostType(String),

    /// The server returned 404: the blog does not exist.
    NotFound,

    /// The server returned a non-200 status other than 404.
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    DeserializationError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::MalformedBaseUrl(msg) => write!(f, "malformed API base URL: {msg}"),
            ApiError::InvalidLimit(limit) => {
                write!(f, "post request parameter limit out of range: {limit}")
            }
            ApiError::InvalidFilter(filter) => {
                write!(f, r#"filter, if specified, must be either "html" or "raw", got "{filter}""#)
            }
            ApiError::InvalidPostType(kind) => write!(f, "unknown post type: {kind}"),
            ApiError::NotFound => write!(f, "blog not found"),
            ApiError::HttpError { status, body } => {
                write!(f, "HTTP {status}: {body}")
            }
            ApiError::DeserializationError(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
        }
    }
}

impl std::error::Error for ApiError {}
