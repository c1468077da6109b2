//! The target blog and entity URL construction.

use url::Url;

use crate::error::ApiError;

/// Root of the v2 blog API.
pub const API_BASE: &str = "http://api.tumblr.com/v2/blog/";

/// A remote blog identified by its hostname, e.g. `example.tumblr.com`.
///
/// Holds no mutable state. The hostname is used as a single path segment;
/// keeping path separators out of it is the caller's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blog {
    base_hostname: String,
    api_base: String,
}

impl Blog {
    pub fn new(base_hostname: &str) -> Self {
        Self::with_api_base(base_hostname, API_BASE)
    }

    /// Target an API root other than [`API_BASE`], such as a local mock.
    pub fn with_api_base(base_hostname: &str, api_base: &str) -> Self {
        Self {
            base_hostname: base_hostname.to_string(),
            api_base: api_base.to_string(),
        }
    }

    pub fn base_hostname(&self) -> &str {
        &self.base_hostname
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Absolute URL of `entity_type` ("posts", "likes") on this blog.
    pub fn entity_url(&self, entity_type: &str) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| ApiError::MalformedBaseUrl(format!("{}: {e}", self.api_base)))?;
        if url.cannot_be_a_base() {
            return Err(ApiError::MalformedBaseUrl(format!(
                "{}: cannot carry a path",
                self.api_base
            )));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(ApiError::MalformedBaseUrl(format!(
                "{}: must not carry a query or fragment",
                self.api_base
            )));
        }
        let path = join_path(url.path(), [self.base_hostname.as_str(), entity_type]);
        url.set_path(&path);
        Ok(url)
    }
}

/// Join `segments` onto `base` and clean the result: empty and `.` segments
/// vanish, `..` drops the previous segment, and the path is always rooted.
pub(crate) fn join_path<'a>(base: &'a str, segments: impl IntoIterator<Item = &'a str>) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for piece in std::iter::once(base).chain(segments).flat_map(|s| s.split('/')) {
        match piece {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    format!("/{}", parts.join("/"))
}
