//! Authentication for the Dune API.
//!
//! Dune authenticates every call with a static API key sent in the
//! `x-dune-api-key` header.

use std::fmt;

/// Header carrying the API key on every request
pub const API_KEY_HEADER: &str = "x-dune-api-key";

/// Static API key credentials.
///
/// # Examples
///
/// ```rust
/// use dune_link::ApiKey;
///
/// let key = ApiKey::new("my-secret-key");
/// assert!(key.is_configured());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Raw key value
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Check if a non-blank key is present
    pub fn is_configured(&self) -> bool {
        !self.0.trim().is_empty()
    }

    /// Attach the API key header to an HTTP request builder
    pub fn apply_to_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header(API_KEY_HEADER, self.0.as_str())
    }
}

// Keys must never end up in logs.
impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}
