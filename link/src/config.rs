//! Client configuration.
//!
//! Values can be set explicitly or loaded from the environment:
//!
//! | variable                   | default               |
//! |----------------------------|-----------------------|
//! | `DUNE_API_KEY`             | required              |
//! | `DUNE_API_BASE_URL`        | `https://api.dune.com`|
//! | `DUNE_API_VERSION`         | `v1`                  |
//! | `DUNE_API_REQUEST_TIMEOUT` | `10` (seconds)        |

use std::time::Duration;

use crate::auth::ApiKey;
use crate::error::{DuneError, Result};

pub const ENV_API_KEY: &str = "DUNE_API_KEY";
pub const ENV_BASE_URL: &str = "DUNE_API_BASE_URL";
pub const ENV_API_VERSION: &str = "DUNE_API_VERSION";
pub const ENV_REQUEST_TIMEOUT: &str = "DUNE_API_REQUEST_TIMEOUT";

pub const DEFAULT_BASE_URL: &str = "https://api.dune.com";
pub const DEFAULT_API_VERSION: &str = "v1";

/// Connection settings for [`crate::DuneClient`].
#[derive(Debug, Clone)]
pub struct DuneConfig {
    pub api_key: ApiKey,

    /// Service root, without the `/api/{version}` suffix
    pub base_url: String,

    /// Path segment after `/api/` (e.g. `v1`, `alpha/v1`)
    pub api_version: String,

    /// Per-request timeout applied by the HTTP client.
    /// Default: 10 seconds
    pub request_timeout: Duration,

    /// Delay between status polls in [`crate::DuneClient::refresh`].
    /// Default: 5 seconds
    pub ping_frequency: Duration,
}

impl DuneConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: ApiKey::new(api_key),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            request_timeout: default_request_timeout(),
            ping_frequency: default_ping_frequency(),
        }
    }

    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = get(ENV_API_KEY).ok_or_else(|| {
            DuneError::ConfigurationError(format!("{} is not set", ENV_API_KEY))
        })?;
        let mut config = Self::new(api_key);

        if let Some(url) = get(ENV_BASE_URL) {
            config.base_url = url;
        }
        if let Some(version) = get(ENV_API_VERSION) {
            config.api_version = version;
        }
        if let Some(raw) = get(ENV_REQUEST_TIMEOUT) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                DuneError::ConfigurationError(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    ENV_REQUEST_TIMEOUT, raw
                ))
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Full API root, e.g. `https://api.dune.com/api/v1`
    pub fn api_root(&self) -> String {
        format!(
            "{}/api/{}",
            self.base_url.trim_end_matches('/'),
            self.api_version.trim_matches('/')
        )
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !self.api_key.is_configured() {
            return Err(DuneError::ConfigurationError("api_key is required".into()));
        }
        if self.base_url.trim().is_empty() {
            return Err(DuneError::ConfigurationError("base_url is required".into()));
        }
        Ok(())
    }
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

pub(crate) fn default_ping_frequency() -> Duration {
    Duration::from_secs(5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DuneConfig::new("key");
        assert_eq!(config.base_url, "https://api.dune.com");
        assert_eq!(config.api_version, "v1");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.ping_frequency, Duration::from_secs(5));
        assert_eq!(config.api_root(), "https://api.dune.com/api/v1");
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = DuneConfig::from_lookup(lookup(&[
            (ENV_API_KEY, "abc"),
            (ENV_BASE_URL, "http://localhost:9000/"),
            (ENV_API_VERSION, "alpha/v1"),
            (ENV_REQUEST_TIMEOUT, "30"),
        ]))
        .unwrap();

        assert_eq!(config.api_key.expose(), "abc");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.api_root(), "http://localhost:9000/api/alpha/v1");
    }

    #[test]
    fn test_from_lookup_missing_key() {
        let err = DuneConfig::from_lookup(lookup(&[(ENV_BASE_URL, "http://x")])).unwrap_err();
        assert!(matches!(err, DuneError::ConfigurationError(_)));
        assert!(err.to_string().contains(ENV_API_KEY));
    }

    #[test]
    fn test_from_lookup_bad_timeout() {
        let err = DuneConfig::from_lookup(lookup(&[
            (ENV_API_KEY, "abc"),
            (ENV_REQUEST_TIMEOUT, "soon"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("soon"));
    }

    #[test]
    fn test_validate_rejects_blank_key() {
        assert!(DuneConfig::new(" ").validate().is_err());
        assert!(DuneConfig::new("k").validate().is_ok());
    }
}
