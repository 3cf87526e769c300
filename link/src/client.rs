//! Main Dune client with builder pattern.
//!
//! Query CRUD operations live in [`crate::api::query`], execution and result
//! retrieval in [`crate::api::execution`]; both are implemented on
//! [`DuneClient`].

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value as JsonValue;

use crate::{
    config::{self, DuneConfig},
    error::{DuneError, Result},
    transport::{ApiRequest, HttpTransport, Transport},
};

/// Main Dune API client.
///
/// Use [`DuneClientBuilder`] to construct instances with custom configuration.
///
/// # Examples
///
/// ```rust,no_run
/// use dune_link::{DuneClient, QueryBase};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = DuneClient::builder()
///     .api_key("your-api-key")
///     .timeout(std::time::Duration::from_secs(30))
///     .build()?;
///
/// let results = client.refresh(&QueryBase::new(1215383, "Sample"), None).await?;
/// println!("rows: {}", results.rows().len());
/// # Ok(())
/// # }
/// ```
pub struct DuneClient<T: Transport = HttpTransport> {
    transport: Arc<T>,
    ping_frequency: Duration,
}

impl<T: Transport> Clone for DuneClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            ping_frequency: self.ping_frequency,
        }
    }
}

impl DuneClient<HttpTransport> {
    /// Create a new builder for configuring the client
    pub fn builder() -> DuneClientBuilder {
        DuneClientBuilder::new()
    }

    /// Client with default settings for the given API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    /// Client configured from `DUNE_API_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::builder().config(DuneConfig::from_env()?).build()
    }
}

impl<T: Transport> DuneClient<T> {
    /// Client over a caller-supplied transport
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
            ping_frequency: config::default_ping_frequency(),
        }
    }

    /// Override the delay between status polls in [`DuneClient::refresh`]
    pub fn with_ping_frequency(mut self, ping_frequency: Duration) -> Self {
        self.ping_frequency = ping_frequency;
        self
    }

    pub fn ping_frequency(&self) -> Duration {
        self.ping_frequency
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub(crate) async fn get(&self, route: String) -> Result<JsonValue> {
        self.transport.send(ApiRequest::get(route)).await
    }

    pub(crate) async fn post(&self, route: String, body: Option<JsonValue>) -> Result<JsonValue> {
        let mut request = ApiRequest::post(route);
        if let Some(body) = body {
            request = request.with_body(body);
        }
        self.transport.send(request).await
    }

    pub(crate) async fn patch(&self, route: String, body: JsonValue) -> Result<JsonValue> {
        self.transport
            .send(ApiRequest::patch(route).with_body(body))
            .await
    }

    pub(crate) async fn send(&self, request: ApiRequest) -> Result<JsonValue> {
        self.transport.send(request).await
    }
}

/// Builder for configuring [`DuneClient`] instances.
pub struct DuneClientBuilder {
    api_key: Option<String>,
    config: Option<DuneConfig>,
    base_url: Option<String>,
    api_version: Option<String>,
    timeout: Option<Duration>,
    ping_frequency: Option<Duration>,
}

impl DuneClientBuilder {
    fn new() -> Self {
        Self {
            api_key: None,
            config: None,
            base_url: None,
            api_version: None,
            timeout: None,
            ping_frequency: None,
        }
    }

    /// Start from a complete configuration; later setters override it
    pub fn config(mut self, config: DuneConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the service root (default `https://api.dune.com`)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the API version path segment, e.g. `"alpha/v1"`
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Set request timeout (for HTTP requests)
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the delay between status polls used by `refresh`
    pub fn ping_frequency(mut self, ping_frequency: Duration) -> Self {
        self.ping_frequency = Some(ping_frequency);
        self
    }

    fn resolve(self) -> Result<DuneConfig> {
        let mut config = match (self.config, self.api_key.as_ref()) {
            (Some(config), _) => config,
            (None, Some(key)) => DuneConfig::new(key.clone()),
            (None, None) => {
                return Err(DuneError::ConfigurationError("api_key is required".into()));
            },
        };
        if let Some(key) = self.api_key {
            config.api_key = crate::auth::ApiKey::new(key);
        }
        if let Some(url) = self.base_url {
            config.base_url = url;
        }
        if let Some(version) = self.api_version {
            config.api_version = version;
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout = timeout;
        }
        if let Some(ping) = self.ping_frequency {
            config.ping_frequency = ping;
        }
        config.validate()?;
        Ok(config)
    }

    /// Build the client
    pub fn build(self) -> Result<DuneClient> {
        let config = self.resolve()?;
        log::debug!("[DUNE_CLIENT] Using API root {}", config.api_root());
        let transport = HttpTransport::new(&config)?;
        Ok(DuneClient::with_transport(transport).with_ping_frequency(config.ping_frequency))
    }
}
