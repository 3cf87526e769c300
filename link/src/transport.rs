//! HTTP transport for the Dune API.
//!
//! [`Transport`] is the single point where raw HTTP turns into JSON. The
//! default [`HttpTransport`] uses reqwest; tests plug in a scripted one.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Method;
use serde_json::Value as JsonValue;
use std::time::Instant;

use crate::{
    auth::ApiKey,
    config::DuneConfig,
    error::{DuneError, Result},
};

/// One call against the versioned API root.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Route relative to `/api/{version}`, e.g. `/query/42`
    pub route: String,
    /// URL query string pairs
    pub query: Vec<(String, String)>,
    pub body: Option<JsonValue>,
}

impl ApiRequest {
    pub fn get(route: impl Into<String>) -> Self {
        Self::new(Method::GET, route)
    }

    pub fn post(route: impl Into<String>) -> Self {
        Self::new(Method::POST, route)
    }

    pub fn patch(route: impl Into<String>) -> Self {
        Self::new(Method::PATCH, route)
    }

    fn new(method: Method, route: impl Into<String>) -> Self {
        Self {
            method,
            route: route.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }
}

/// Sends an [`ApiRequest`] and returns the decoded JSON body.
///
/// Implementations must hand back error payloads (e.g. `{"error": "..."}`)
/// as ordinary JSON; the typed layer turns them into [`DuneError::Build`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<JsonValue>;
}

/// reqwest-backed transport.
#[derive(Clone)]
pub struct HttpTransport {
    api_root: String,
    http_client: reqwest::Client,
    api_key: ApiKey,
}

impl HttpTransport {
    pub fn new(config: &DuneConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(format!("dune-link/{}", crate::VERSION))
            .build()
            .map_err(|e| DuneError::ConfigurationError(e.to_string()))?;

        Ok(Self {
            api_root: config.api_root(),
            http_client,
            api_key: config.api_key.clone(),
        })
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<JsonValue> {
        let url = format!("{}{}", self.api_root, request.route);
        let mut req_builder = self.http_client.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            req_builder = req_builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            req_builder = req_builder.json(body);
        }
        req_builder = self.api_key.apply_to_request(req_builder);

        let start = Instant::now();
        debug!("[DUNE_HTTP] Sending {} to {}", request.method, url);

        let response = req_builder.send().await.map_err(|e| {
            warn!("[DUNE_HTTP] Request to {} failed: {}", url, e);
            DuneError::from(e)
        })?;
        let status = response.status();
        let text = response.text().await?;
        debug!(
            "[DUNE_HTTP] Response received: status={} duration_ms={}",
            status,
            start.elapsed().as_millis()
        );

        decode_body(status, &text)
    }
}

/// Decode a body as JSON regardless of status; only undecodable bodies
/// consult the status code.
fn decode_body(status: reqwest::StatusCode, text: &str) -> Result<JsonValue> {
    match serde_json::from_str::<JsonValue>(text) {
        Ok(json) => Ok(json),
        Err(err) if !status.is_success() => {
            warn!("[DUNE_HTTP] Non-JSON error body: status={} ({})", status, err);
            Err(DuneError::ServerError {
                status_code: status.as_u16(),
                message: text.to_string(),
            })
        },
        Err(err) => Err(DuneError::build(JsonValue::String(text.to_string()), "JSON", err)),
    }
}
