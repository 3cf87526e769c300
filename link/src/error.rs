//! Error types for dune-link.
//!
//! Every failure surfaced by the client is a [`DuneError`]. Response payloads
//! that cannot be turned into the expected type (including the service's
//! `{"error": "..."}` bodies) all become [`DuneError::Build`], whose message
//! names the target type and embeds the raw payload.

use serde_json::Value as JsonValue;
use thiserror::Error;

/// Result type for dune-link operations
pub type Result<T> = std::result::Result<T, DuneError>;

/// Errors that can occur while talking to the Dune API
#[derive(Debug, Error)]
pub enum DuneError {
    /// A response body could not be converted into `response_type`.
    #[error("Can't build {response_type} from {payload}")]
    Build {
        /// Raw JSON body as received
        payload: JsonValue,
        /// Name of the response type under construction
        response_type: &'static str,
        /// Underlying lookup / decode failure
        cause: String,
    },

    /// Non-JSON body returned with a non-success HTTP status
    #[error("Server error ({status_code}): {message}")]
    ServerError { status_code: u16, message: String },

    /// Connection-level failure
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request exceeded the configured timeout
    #[error("Timeout: {0}")]
    TimeoutError(String),

    /// Client was configured incorrectly (missing key, bad env value, ...)
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Parameter list violates an invariant (e.g. duplicate names)
    #[error("Invalid query parameters: {0}")]
    InvalidParameters(String),

    /// A privacy toggle was acknowledged but the re-read query disagrees.
    #[error("Query {query_id} privacy is not is_private={expected_private} after update")]
    PrivacyMismatch { query_id: i64, expected_private: bool },

    /// A polled execution ended in a failed or expired state
    #[error("Execution {execution_id} failed: {message}")]
    QueryFailed {
        execution_id: String,
        message: String,
    },
}

impl DuneError {
    /// Construct a [`DuneError::Build`] from a payload and its decode failure.
    pub fn build(payload: JsonValue, response_type: &'static str, cause: impl ToString) -> Self {
        DuneError::Build {
            payload,
            response_type,
            cause: cause.to_string(),
        }
    }

    /// Name of the response type a `Build` error was targeting.
    pub fn response_type(&self) -> Option<&'static str> {
        match self {
            DuneError::Build { response_type, .. } => Some(response_type),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for DuneError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DuneError::TimeoutError(err.to_string())
        } else if err.is_decode() {
            DuneError::build(JsonValue::Null, "JSON", err)
        } else {
            DuneError::NetworkError(err.to_string())
        }
    }
}
