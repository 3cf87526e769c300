use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{DuneError, Result};

/// A typed API response with a stable name used in build errors.
pub trait ResponseType: DeserializeOwned {
    const NAME: &'static str;

    /// Convert a raw JSON body into `Self`, failing with
    /// `Can't build {NAME} from {body}` when a key is missing or mistyped.
    fn from_json(payload: JsonValue) -> Result<Self> {
        parse_as(payload, Self::NAME)
    }
}

/// Deserialize `payload` as `T`, reporting failures against `name`.
pub fn parse_as<T: DeserializeOwned>(payload: JsonValue, name: &'static str) -> Result<T> {
    // Borrowing deserializer keeps the payload for the error message
    match T::deserialize(&payload) {
        Ok(value) => Ok(value),
        Err(err) => Err(DuneError::build(payload, name, err)),
    }
}

/// `{"query_id": N}` echo returned by every query mutation endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryIdResponse {
    pub query_id: i64,
}
