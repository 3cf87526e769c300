use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use super::query_parameter::QueryParameter;
use crate::error::{DuneError, Result};

/// One field of a partial update.
///
/// `Unchanged` leaves the stored value alone and is omitted from the payload.
/// `Clear` is sent as the field's empty value (`""` or `[]`), which the
/// service interprets as "remove".
#[derive(Debug, Clone, PartialEq)]
pub enum Update<T> {
    Unchanged,
    Clear,
    Set(T),
}

impl<T> Default for Update<T> {
    fn default() -> Self {
        Update::Unchanged
    }
}

impl<T> Update<T> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Update::Unchanged)
    }
}

impl<T> From<Option<T>> for Update<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Update::Set(v),
            None => Update::Unchanged,
        }
    }
}

/// Values that have an explicit empty wire form.
pub trait Clearable: Serialize {
    fn cleared() -> Self;
}

impl Clearable for String {
    fn cleared() -> Self {
        String::new()
    }
}

impl<T: Serialize> Clearable for Vec<T> {
    fn cleared() -> Self {
        Vec::new()
    }
}

impl<T: Clearable> Update<T> {
    fn wire_value(&self, field: &str) -> Result<Option<JsonValue>> {
        let value = match self {
            Update::Unchanged => return Ok(None),
            Update::Clear => serde_json::to_value(T::cleared()),
            Update::Set(v) => serde_json::to_value(v),
        };
        value
            .map(Some)
            .map_err(|e| DuneError::InvalidParameters(format!("{}: {}", field, e)))
    }
}

/// Partial update for `PATCH /query/{id}`.
///
/// ```rust
/// use dune_link::QueryUpdate;
///
/// let update = QueryUpdate::new().name("renamed").clear_tags();
/// let payload = update.to_payload().unwrap();
/// assert_eq!(payload["name"], "renamed");
/// assert_eq!(payload["tags"], serde_json::json!([]));
/// assert!(!payload.contains_key("query_sql"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryUpdate {
    pub name: Update<String>,
    pub description: Update<String>,
    pub tags: Update<Vec<String>>,
    pub query_sql: Update<String>,
    pub parameters: Update<Vec<QueryParameter>>,
}

impl QueryUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Update::Set(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Update::Set(description.into());
        self
    }

    pub fn clear_description(mut self) -> Self {
        self.description = Update::Clear;
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Update::Set(tags);
        self
    }

    pub fn clear_tags(mut self) -> Self {
        self.tags = Update::Clear;
        self
    }

    pub fn query_sql(mut self, sql: impl Into<String>) -> Self {
        self.query_sql = Update::Set(sql.into());
        self
    }

    pub fn parameters(mut self, params: Vec<QueryParameter>) -> Self {
        self.parameters = Update::Set(params);
        self
    }

    pub fn clear_parameters(mut self) -> Self {
        self.parameters = Update::Clear;
        self
    }

    /// True when no field was touched
    pub fn is_empty(&self) -> bool {
        self.name.is_unchanged()
            && self.description.is_unchanged()
            && self.tags.is_unchanged()
            && self.query_sql.is_unchanged()
            && self.parameters.is_unchanged()
    }

    /// Request body containing only the touched fields
    pub fn to_payload(&self) -> Result<Map<String, JsonValue>> {
        let mut payload = Map::new();
        let fields = [
            ("name", self.name.wire_value("name")?),
            ("description", self.description.wire_value("description")?),
            ("tags", self.tags.wire_value("tags")?),
            ("query_sql", self.query_sql.wire_value("query_sql")?),
            ("parameters", self.parameters.wire_value("parameters")?),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                payload.insert(key.to_string(), value);
            }
        }
        Ok(payload)
    }
}
