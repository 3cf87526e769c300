use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};

use super::query_parameter::QueryParameter;
use super::response::ResponseType;

/// Reference to a stored query plus the parameter values to run it with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryBase {
    pub query_id: i64,
    pub name: String,
    #[serde(default)]
    pub params: Vec<QueryParameter>,
}

impl QueryBase {
    pub fn new(query_id: i64, name: impl Into<String>) -> Self {
        Self {
            query_id,
            name: name.into(),
            params: Vec::new(),
        }
    }

    pub fn with_params(mut self, params: Vec<QueryParameter>) -> Self {
        self.params = params;
        self
    }

    pub fn parameters(&self) -> &[QueryParameter] {
        &self.params
    }

    /// Execution body: `{"query_parameters": {name: value, ...}}`
    pub fn request_format(&self) -> JsonValue {
        let values: Map<String, JsonValue> = self
            .params
            .iter()
            .map(|p| (p.name().to_string(), JsonValue::String(p.value_string())))
            .collect();
        json!({ "query_parameters": values })
    }

    /// Query-string form used by the latest-results endpoint
    pub fn url_params(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .map(|p| (format!("params.{}", p.name()), p.value_string()))
            .collect()
    }
}

/// Non-SQL attributes of a stored query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryMeta {
    pub description: String,
    pub tags: Vec<String>,
    pub version: i64,
    pub engine: String,
    pub is_private: bool,
    pub is_archived: bool,
    pub is_unsaved: bool,
    pub owner: String,
}

/// A stored query as returned by `GET /query/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "QueryRecord", into = "QueryRecord")]
pub struct DuneQuery {
    pub base: QueryBase,
    pub meta: QueryMeta,
    pub sql: String,
}

impl DuneQuery {
    pub fn query_id(&self) -> i64 {
        self.base.query_id
    }
}

impl ResponseType for DuneQuery {
    const NAME: &'static str = "DuneQuery";
}

/// Flat wire shape of a stored query
#[derive(Debug, Clone, Serialize, Deserialize)]
struct QueryRecord {
    query_id: i64,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    version: i64,
    #[serde(default)]
    parameters: Option<Vec<QueryParameter>>,
    #[serde(default)]
    query_engine: String,
    query_sql: String,
    is_private: bool,
    is_archived: bool,
    #[serde(default)]
    is_unsaved: bool,
    #[serde(default)]
    owner: String,
}

impl From<QueryRecord> for DuneQuery {
    fn from(r: QueryRecord) -> Self {
        DuneQuery {
            base: QueryBase {
                query_id: r.query_id,
                name: r.name,
                params: r.parameters.unwrap_or_default(),
            },
            meta: QueryMeta {
                description: r.description.unwrap_or_default(),
                tags: r.tags.unwrap_or_default(),
                version: r.version,
                engine: r.query_engine,
                is_private: r.is_private,
                is_archived: r.is_archived,
                is_unsaved: r.is_unsaved,
                owner: r.owner,
            },
            sql: r.query_sql,
        }
    }
}

impl From<DuneQuery> for QueryRecord {
    fn from(q: DuneQuery) -> Self {
        QueryRecord {
            query_id: q.base.query_id,
            name: q.base.name,
            description: Some(q.meta.description),
            tags: Some(q.meta.tags),
            version: q.meta.version,
            parameters: Some(q.base.params),
            query_engine: q.meta.engine,
            query_sql: q.sql,
            is_private: q.meta.is_private,
            is_archived: q.meta.is_archived,
            is_unsaved: q.meta.is_unsaved,
            owner: q.meta.owner,
        }
    }
}
