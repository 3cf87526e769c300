//! Query (CRUD) endpoints: create, read, update, archive and privacy
//! toggles for stored queries.
//!
//! Mutation endpoints only echo `{"query_id": N}`, so every call that
//! reports state back re-reads the query afterwards.

use log::{debug, warn};
use serde_json::{json, Value as JsonValue};

use crate::{
    client::DuneClient,
    error::{DuneError, Result},
    models::{
        parse_as, validate_parameters, DuneQuery, QueryIdResponse, QueryParameter, QueryUpdate,
        ResponseType, Update,
    },
    transport::Transport,
};

impl<T: Transport> DuneClient<T> {
    /// Create a stored query and return it as the service recorded it.
    ///
    /// `POST /query/` only answers with the new id, so this issues a
    /// follow-up [`DuneClient::get_query`].
    pub async fn create_query(
        &self,
        name: &str,
        query_sql: &str,
        params: Option<Vec<QueryParameter>>,
        is_private: bool,
    ) -> Result<DuneQuery> {
        let mut payload = json!({
            "name": name,
            "query_sql": query_sql,
            "is_private": is_private,
        });
        if let Some(params) = params {
            validate_parameters(&params)?;
            payload["parameters"] = serde_json::to_value(params)
                .map_err(|e| DuneError::InvalidParameters(e.to_string()))?;
        }

        debug!("[DUNE_QUERY] Creating query '{}'", name);
        let response = self.post("/query/".to_string(), Some(payload)).await?;
        let created: QueryIdResponse = parse_as(response, "CreateQueryResponse")?;
        self.get_query(created.query_id).await
    }

    /// Read a stored query by id
    pub async fn get_query(&self, query_id: i64) -> Result<DuneQuery> {
        let response = self.get(format!("/query/{}", query_id)).await?;
        DuneQuery::from_json(response)
    }

    /// Apply a partial update and return the confirmed query id.
    ///
    /// An update that touches no field is not sent; the input id is returned.
    pub async fn update_query(&self, query_id: i64, update: QueryUpdate) -> Result<i64> {
        if update.is_empty() {
            warn!("[DUNE_QUERY] called update_query with no proposed changes.");
            return Ok(query_id);
        }
        if let Update::Set(params) = &update.parameters {
            validate_parameters(params)?;
        }

        let payload = JsonValue::Object(update.to_payload()?);
        debug!(
            "[DUNE_QUERY] Updating query {} fields={:?}",
            query_id,
            payload.as_object().map(|o| o.keys().collect::<Vec<_>>())
        );
        let response = self.patch(format!("/query/{}", query_id), payload).await?;
        let updated: QueryIdResponse = parse_as(response, "UpdateQueryResponse")?;
        Ok(updated.query_id)
    }

    /// Archive a query; returns the re-read `is_archived` flag.
    pub async fn archive_query(&self, query_id: i64) -> Result<bool> {
        let query = self.query_action(query_id, "archive", "ArchiveQueryResponse").await?;
        Ok(query.meta.is_archived)
    }

    /// Unarchive a query; returns the re-read `is_archived` flag.
    pub async fn unarchive_query(&self, query_id: i64) -> Result<bool> {
        let query = self
            .query_action(query_id, "unarchive", "UnarchiveQueryResponse")
            .await?;
        Ok(query.meta.is_archived)
    }

    /// Make a query private.
    ///
    /// Fails with [`DuneError::PrivacyMismatch`] if the re-read query is
    /// still public.
    pub async fn make_private(&self, query_id: i64) -> Result<()> {
        let query = self.query_action(query_id, "private", "MakePrivateResponse").await?;
        ensure_privacy(&query, true)
    }

    /// Make a query public.
    ///
    /// Fails with [`DuneError::PrivacyMismatch`] if the re-read query is
    /// still private.
    pub async fn make_public(&self, query_id: i64) -> Result<()> {
        let query = self.query_action(query_id, "unprivate", "MakePublicResponse").await?;
        ensure_privacy(&query, false)
    }

    /// POST a state-transition action, then re-read the echoed query id.
    async fn query_action(
        &self,
        query_id: i64,
        action: &str,
        response_type: &'static str,
    ) -> Result<DuneQuery> {
        debug!("[DUNE_QUERY] {} query {}", action, query_id);
        let response = self.post(format!("/query/{}/{}", query_id, action), None).await?;
        let ack: QueryIdResponse = parse_as(response, response_type)?;
        self.get_query(ack.query_id).await
    }
}

fn ensure_privacy(query: &DuneQuery, expected_private: bool) -> Result<()> {
    if query.meta.is_private == expected_private {
        Ok(())
    } else {
        Err(DuneError::PrivacyMismatch {
            query_id: query.query_id(),
            expected_private,
        })
    }
}
