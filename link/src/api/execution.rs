//! Execution endpoints: submit, poll, fetch results and cancel.
//!
//! Polling is left to the caller except for [`DuneClient::refresh`], which
//! loops on a fixed `ping_frequency` until a terminal state.

use chrono::Utc;
use log::{debug, error, info};
use serde_json::json;

use crate::{
    client::DuneClient,
    error::{DuneError, Result},
    models::{
        validate_parameters, CancellationResponse, ExecutionResponse, ExecutionStatusResponse,
        Performance, QueryBase, ResponseType, ResultsResponse,
    },
    transport::{ApiRequest, Transport},
};

impl<T: Transport> DuneClient<T> {
    /// Submit a query for execution with its parameter values.
    pub async fn execute(
        &self,
        query: &QueryBase,
        performance: Option<Performance>,
    ) -> Result<ExecutionResponse> {
        validate_parameters(query.parameters())?;
        let mut payload = query.request_format();
        payload["performance"] = json!(performance.unwrap_or_default());

        debug!("[DUNE_EXEC] Executing query {} ({})", query.query_id, query.name);
        let response = self
            .post(format!("/query/{}/execute", query.query_id), Some(payload))
            .await?;
        ExecutionResponse::from_json(response)
    }

    /// Current state of an execution
    pub async fn get_status(&self, job_id: &str) -> Result<ExecutionStatusResponse> {
        let response = self.get(format!("/execution/{}/status", job_id)).await?;
        ExecutionStatusResponse::from_json(response)
    }

    /// Results of an execution in whatever state it is in
    pub async fn get_result(&self, job_id: &str) -> Result<ResultsResponse> {
        let response = self.get(format!("/execution/{}/results", job_id)).await?;
        ResultsResponse::from_json(response)
    }

    /// Request cancellation; returns the service's `success` flag.
    ///
    /// The cancelled state only shows up on a later status or result fetch.
    pub async fn cancel_execution(&self, job_id: &str) -> Result<bool> {
        let response = self
            .post(format!("/execution/{}/cancel", job_id), None)
            .await?;
        Ok(CancellationResponse::from_json(response)?.success)
    }

    /// Most recent results for a query without triggering a new run.
    ///
    /// With `max_age_hours`, results whose execution ended longer ago than
    /// that are replaced by a fresh [`DuneClient::refresh`].
    pub async fn get_latest_result(
        &self,
        query: &QueryBase,
        max_age_hours: Option<i64>,
    ) -> Result<ResultsResponse> {
        let request = ApiRequest::get(format!("/query/{}/results", query.query_id))
            .with_query(query.url_params());
        let results = ResultsResponse::from_json(self.send(request).await?)?;

        if let (Some(hours), Some(ended_at)) = (max_age_hours, results.times.execution_ended_at) {
            let age = Utc::now() - ended_at;
            if age.num_seconds() > hours.saturating_mul(3600) {
                info!(
                    "[DUNE_EXEC] Latest result for query {} is {}h old (max {}h), refreshing",
                    query.query_id,
                    age.num_hours(),
                    hours
                );
                return self.refresh(query, None).await;
            }
        }
        Ok(results)
    }

    /// Execute, poll until the execution leaves pending/executing, then
    /// fetch its results.
    ///
    /// A failed or expired execution yields [`DuneError::QueryFailed`].
    pub async fn refresh(
        &self,
        query: &QueryBase,
        performance: Option<Performance>,
    ) -> Result<ResultsResponse> {
        let job_id = self.execute(query, performance).await?.execution_id;
        let mut status = self.get_status(&job_id).await?;
        while !status.state.is_terminal() {
            debug!(
                "[DUNE_EXEC] {} is {}, next poll in {:?}",
                job_id, status.state, self.ping_frequency()
            );
            tokio::time::sleep(self.ping_frequency()).await;
            status = self.get_status(&job_id).await?;
        }

        if status.state.is_failure() {
            let message = status
                .error
                .map(|e| e.message)
                .unwrap_or_else(|| status.state.to_string());
            error!("[DUNE_EXEC] Execution {} failed: {}", job_id, message);
            return Err(DuneError::QueryFailed {
                execution_id: job_id,
                message,
            });
        }

        self.get_result(&job_id).await
    }
}
