use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::response::ResponseType;
use super::results::ResultMetadata;

/// Server-reported state of an execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutionState {
    #[serde(rename = "QUERY_STATE_PENDING")]
    Pending,
    #[serde(rename = "QUERY_STATE_EXECUTING")]
    Executing,
    #[serde(rename = "QUERY_STATE_COMPLETED")]
    Completed,
    #[serde(rename = "QUERY_STATE_CANCELLED")]
    Cancelled,
    #[serde(rename = "QUERY_STATE_FAILED")]
    Failed,
    #[serde(rename = "QUERY_STATE_EXPIRED")]
    Expired,
}

impl ExecutionState {
    /// Completed, cancelled, failed and expired executions never change again.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ExecutionState::Pending | ExecutionState::Executing)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ExecutionState::Failed | ExecutionState::Expired)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionState::Pending => "QUERY_STATE_PENDING",
            ExecutionState::Executing => "QUERY_STATE_EXECUTING",
            ExecutionState::Completed => "QUERY_STATE_COMPLETED",
            ExecutionState::Cancelled => "QUERY_STATE_CANCELLED",
            ExecutionState::Failed => "QUERY_STATE_FAILED",
            ExecutionState::Expired => "QUERY_STATE_EXPIRED",
        }
    }
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Execution engine size requested for a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Performance {
    #[default]
    Medium,
    Large,
}

/// Lifecycle timestamps shared by status and results responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeData {
    pub submitted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_ended_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
}

/// Reply to `POST /query/{id}/execute`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResponse {
    pub execution_id: String,
    pub state: ExecutionState,
}

impl ResponseType for ExecutionResponse {
    const NAME: &'static str = "ExecutionResponse";
}

/// Failure details attached to a failed execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionError {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

/// Reply to `GET /execution/{id}/status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionStatusResponse {
    pub execution_id: String,
    pub query_id: i64,
    pub state: ExecutionState,
    #[serde(flatten)]
    pub times: TimeData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_position: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_metadata: Option<ResultMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ExecutionError>,
}

impl ResponseType for ExecutionStatusResponse {
    const NAME: &'static str = "ExecutionStatusResponse";
}

/// Reply to `POST /execution/{id}/cancel`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationResponse {
    pub success: bool,
}

impl ResponseType for CancellationResponse {
    const NAME: &'static str = "CancellationResponse";
}
