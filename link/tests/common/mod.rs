#![allow(dead_code)]

use async_trait::async_trait;
use dune_link::{ApiRequest, DuneClient, Result, Transport};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Transport that replays canned JSON bodies in order and records every
/// request it receives.
#[derive(Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<VecDeque<Value>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses(responses: Vec<Value>) -> Self {
        let mock = Self::new();
        for r in responses {
            mock.push(r);
        }
        mock
    }

    pub fn push(&self, response: Value) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.responses.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| {
            panic!("no canned response left for {} {}", request.method, request.route)
        }))
    }
}

/// Client over a mock, polling without delay
pub fn mock_client(responses: Vec<Value>) -> (DuneClient<MockTransport>, MockTransport) {
    let mock = MockTransport::with_responses(responses);
    let client = DuneClient::with_transport(mock.clone()).with_ping_frequency(Duration::ZERO);
    (client, mock)
}

pub fn query_json(query_id: i64, is_private: bool, is_archived: bool) -> Value {
    json!({
        "query_id": query_id,
        "name": "test_query",
        "description": "",
        "tags": ["dex"],
        "version": 1,
        "parameters": [{"key": "TextField", "type": "text", "value": "Plain Text"}],
        "query_engine": "v2 Dune SQL",
        "query_sql": "SELECT '{{TextField}}' AS text_field",
        "is_private": is_private,
        "is_archived": is_archived,
        "is_unsaved": false,
        "owner": "tester"
    })
}

pub fn status_json(execution_id: &str, state: &str) -> Value {
    json!({
        "execution_id": execution_id,
        "query_id": 1215383,
        "state": state,
        "submitted_at": "2022-08-29T06:33:24.913138Z",
        "expires_at": "2024-08-28T06:36:41.58847Z"
    })
}

pub fn results_json(execution_id: &str, state: &str, ended_at: &str) -> Value {
    json!({
        "execution_id": execution_id,
        "query_id": 1215383,
        "state": state,
        "submitted_at": "2022-08-29T06:33:24.913138Z",
        "execution_ended_at": ended_at,
        "result": {
            "rows": [{
                "text_field": "different word",
                "number_field": 22,
                "date_field": "1991-01-01 00:00:00.000",
                "list_field": "Option 2"
            }],
            "metadata": {
                "column_names": ["text_field", "number_field", "date_field", "list_field"],
                "result_set_bytes": 60,
                "total_row_count": 1,
                "datapoint_count": 4,
                "pending_time_millis": 10,
                "execution_time_millis": 120
            }
        }
    })
}
