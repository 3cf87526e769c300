//! Execution, polling and result retrieval against a scripted transport.

mod common;

use chrono::{Duration, Utc};
use common::{mock_client, results_json, status_json};
use dune_link::{DuneError, ExecutionState, Performance, QueryBase, QueryParameter};
use reqwest::Method;
use serde_json::json;

fn sample_query() -> QueryBase {
    QueryBase::new(1215383, "Sample Query").with_params(vec![
        QueryParameter::text("TextField", "different word"),
        QueryParameter::number("NumberField", 22.0),
        QueryParameter::date_str("DateField", "1991-01-01 00:00:00").unwrap(),
        QueryParameter::enum_value("ListField", "Option 2"),
    ])
}

#[tokio::test]
async fn test_execute_payload() {
    let (client, mock) = mock_client(vec![
        json!({"execution_id": "01HEXEC", "state": "QUERY_STATE_PENDING"}),
    ]);

    let job = client
        .execute(&sample_query(), Some(Performance::Large))
        .await
        .unwrap();

    assert_eq!(job.execution_id, "01HEXEC");
    assert_eq!(job.state, ExecutionState::Pending);

    let request = &mock.requests()[0];
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.route, "/query/1215383/execute");
    assert_eq!(
        request.body,
        Some(json!({
            "query_parameters": {
                "TextField": "different word",
                "NumberField": "22",
                "DateField": "1991-01-01 00:00:00",
                "ListField": "Option 2"
            },
            "performance": "large"
        }))
    );
}

#[tokio::test]
async fn test_execute_default_performance() {
    let (client, mock) = mock_client(vec![
        json!({"execution_id": "x", "state": "QUERY_STATE_PENDING"}),
    ]);

    client.execute(&QueryBase::new(1, "No Name"), None).await.unwrap();

    assert_eq!(mock.requests()[0].body.as_ref().unwrap()["performance"], "medium");
}

#[tokio::test]
async fn test_invalid_api_key_errors() {
    let error_body = json!({"error": "invalid API Key"});
    let (client, _mock) = mock_client(vec![
        error_body.clone(),
        error_body.clone(),
        error_body.clone(),
    ]);

    let err = client.execute(&sample_query(), None).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        r#"Can't build ExecutionResponse from {"error":"invalid API Key"}"#
    );

    let err = client.get_status("wonky job_id").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        r#"Can't build ExecutionStatusResponse from {"error":"invalid API Key"}"#
    );

    let err = client.get_result("wonky job_id").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        r#"Can't build ResultsResponse from {"error":"invalid API Key"}"#
    );
}

#[tokio::test]
async fn test_invalid_job_id_error() {
    let (client, mock) = mock_client(vec![json!({
        "error": "The requested execution ID (ID: Wonky Job ID) is invalid."
    })]);

    let err = client.get_status("Wonky Job ID").await.unwrap_err();

    assert_eq!(
        err.to_string(),
        r#"Can't build ExecutionStatusResponse from {"error":"The requested execution ID (ID: Wonky Job ID) is invalid."}"#
    );
    assert_eq!(mock.requests()[0].route, "/execution/Wonky Job ID/status");
}

#[tokio::test]
async fn test_poll_until_completed_then_fetch() {
    let (client, mock) = mock_client(vec![
        json!({"execution_id": "job1", "state": "QUERY_STATE_PENDING"}),
        status_json("job1", "QUERY_STATE_PENDING"),
        status_json("job1", "QUERY_STATE_EXECUTING"),
        status_json("job1", "QUERY_STATE_COMPLETED"),
        results_json("job1", "QUERY_STATE_COMPLETED", "2022-08-29T06:36:41Z"),
    ]);

    let job = client.execute(&sample_query(), None).await.unwrap();
    while !client.get_status(&job.execution_id).await.unwrap().state.is_terminal() {}
    let results = client.get_result(&job.execution_id).await.unwrap();

    assert_eq!(results.state, ExecutionState::Completed);
    assert_eq!(results.rows().len(), 1);
    assert_eq!(results.rows()[0]["number_field"], 22);
    assert_eq!(mock.remaining(), 0);
}

#[tokio::test]
async fn test_refresh_polls_to_completion() {
    let (client, mock) = mock_client(vec![
        json!({"execution_id": "job2", "state": "QUERY_STATE_PENDING"}),
        status_json("job2", "QUERY_STATE_PENDING"),
        status_json("job2", "QUERY_STATE_EXECUTING"),
        status_json("job2", "QUERY_STATE_COMPLETED"),
        results_json("job2", "QUERY_STATE_COMPLETED", "2022-08-29T06:36:41Z"),
    ]);

    let results = client.refresh(&sample_query(), None).await.unwrap();

    assert_eq!(
        results.rows()[0],
        json!({
            "text_field": "different word",
            "number_field": 22,
            "date_field": "1991-01-01 00:00:00.000",
            "list_field": "Option 2"
        })
        .as_object()
        .unwrap()
        .clone()
    );
    let routes: Vec<String> = mock.requests().into_iter().map(|r| r.route).collect();
    assert_eq!(routes.iter().filter(|r| r.ends_with("/status")).count(), 3);
    assert_eq!(routes.last().unwrap(), "/execution/job2/results");
}

#[tokio::test]
async fn test_refresh_failed_execution() {
    let mut failed = status_json("job3", "QUERY_STATE_FAILED");
    failed["error"] = json!({"type": "FAILED_TYPE_EXECUTION_FAILED", "message": "column x not found"});
    let (client, mock) = mock_client(vec![
        json!({"execution_id": "job3", "state": "QUERY_STATE_PENDING"}),
        failed,
    ]);

    let err = client.refresh(&sample_query(), None).await.unwrap_err();

    match err {
        DuneError::QueryFailed {
            execution_id,
            message,
        } => {
            assert_eq!(execution_id, "job3");
            assert_eq!(message, "column x not found");
        },
        other => panic!("unexpected error: {:?}", other),
    }
    // Results are never fetched for a failed run
    assert_eq!(mock.request_count(), 2);
}

#[tokio::test]
async fn test_cancel_then_results_report_cancelled() {
    let (client, mock) = mock_client(vec![
        json!({"execution_id": "job4", "state": "QUERY_STATE_PENDING"}),
        json!({"success": true}),
        json!({
            "execution_id": "job4",
            "query_id": 1229120,
            "state": "QUERY_STATE_CANCELLED",
            "submitted_at": "2022-08-29T06:33:24Z",
            "cancelled_at": "2022-08-29T06:33:25Z"
        }),
    ]);

    let job = client
        .execute(&QueryBase::new(1229120, "Long Running Query"), None)
        .await
        .unwrap();
    assert!(client.cancel_execution(&job.execution_id).await.unwrap());
    let results = client.get_result(&job.execution_id).await.unwrap();

    assert_eq!(results.state, ExecutionState::Cancelled);
    assert!(results.rows().is_empty());
    let cancel = &mock.requests()[1];
    assert_eq!(cancel.method, Method::POST);
    assert_eq!(cancel.route, "/execution/job4/cancel");
}

#[tokio::test]
async fn test_cancel_malformed() {
    let (client, _mock) = mock_client(vec![json!({"error": "invalid API Key"})]);

    let err = client.cancel_execution("job").await.unwrap_err();

    assert_eq!(err.response_type(), Some("CancellationResponse"));
}

#[tokio::test]
async fn test_latest_result_sends_params() {
    let (client, mock) = mock_client(vec![results_json(
        "job5",
        "QUERY_STATE_COMPLETED",
        "2022-08-29T06:36:41Z",
    )]);

    let results = client.get_latest_result(&sample_query(), None).await.unwrap();

    assert_eq!(results.rows().len(), 1);
    let request = &mock.requests()[0];
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.route, "/query/1215383/results");
    assert!(request
        .query
        .contains(&("params.ListField".to_string(), "Option 2".to_string())));
    assert_eq!(request.query.len(), 4);
}

#[tokio::test]
async fn test_latest_result_fresh_enough() {
    let recent = (Utc::now() - Duration::minutes(5)).to_rfc3339();
    let (client, mock) = mock_client(vec![results_json("job6", "QUERY_STATE_COMPLETED", &recent)]);

    client
        .get_latest_result(&QueryBase::new(1215383, "Sample"), Some(1))
        .await
        .unwrap();

    assert_eq!(mock.request_count(), 1);
}

#[tokio::test]
async fn test_latest_result_stale_triggers_refresh() {
    let stale = (Utc::now() - Duration::hours(30)).to_rfc3339();
    let fresh = Utc::now().to_rfc3339();
    let (client, mock) = mock_client(vec![
        results_json("old", "QUERY_STATE_COMPLETED", &stale),
        json!({"execution_id": "new", "state": "QUERY_STATE_PENDING"}),
        status_json("new", "QUERY_STATE_COMPLETED"),
        results_json("new", "QUERY_STATE_COMPLETED", &fresh),
    ]);

    let results = client
        .get_latest_result(&QueryBase::new(1215383, "Sample"), Some(24))
        .await
        .unwrap();

    assert_eq!(results.execution_id, "new");
    assert_eq!(mock.request_count(), 4);
    assert_eq!(mock.requests()[1].route, "/query/1215383/execute");
}
