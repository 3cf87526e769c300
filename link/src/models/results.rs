use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use super::execution::{ExecutionState, TimeData};
use super::response::ResponseType;

/// One result row keyed by column name
pub type Row = Map<String, JsonValue>;

/// Shape and cost of a result set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultMetadata {
    pub column_names: Vec<String>,
    #[serde(default)]
    pub result_set_bytes: u64,
    #[serde(default)]
    pub total_row_count: u64,
    #[serde(default)]
    pub datapoint_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_time_millis: Option<u64>,
    #[serde(default)]
    pub execution_time_millis: u64,
}

/// Row data of a finished execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub rows: Vec<Row>,
    pub metadata: ResultMetadata,
}

/// Reply to `GET /execution/{id}/results` and `GET /query/{id}/results`.
///
/// `result` is absent when the execution never produced rows (e.g. it was
/// cancelled).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsResponse {
    pub execution_id: String,
    pub query_id: i64,
    pub state: ExecutionState,
    #[serde(flatten)]
    pub times: TimeData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ExecutionResult>,
}

impl ResponseType for ResultsResponse {
    const NAME: &'static str = "ResultsResponse";
}

impl ResultsResponse {
    /// All rows, empty when there is no result
    pub fn rows(&self) -> &[Row] {
        self.result.as_ref().map(|r| r.rows.as_slice()).unwrap_or(&[])
    }

    pub fn row(&self, idx: usize) -> Option<&Row> {
        self.rows().get(idx)
    }

    /// Column names in result order
    pub fn column_names(&self) -> &[String] {
        self.result
            .as_ref()
            .map(|r| r.metadata.column_names.as_slice())
            .unwrap_or(&[])
    }

    /// Tabular view: header plus one value vector per row, in column order.
    /// Missing cells become `null`.
    pub fn to_table(&self) -> (Vec<String>, Vec<Vec<JsonValue>>) {
        let columns = self.column_names().to_vec();
        let mut grid = Vec::with_capacity(self.rows().len());
        for row in self.rows() {
            let mut values = Vec::with_capacity(columns.len());
            for column in &columns {
                values.push(row.get(column).cloned().unwrap_or(JsonValue::Null));
            }
            grid.push(values);
        }
        (columns, grid)
    }
}
