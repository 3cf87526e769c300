//! Data models for the Dune API.
//!
//! Request payloads and typed response structures for the query (CRUD) and
//! execution endpoints.

pub mod execution;
pub mod query;
pub mod query_parameter;
pub mod query_update;
pub mod response;
pub mod results;


pub use execution::{
    CancellationResponse, ExecutionError, ExecutionResponse, ExecutionState,
    ExecutionStatusResponse, Performance, TimeData,
};
pub use query::{DuneQuery, QueryBase, QueryMeta};
pub use query_parameter::{validate_parameters, ParameterType, QueryParameter, DATE_FORMAT};
pub use query_update::{Clearable, QueryUpdate, Update};
pub use response::{parse_as, QueryIdResponse, ResponseType};
pub use results::{ExecutionResult, ResultMetadata, ResultsResponse, Row};
