//! # dune-link: Dune API Client Library
//!
//! Async client for the Dune query analytics web API. Covers stored-query
//! management (create, read, partial update, archive, privacy) and query
//! execution (submit, poll, fetch results, cancel).
//!
//! ## Features
//!
//! - **Query CRUD**: typed [`DuneQuery`] model, tri-state partial updates via [`QueryUpdate`]
//! - **Execution**: [`DuneClient::execute`], [`DuneClient::get_status`],
//!   [`DuneClient::get_result`], [`DuneClient::cancel_execution`]
//! - **Polling helper**: [`DuneClient::refresh`] runs a query to completion
//! - **Pluggable transport**: swap the reqwest [`HttpTransport`] for any [`Transport`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dune_link::{DuneClient, QueryBase, QueryParameter, ExecutionState};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads DUNE_API_KEY (and optional DUNE_API_BASE_URL, ...)
//!     let client = DuneClient::from_env()?;
//!
//!     let query = QueryBase::new(1215383, "Sample Query")
//!         .with_params(vec![QueryParameter::text("TextField", "Plain Text")]);
//!
//!     let job = client.execute(&query, None).await?;
//!     while !client.get_status(&job.execution_id).await?.state.is_terminal() {
//!         tokio::time::sleep(std::time::Duration::from_secs(1)).await;
//!     }
//!     let results = client.get_result(&job.execution_id).await?;
//!     assert_eq!(results.state, ExecutionState::Completed);
//!     println!("Rows: {:?}", results.rows());
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod transport;

// Re-export main types for convenience
pub use auth::ApiKey;
pub use client::{DuneClient, DuneClientBuilder};
pub use config::DuneConfig;
pub use error::{DuneError, Result};
pub use models::{
    DuneQuery, ExecutionResponse, ExecutionState, ExecutionStatusResponse, Performance, QueryBase,
    QueryMeta, QueryParameter, QueryUpdate, ResultsResponse, Update,
};
pub use transport::{ApiRequest, HttpTransport, Transport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
