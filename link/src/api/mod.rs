//! Endpoint groups implemented on [`crate::DuneClient`].

pub mod execution;
pub mod query;
