//! CLI support for odata-filter
//!
//! Provides programmatic access to the `odata` commands so other tools can
//! embed filter validation without shelling out.

mod check;
mod docs;
mod query;

pub use check::{CheckOptions, OutputMode, execute_check};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};
pub use query::{QueryCommandOptions, execute_query};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid filter: {0}")]
    Filter(#[from] crate::FilterError),

    #[error("Invalid query: {0}")]
    Query(#[from] crate::QueryError),

    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No filter provided. Pass it as an argument or pipe it to stdin.")]
    NoInput,

    #[error("Unknown category: '{0}'\nRun 'odata docs' to see available categories.")]
    UnknownCategory(String),
}
