//! Failures of the retention subsystem.
//!
//! None of these reach an HTTP client on the insert path: the tracker and the
//! eviction worker log them with table context and carry on.

use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum RetentionError {
    /// The oldest rows of a table could not be selected.
    #[error("failed to query oldest rows of '{table}': {source}")]
    Query {
        table: String,
        #[source]
        source: AppError,
    },

    /// Rows were selected but removing them failed.
    #[error("failed to delete rows from '{table}': {source}")]
    Delete {
        table: String,
        #[source]
        source: AppError,
    },

    /// The row count of a table could not be obtained.
    #[error("failed to count rows of '{table}': {source}")]
    Count {
        table: String,
        #[source]
        source: AppError,
    },

    /// The list of known tables could not be read.
    #[error("failed to enumerate tables: {source}")]
    Catalog {
        #[source]
        source: AppError,
    },

    #[error("batch size {batch_size} must be greater than 0 and below threshold {threshold}")]
    InvalidPolicy { threshold: u64, batch_size: u64 },
}

impl RetentionError {
    /// Table the failure relates to, if any.
    pub fn table(&self) -> Option<&str> {
        match self {
            Self::Query { table, .. } | Self::Delete { table, .. } | Self::Count { table, .. } => {
                Some(table)
            }
            Self::Catalog { .. } | Self::InvalidPolicy { .. } => None,
        }
    }
}

impl From<RetentionError> for AppError {
    fn from(e: RetentionError) -> Self {
        match e {
            RetentionError::Query { source, .. }
            | RetentionError::Delete { source, .. }
            | RetentionError::Count { source, .. }
            | RetentionError::Catalog { source } => source,
            RetentionError::InvalidPolicy {
                threshold,
                batch_size,
            } => AppError::bad_request(
                "Invalid retention policy",
                serde_json::json!({ "threshold": threshold, "batch_size": batch_size }),
            ),
        }
    }
}
