//! Repository trait for table-level row accounting used by eviction.

use crate::error::AppError;
use async_trait::async_trait;

/// Opaque handle identifying one stored row within a table.
///
/// Both bundled stores key rows by a `BIGINT` primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowHandle(pub i64);

/// Table-agnostic store capability consumed by the retention subsystem.
///
/// Unlike the entity repositories, every method takes the table identifier
/// as an argument, so a single implementation covers every persisted table.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgRetentionRepository`] - PostgreSQL, via `information_schema`
/// - [`crate::infrastructure::persistence::memory::MemoryRetentionRepository`] - in-memory store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RetentionRepository: Send + Sync {
    /// Enumerates every table identifier known to the store.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if schema metadata cannot be read.
    async fn list_tables(&self) -> Result<Vec<String>, AppError>;

    /// Returns the total number of rows in `table`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an unknown table and
    /// [`AppError::Internal`] on store errors.
    async fn count(&self, table: &str) -> Result<u64, AppError>;

    /// Returns up to `limit` rows of `table`, oldest first.
    ///
    /// The recency column is the first entry of `recency_candidates` that the
    /// table actually has. Rows sharing a recency value come back in the
    /// store's natural order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the table has none of the candidate
    /// columns, [`AppError::NotFound`] for an unknown table and
    /// [`AppError::Internal`] on store errors.
    async fn find_oldest(
        &self,
        table: &str,
        limit: u64,
        recency_candidates: &[&'static str],
    ) -> Result<Vec<RowHandle>, AppError>;

    /// Deletes the given rows from `table` in one operation.
    ///
    /// Returns the number of rows actually removed, which may be lower than
    /// `rows.len()` if some were already gone.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an unknown table and
    /// [`AppError::Internal`] on store errors.
    async fn delete_rows(&self, table: &str, rows: &[RowHandle]) -> Result<u64, AppError>;
}
