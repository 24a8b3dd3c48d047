//! PostgreSQL implementation of the retention repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::repositories::{RetentionRepository, RowHandle};
use crate::error::{AppError, map_sqlx_error};

/// SQLSTATE raised for a missing relation.
const UNDEFINED_TABLE: &str = "42P01";

/// Table-agnostic row accounting over the current schema.
///
/// Table names come from `information_schema` or from the entity modules and
/// are always quoted before being spliced into SQL. The recency column is
/// resolved per call against `information_schema.columns`, so tables using
/// either accepted column name are handled.
pub struct PgRetentionRepository {
    pool: Arc<PgPool>,
}

impl PgRetentionRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn resolve_recency_column(
        &self,
        table: &str,
        candidates: &[&'static str],
    ) -> Result<&'static str, AppError> {
        let names: Vec<String> = candidates.iter().map(|c| c.to_string()).collect();

        let present: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT column_name::text
            FROM information_schema.columns
            WHERE table_schema = current_schema()
              AND table_name = $1
              AND column_name = ANY($2)
            "#,
        )
        .bind(table)
        .bind(&names)
        .fetch_all(self.pool.as_ref())
        .await?;

        candidates
            .iter()
            .copied()
            .find(|candidate| present.iter().any(|p| p == candidate))
            .ok_or_else(|| {
                AppError::bad_request(
                    "Table has no recency column",
                    json!({ "table": table, "candidates": candidates }),
                )
            })
    }
}

/// Quotes an SQL identifier, doubling embedded quotes.
pub(crate) fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn map_table_error(table: &str, e: sqlx::Error) -> AppError {
    let undefined = e
        .as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == UNDEFINED_TABLE);

    if undefined {
        return AppError::not_found("Unknown table", json!({ "table": table }));
    }

    map_sqlx_error(e)
}

#[async_trait]
impl RetentionRepository for PgRetentionRepository {
    async fn list_tables(&self) -> Result<Vec<String>, AppError> {
        let tables: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT table_name::text
            FROM information_schema.tables
            WHERE table_schema = current_schema()
              AND table_type = 'BASE TABLE'
              AND table_name <> '_sqlx_migrations'
            ORDER BY table_name
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(tables)
    }

    async fn count(&self, table: &str) -> Result<u64, AppError> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(table));

        let count: i64 = sqlx::query_scalar(&sql)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(|e| map_table_error(table, e))?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn find_oldest(
        &self,
        table: &str,
        limit: u64,
        recency_candidates: &[&'static str],
    ) -> Result<Vec<RowHandle>, AppError> {
        let column = self.resolve_recency_column(table, recency_candidates).await?;
        let sql = format!(
            "SELECT id FROM {} ORDER BY {} ASC, id ASC LIMIT $1",
            quote_ident(table),
            quote_ident(column)
        );

        let ids: Vec<i64> = sqlx::query_scalar(&sql)
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(self.pool.as_ref())
            .await
            .map_err(|e| map_table_error(table, e))?;

        Ok(ids.into_iter().map(RowHandle).collect())
    }

    async fn delete_rows(&self, table: &str, rows: &[RowHandle]) -> Result<u64, AppError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let ids: Vec<i64> = rows.iter().map(|row| row.0).collect();
        let sql = format!("DELETE FROM {} WHERE id = ANY($1)", quote_ident(table));

        let result = sqlx::query(&sql)
            .bind(&ids)
            .execute(self.pool.as_ref())
            .await
            .map_err(|e| map_table_error(table, e))?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("articles"), "\"articles\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
