//! Data access: executes a page's query and delivers the result as a
//! generic table, independent of any spreadsheet representation.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::{Column, Executor, Row, TypeInfo, ValueRef};

use crate::config::ConnectionSettings;
use crate::table::{RawValue, TabularResult};

/// Source of tabular data for report pages. The generation loop only sees
/// this trait, so tests can substitute a canned source.
#[async_trait]
pub trait DataSource {
    async fn fetch(&self, query: &str) -> Result<TabularResult>;
}

/// SQLite-backed data source over a connection pool.
pub struct SqliteSource {
    pool: SqlitePool,
}

impl SqliteSource {
    pub async fn connect(settings: &ConnectionSettings) -> Result<Self> {
        let pool = SqlitePool::connect(&settings.database_url)
            .await
            .with_context(|| format!("Failed to connect to {}", settings.database_url))?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl DataSource for SqliteSource {
    async fn fetch(&self, query: &str) -> Result<TabularResult> {
        let rows = sqlx::query(query)
            .fetch_all(&self.pool)
            .await
            .context("Query execution failed")?;

        let columns = match rows.first() {
            Some(row) => column_names(row.columns()),
            // Zero rows: the statement metadata still carries the header.
            None => column_names(
                self.pool
                    .describe(query)
                    .await
                    .context("Failed to describe query")?
                    .columns(),
            ),
        };

        let mut data = Vec::with_capacity(rows.len());
        for row in &rows {
            data.push(decode_row(row)?);
        }

        Ok(TabularResult {
            columns,
            rows: data,
        })
    }
}

fn column_names(columns: &[sqlx::sqlite::SqliteColumn]) -> Vec<String> {
    columns.iter().map(|c| c.name().to_string()).collect()
}

fn decode_row(row: &SqliteRow) -> Result<Vec<RawValue>> {
    let mut values = Vec::with_capacity(row.len());
    for index in 0..row.len() {
        values.push(decode_cell(row, index)?);
    }
    Ok(values)
}

/// Map a SQLite storage value onto the generic cell representation.
fn decode_cell(row: &SqliteRow, index: usize) -> Result<RawValue> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(RawValue::Null);
    }
    let value = match raw.type_info().name() {
        "INTEGER" => RawValue::Int(row.try_get(index)?),
        "REAL" | "NUMERIC" => RawValue::Float(row.try_get(index)?),
        "BOOLEAN" => RawValue::Bool(row.try_get(index)?),
        "BLOB" => {
            let bytes: Vec<u8> = row.try_get(index)?;
            RawValue::Text(String::from_utf8_lossy(&bytes).into_owned())
        }
        _ => RawValue::Text(row.try_get(index)?),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;

    // A pool with more than one connection would hand each its own
    // private in-memory database.
    async fn make_source() -> SqliteSource {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query("CREATE TABLE invoices (Date TEXT, Sold INTEGER, Price REAL, Seller TEXT)")
            .execute(&pool)
            .await
            .unwrap();
        SqliteSource { pool }
    }

    #[tokio::test]
    async fn test_fetch_preserves_column_order_and_types() {
        let source = make_source().await;
        sqlx::query("INSERT INTO invoices VALUES ('2024-03-01', 5, 19.5, 'Acme')")
            .execute(&source.pool)
            .await
            .unwrap();

        let result = source
            .fetch("SELECT Date, Sold, Price, Seller FROM invoices")
            .await
            .unwrap();

        assert_eq!(result.columns, ["Date", "Sold", "Price", "Seller"]);
        assert_eq!(
            result.rows,
            vec![vec![
                RawValue::Text("2024-03-01".to_string()),
                RawValue::Int(5),
                RawValue::Float(19.5),
                RawValue::Text("Acme".to_string()),
            ]]
        );
    }

    #[tokio::test]
    async fn test_fetch_maps_sql_null() {
        let source = make_source().await;
        sqlx::query("INSERT INTO invoices VALUES (NULL, NULL, NULL, NULL)")
            .execute(&source.pool)
            .await
            .unwrap();

        let result = source.fetch("SELECT Date, Price FROM invoices").await.unwrap();
        assert_eq!(result.rows, vec![vec![RawValue::Null, RawValue::Null]]);
    }

    #[tokio::test]
    async fn test_fetch_empty_result_still_has_columns() {
        let source = make_source().await;

        let result = source
            .fetch("SELECT Date, Seller FROM invoices")
            .await
            .unwrap();

        assert_eq!(result.columns, ["Date", "Seller"]);
        assert!(result.rows.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_surfaces_query_errors() {
        let source = make_source().await;
        assert!(source.fetch("SELECT * FROM no_such_table").await.is_err());
    }
}
