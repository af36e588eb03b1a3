//! Implements the `KeyValueStore` trait on a SQLite database using `sqlx`.

use crate::store::{migrations, KeyValueStore};
use crate::Result;
use anyhow::Context;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use tracing::{debug, trace};

/// The schema version this build expects. Opening a database migrates it to this version.
const SCHEMA_VERSION: i32 = 1;

#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// - Creates the SQLite file at `path` if it does not exist
    /// - Creates the `schema_version` table if it does not exist
    /// - Runs migrations up to `SCHEMA_VERSION`
    pub async fn open(path: &Path) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .with_context(|| format!("Unable to open SQLite database {}", path.display()))?;

        let current = bootstrap(&pool).await?;
        debug!("SQLite schema is at version {current}");
        migrations::run(&pool, current, SCHEMA_VERSION).await?;

        Ok(Self { pool })
    }
}

/// Makes sure `schema_version` exists and returns the version it records.
async fn bootstrap(pool: &SqlitePool) -> Result<i32> {
    sqlx::query("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)")
        .execute(pool)
        .await
        .context("Failed to create schema_version table")?;

    let row: (Option<i32>,) = sqlx::query_as("SELECT MAX(version) FROM schema_version")
        .fetch_one(pool)
        .await
        .context("Failed to query schema version")?;

    match row.0 {
        Some(version) => Ok(version),
        None => {
            sqlx::query("INSERT INTO schema_version (version) VALUES (0)")
                .execute(pool)
                .await
                .context("Failed to insert initial schema version")?;
            Ok(0)
        }
    }
}

#[async_trait::async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&mut self, key: &str) -> Result<Option<Value>> {
        trace!("get {key}");
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to read '{key}'"))?;

        match row {
            None => Ok(None),
            Some((text,)) => serde_json::from_str(&text)
                .map(Some)
                .with_context(|| format!("The stored value of '{key}' is not JSON")),
        }
    }

    async fn set_many(&mut self, entries: Vec<(String, Value)>) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        for (key, value) in entries {
            trace!("set {key}");
            sqlx::query(
                "INSERT INTO kv (key, value) VALUES (?, ?) \
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            )
            .bind(&key)
            .bind(value.to_string())
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to write '{key}'"))?;
        }

        tx.commit().await.context("Failed to commit transaction")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_creates_schema() {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::open(&dir.path().join("budget.sqlite"))
            .await
            .unwrap();
        let row: (i32,) = sqlx::query_as("SELECT MAX(version) FROM schema_version")
            .fetch_one(&store.pool)
            .await
            .unwrap();
        assert_eq!(row.0, SCHEMA_VERSION);
    }

    #[tokio::test]
    async fn test_set_many_and_get() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("budget.sqlite");
        let mut store = SqliteStore::open(&path).await.unwrap();
        assert!(store.get("bills").await.unwrap().is_none());

        store
            .set_many(vec![
                ("bills".to_string(), json!([{"name": "Rent"}])),
                ("savings".to_string(), json!([])),
            ])
            .await
            .unwrap();
        store
            .set_many(vec![("savings".to_string(), json!([1]))])
            .await
            .unwrap();
        drop(store);

        let mut reopened = SqliteStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.get("bills").await.unwrap(),
            Some(json!([{"name": "Rent"}]))
        );
        assert_eq!(reopened.get("savings").await.unwrap(), Some(json!([1])));
    }
}
