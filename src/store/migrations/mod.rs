//! SQLite schema migrations for `SqliteStore`.
//!
//! Migration files live next to this module:
//! - `migration_NN_up.sql` takes the schema from version `NN-1` to `NN`
//! - `migration_NN_down.sql` takes it from `NN` back to `NN-1`

use crate::Result;
use anyhow::{bail, Context};
use sqlx::{Executor, SqlitePool};
use tracing::debug;

struct Migration {
    /// The version the schema is at after running `up_sql`.
    version: i32,
    up_sql: &'static str,
    down_sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    up_sql: include_str!("migration_01_up.sql"),
    down_sql: include_str!("migration_01_down.sql"),
}];

/// Moves the schema from `current` to `target`, one version at a time, in whichever direction is
/// needed. Every required migration is checked for before the first one runs.
pub(crate) async fn run(pool: &SqlitePool, current: i32, target: i32) -> Result<()> {
    if current == target {
        debug!("Schema already at version {target}");
        return Ok(());
    }
    validate(current, target)?;

    if current < target {
        for version in (current + 1)..=target {
            debug!("Running migration {version:02} (up)");
            run_one(pool, find(version)?.up_sql, version).await?;
        }
    } else {
        for version in ((target + 1)..=current).rev() {
            debug!("Running migration {version:02} (down)");
            run_one(pool, find(version)?.down_sql, version - 1).await?;
        }
    }

    debug!("Schema now at version {target}");
    Ok(())
}

fn find(version: i32) -> Result<&'static Migration> {
    MIGRATIONS
        .iter()
        .find(|m| m.version == version)
        .with_context(|| format!("Migration {version} not found"))
}

/// Runs `sql` and records `new_version` in one transaction.
async fn run_one(pool: &SqlitePool, sql: &str, new_version: i32) -> Result<()> {
    let mut tx = pool
        .begin()
        .await
        .context("Failed to begin migration transaction")?;

    tx.execute(sql)
        .await
        .context("Failed to execute migration SQL")?;

    sqlx::query("DELETE FROM schema_version")
        .execute(&mut *tx)
        .await
        .context("Failed to clear schema_version")?;

    sqlx::query("INSERT INTO schema_version (version) VALUES (?)")
        .bind(new_version)
        .execute(&mut *tx)
        .await
        .context("Failed to update schema_version")?;

    tx.commit()
        .await
        .context("Failed to commit migration transaction")
}

fn validate(current: i32, target: i32) -> Result<()> {
    let (start, end) = if current < target {
        (current + 1, target)
    } else {
        (target + 1, current)
    };
    for version in start..=end {
        if !MIGRATIONS.iter().any(|m| m.version == version) {
            bail!(
                "Migration {version} is missing but required to migrate from version {current} to {target}"
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use tempfile::TempDir;

    async fn create_test_db() -> (TempDir, SqlitePool) {
        let temp_dir = TempDir::new().unwrap();
        let options = SqliteConnectOptions::new()
            .filename(temp_dir.path().join("test.sqlite"))
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        sqlx::query("CREATE TABLE schema_version (version INTEGER NOT NULL)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO schema_version (version) VALUES (0)")
            .execute(&pool)
            .await
            .unwrap();
        (temp_dir, pool)
    }

    async fn schema_version(pool: &SqlitePool) -> i32 {
        let row: (i32,) = sqlx::query_as("SELECT MAX(version) FROM schema_version")
            .fetch_one(pool)
            .await
            .unwrap();
        row.0
    }

    async fn table_exists(pool: &SqlitePool, name: &str) -> bool {
        let row: (i32,) =
            sqlx::query_as("SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?")
                .bind(name)
                .fetch_one(pool)
                .await
                .unwrap();
        row.0 > 0
    }

    #[tokio::test]
    async fn test_up_then_down() {
        let (_dir, pool) = create_test_db().await;
        run(&pool, 0, 1).await.unwrap();
        assert_eq!(schema_version(&pool).await, 1);
        assert!(table_exists(&pool, "kv").await);

        run(&pool, 1, 0).await.unwrap();
        assert_eq!(schema_version(&pool).await, 0);
        assert!(!table_exists(&pool, "kv").await);
    }

    #[tokio::test]
    async fn test_no_op_at_target() {
        let (_dir, pool) = create_test_db().await;
        run(&pool, 0, 1).await.unwrap();
        run(&pool, 1, 1).await.unwrap();
        assert_eq!(schema_version(&pool).await, 1);
    }

    #[test]
    fn test_validate() {
        assert!(validate(0, 1).is_ok());
        assert!(validate(1, 0).is_ok());
        assert!(validate(0, 2).is_err());
    }
}
