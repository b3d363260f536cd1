//! Opening the config entry database.

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;

use crate::error::StorageError;

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Config {
    /// `sqlite:reachy.db?mode=rwc`, `sqlite::memory:`, ...
    pub database_url: String,
}

impl Config {
    /// Open the database, creating the file when needed, and apply the
    /// embedded migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] for an unusable URL, a failed connection or a
    /// failed migration.
    pub async fn build(self) -> Result<Database, StorageError> {
        let options = SqliteConnectOptions::from_str(&self.database_url)?
            .create_if_missing(true)
            .busy_timeout(BUSY_TIMEOUT);
        let pool = SqlitePool::connect_with(options).await?;

        let migrator = sqlx::migrate!("./migrations");
        migrator.run(&pool).await?;
        tracing::debug!(
            url = %self.database_url,
            migrations = migrator.iter().count(),
            "config entry store ready"
        );

        Ok(Database { pool })
    }
}

/// An open, migrated config entry database.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory() -> Database {
        Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn should_create_only_the_config_entries_table() {
        let db = memory().await;

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' AND name != '_sqlx_migrations'",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();

        assert_eq!(tables, vec![("config_entries".to_string(),)]);
    }

    #[tokio::test]
    async fn should_reject_port_outside_range_at_schema_level() {
        let db = memory().await;

        let result = sqlx::query(
            "INSERT INTO config_entries (entry_id, title, host, port, device_key, created_at) VALUES ('a', 't', 'h', 0, 'h:0', '2026-01-01T00:00:00Z')",
        )
        .execute(db.pool())
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn should_fail_on_non_sqlite_url() {
        let config = Config {
            database_url: "postgres://nope".to_string(),
        };
        assert!(config.build().await.is_err());
    }
}
