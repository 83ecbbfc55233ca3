//! Database pool with split reader/writer connections in WAL mode.
//!
//! SQLite allows only one writer at a time. `DatabasePool` pairs a
//! multi-connection reader pool with a single-connection writer pool so
//! dialog inserts and translation updates are serialized while reads
//! proceed concurrently.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

/// Split read/write pool for SQLite with WAL mode.
///
/// - `reader`: up to 4 connections for SELECT queries.
/// - `writer`: a single connection for INSERT/UPDATE.
#[derive(Clone)]
pub struct DatabasePool {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Open both pools and run the embedded migrations on the writer.
    ///
    /// The database file is created if missing. Both pools use WAL and a
    /// 5-second busy timeout.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let base_opts = SqliteConnectOptions::from_str(database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .create_if_missing(true);

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(base_opts.clone())
            .await?;

        // Migrate before the read-only pool opens so it sees the schema.
        sqlx::migrate!("../../migrations").run(&writer).await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(base_opts.read_only(true))
            .await?;

        tracing::debug!(url = %database_url, "SQLite pools ready");
        Ok(Self { reader, writer })
    }
}

/// Default database URL inside `data_dir`.
pub fn default_database_url(data_dir: &Path) -> String {
    format!("sqlite://{}", data_dir.join("telephonist.db").display())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pool_creates_dialogs_table() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());

        let pool = DatabasePool::new(&url).await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '_sqlx_migrations'",
        )
        .fetch_all(&pool.reader)
        .await
        .unwrap();

        let names: Vec<&str> = tables.iter().map(|t| t.0.as_str()).collect();
        assert_eq!(names, vec!["dialogs"]);
    }

    #[tokio::test]
    async fn test_pool_wal_mode() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("wal.db").display());

        let pool = DatabasePool::new(&url).await.unwrap();

        let (mode,): (String,) = sqlx::query_as("PRAGMA journal_mode")
            .fetch_one(&pool.writer)
            .await
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }

    #[tokio::test]
    async fn test_pool_reopens_existing_database() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("again.db").display());

        drop(DatabasePool::new(&url).await.unwrap());
        assert!(DatabasePool::new(&url).await.is_ok());
    }

    #[test]
    fn test_default_database_url() {
        let url = default_database_url(Path::new("/var/lib/telephonist"));
        assert_eq!(url, "sqlite:///var/lib/telephonist/telephonist.db");
    }
}
