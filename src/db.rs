//! SQLite connection pool.
//!
//! `sync` writes one row at a time while `serve`, `list` or `stats` may read
//! the same file from another process. WAL lets those readers proceed during
//! a write, and the busy timeout makes a second writer wait for the lock
//! instead of failing with `SQLITE_BUSY`.

use anyhow::{Context, Result};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::time::Duration;

use crate::config::Config;

pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Upserts are sequential; extra connections only serve concurrent API reads.
const MAX_CONNECTIONS: u32 = 4;

/// Open (creating if needed) the database at `[db].path`.
pub async fn connect(config: &Config) -> Result<SqlitePool> {
    let db_path = &config.db.path;

    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create database directory: {}", parent.display()))?;
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(BUSY_TIMEOUT);

    SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open database: {}", db_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_connect_creates_directory_and_sets_pragmas() {
        let tmp = TempDir::new().unwrap();
        let db_path = tmp.path().join("nested/dir/harvest.sqlite");
        let cfg = parse_config(&format!(
            "[db]\npath = \"{}\"\n\n[youtube]\nchannel_id = \"UC1\"\n",
            db_path.display()
        ))
        .unwrap();

        let pool = connect(&cfg).await.unwrap();
        assert!(db_path.exists());

        let journal: String = sqlx::query_scalar("PRAGMA journal_mode")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(journal, "wal");

        let timeout_ms: i64 = sqlx::query_scalar("PRAGMA busy_timeout")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(timeout_ms, BUSY_TIMEOUT.as_millis() as i64);

        pool.close().await;
    }
}
