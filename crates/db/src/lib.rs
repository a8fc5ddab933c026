//! SQLite pool factory and schema script runner.
//!
//! One [`Database`] is opened at startup and shared by every request; it is
//! closed once the HTTP server has drained.

use std::path::Path;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

/// Shared handle to the SQLite store.
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if absent) the SQLite file at `path`.
    pub async fn connect(path: &Path, max_connections: u32) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .with_context(|| format!("failed to open database at {}", path.display()))?;

        tracing::info!(
            target: "bookshelf-db",
            path = %path.display(),
            max_connections,
            "database opened"
        );

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Execute a `;`-separated DDL script one statement at a time.
    pub async fn execute_script(&self, script: &str) -> Result<(), sqlx::Error> {
        // sqlx::query prepares a single statement, so split the script first
        for stmt in script.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Close every pooled connection. Pending acquires fail afterwards.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!(target: "bookshelf-db", "database closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"
        CREATE TABLE IF NOT EXISTS notes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            body TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_notes_body ON notes(body);
    "#;

    #[tokio::test]
    async fn connect_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.db");
        assert!(!path.exists());

        let db = Database::connect(&path, 1).await.unwrap();
        db.execute_script(SCRIPT).await.unwrap();
        db.close().await;

        assert!(path.exists());
    }

    #[tokio::test]
    async fn script_is_safe_to_rerun() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::connect(&dir.path().join("notes.db"), 2)
            .await
            .unwrap();

        db.execute_script(SCRIPT).await.unwrap();
        sqlx::query("INSERT INTO notes (body) VALUES (?)")
            .bind("kept")
            .execute(db.pool())
            .await
            .unwrap();
        db.execute_script(SCRIPT).await.unwrap();

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM notes")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);
        db.close().await;
    }

    #[tokio::test]
    async fn bad_statement_surfaces_driver_error() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::connect(&dir.path().join("bad.db"), 1)
            .await
            .unwrap();

        let err = db.execute_script("CREATE TABLEX nope").await.unwrap_err();
        assert!(err.to_string().contains("syntax error"));
        db.close().await;
    }

    #[tokio::test]
    async fn connect_fails_for_unreachable_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("nested").join("x.db");
        assert!(Database::connect(&path, 1).await.is_err());
    }
}
