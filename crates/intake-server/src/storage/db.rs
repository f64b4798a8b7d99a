//! SQLite database layer (embedded, no external dependencies)

use anyhow::{Context, Result};
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::sync::Arc;
use thiserror::Error;

/// Failures surfaced by storage operations.
///
/// Only the unique-constraint case is distinguished; everything else is
/// reported as a generic database failure carrying the driver's message.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("email already exists")]
    DuplicateEmail,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A stored user record. Identity and timestamp are assigned by SQLite,
/// never by callers.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

pub struct Database {
    pool: Arc<SqlitePool>,
}

impl Database {
    pub async fn new(database_path: &str) -> Result<Self> {
        tracing::info!("Opening SQLite database at: {}", database_path);

        // Create parent directory if needed
        if let Some(parent) = std::path::Path::new(database_path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create database directory: {}", parent.display())
                })?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| {
                format!("Failed to connect to SQLite database at: {}", database_path)
            })?;

        // Schema creation is non-fatal: a failure here surfaces later as an
        // insert/query failure rather than aborting startup.
        if let Err(e) = Self::ensure_schema(&pool).await {
            tracing::warn!("Schema creation failed: {:#}", e);
        }

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// In-memory database for tests. A single pooled connection, since each
    /// SQLite `:memory:` connection is its own database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::new().filename(":memory:");

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .context("Failed to open in-memory SQLite database")?;

        Self::ensure_schema(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Idempotent, safe to run on every process start.
    async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                phone TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Inserts one record and returns the id SQLite assigned to it.
    pub async fn insert_record(
        &self,
        name: &str,
        email: &str,
        phone: Option<&str>,
    ) -> std::result::Result<i64, StorageError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, phone)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(phone)
        .execute(&*self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => StorageError::DuplicateEmail,
            _ => StorageError::Database(e),
        })?;

        Ok(result.last_insert_rowid())
    }

    /// All records, most recent first. The id tie-break keeps inserts within
    /// the same CURRENT_TIMESTAMP granule in insertion-reverse order.
    pub async fn list_records(&self) -> std::result::Result<Vec<UserRecord>, StorageError> {
        let rows: Vec<UserRecord> = sqlx::query_as(
            r#"
            SELECT id, name, email, phone, created_at
            FROM users
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&*self.pool)
        .await?;

        Ok(rows)
    }
}
