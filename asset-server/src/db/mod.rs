//! Database Module
//!
//! Handles SQLite connection pool and migrations

pub mod repository;

use crate::core::ServerError;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Database service, owns the SQLite connection pool
#[derive(Clone)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Open (or create) the database file, then apply migrations
    pub async fn new(db_path: &str) -> Result<Self, ServerError> {
        if let Some(parent) = Path::new(db_path).parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        // WAL, foreign keys, normal sync; writers wait up to 5s on lock contention
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| ServerError::database(format!("Invalid database path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .optimize_on_close(true, None);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| ServerError::database(format!("Failed to open database: {e}")))?;

        tracing::info!(path = %db_path, "Database connection established (SQLite WAL, busy_timeout=5000ms)");

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool and apply migrations
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, ServerError> {
        sqlx::migrate!("./migrations")
            .set_ignore_missing(true)
            .run(&pool)
            .await
            .map_err(|e| ServerError::database(format!("Failed to apply migrations: {e}")))?;
        tracing::info!("Database migrations applied");

        Ok(Self { pool })
    }

    /// Single-connection in-memory database with the schema applied
    pub async fn in_memory() -> Result<Self, ServerError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| ServerError::database(e.to_string()))?
            .foreign_keys(true);
        // Every connection to :memory: is a separate database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| ServerError::database(format!("Failed to open database: {e}")))?;
        Self::from_pool(pool).await
    }
}
