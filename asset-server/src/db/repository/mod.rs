//! Repository Module
//!
//! One trait per table with a SQLite implementation. Repositories hold no
//! business rules; the service layer decides what is allowed.

pub mod asset;
pub mod audit_log;
pub mod category;
pub mod location;

pub use asset::{AssetRepository, SqliteAssetRepository, bulk_item_code};
pub use audit_log::{AuditLogStore, SqliteAuditLogStore};
pub use category::{CategoryRepository, SqliteCategoryRepository};
pub use location::{LocationRepository, SqliteLocationRepository};

use shared::models::EntityType;
use sqlx::SqliteConnection;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {entity} {id}")]
    NotFound { entity: EntityType, id: i64 },

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::Duplicate(db.message().to_string())
            }
            other => RepoError::Database(other.to_string()),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Row state on both sides of an update
///
/// `before` is read inside the update's own transaction, after the write lock
/// is held, so it is exactly the row the update replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct Updated<T> {
    pub before: T,
    pub after: T,
}

/// Take the database write lock and report whether row `id` exists
///
/// Must be the first statement of a transaction. SQLite opens a write
/// transaction for any UPDATE, even one that touches nothing, so every later
/// read in the same transaction sees rows no other writer can change until
/// commit.
pub(crate) async fn lock_row(conn: &mut SqliteConnection, table: &str, id: i64) -> RepoResult<bool> {
    let sql = format!("UPDATE {table} SET updated_at = updated_at WHERE id = ?");
    let result = sqlx::query(&sql).bind(id).execute(conn).await?;
    Ok(result.rows_affected() > 0)
}
