//! Location Repository

use async_trait::async_trait;
use shared::models::{EntityType, Location, LocationCreate, LocationUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::{SqliteConnection, SqlitePool};

use super::{RepoError, RepoResult, Updated, lock_row};

const COLUMNS: &str = "id, code, name, building, floor, room, description, created_at, updated_at";

#[async_trait]
pub trait LocationRepository: Send + Sync {
    async fn find_all(&self) -> RepoResult<Vec<Location>>;
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Location>>;
    async fn create(&self, data: LocationCreate) -> RepoResult<Location>;
    async fn update(&self, id: i64, data: LocationUpdate) -> RepoResult<Updated<Location>>;
    /// Remove the row and return it as it was
    async fn delete(&self, id: i64) -> RepoResult<Location>;
}

async fn fetch(conn: &mut SqliteConnection, id: i64) -> RepoResult<Location> {
    let sql = format!("SELECT {COLUMNS} FROM location WHERE id = ?");
    let row = sqlx::query_as::<_, Location>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    row.ok_or(RepoError::NotFound { entity: EntityType::Location, id })
}

#[derive(Clone)]
pub struct SqliteLocationRepository {
    pool: SqlitePool,
}

impl SqliteLocationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocationRepository for SqliteLocationRepository {
    async fn find_all(&self) -> RepoResult<Vec<Location>> {
        let sql = format!("SELECT {COLUMNS} FROM location ORDER BY code");
        let rows = sqlx::query_as::<_, Location>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Location>> {
        let sql = format!("SELECT {COLUMNS} FROM location WHERE id = ?");
        let row = sqlx::query_as::<_, Location>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create(&self, data: LocationCreate) -> RepoResult<Location> {
        let id = snowflake_id();
        let now = now_millis();
        sqlx::query(
            "INSERT INTO location (id, code, name, building, floor, room, description, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&data.code)
        .bind(&data.name)
        .bind(&data.building)
        .bind(&data.floor)
        .bind(&data.room)
        .bind(&data.description)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::Database("Failed to create location".into()))
    }

    async fn update(&self, id: i64, data: LocationUpdate) -> RepoResult<Updated<Location>> {
        let mut tx = self.pool.begin().await?;
        if !lock_row(&mut tx, "location", id).await? {
            return Err(RepoError::NotFound { entity: EntityType::Location, id });
        }
        let before = fetch(&mut tx, id).await?;

        // NULL keeps a column, '' clears an optional one
        sqlx::query(
            "UPDATE location SET code = COALESCE(?1, code), name = COALESCE(?2, name), \
             building = NULLIF(COALESCE(?3, building), ''), floor = NULLIF(COALESCE(?4, floor), ''), \
             room = NULLIF(COALESCE(?5, room), ''), description = NULLIF(COALESCE(?6, description), ''), \
             updated_at = ?7 WHERE id = ?8",
        )
        .bind(&data.code)
        .bind(&data.name)
        .bind(&data.building)
        .bind(&data.floor)
        .bind(&data.room)
        .bind(&data.description)
        .bind(now_millis())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let after = fetch(&mut tx, id).await?;
        tx.commit().await?;
        Ok(Updated { before, after })
    }

    async fn delete(&self, id: i64) -> RepoResult<Location> {
        let sql = format!("DELETE FROM location WHERE id = ? RETURNING {COLUMNS}");
        let row = sqlx::query_as::<_, Location>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or(RepoError::NotFound { entity: EntityType::Location, id })
    }
}
