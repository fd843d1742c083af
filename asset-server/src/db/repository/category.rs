//! Asset Category Repository

use async_trait::async_trait;
use shared::models::{AssetCategory, AssetCategoryCreate, AssetCategoryUpdate, EntityType};
use shared::util::{now_millis, snowflake_id};
use sqlx::{SqliteConnection, SqlitePool};

use super::{RepoError, RepoResult, Updated, lock_row};

const COLUMNS: &str = "id, code, name, description, created_at, updated_at";

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_all(&self) -> RepoResult<Vec<AssetCategory>>;
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<AssetCategory>>;
    /// Every stored category code, in no particular order
    async fn codes(&self) -> RepoResult<Vec<String>>;
    /// Insert with an already resolved `code`; `data.code` is ignored
    async fn create(&self, code: String, data: AssetCategoryCreate) -> RepoResult<AssetCategory>;
    async fn update(&self, id: i64, data: AssetCategoryUpdate) -> RepoResult<Updated<AssetCategory>>;
    /// Remove the row and return it as it was
    async fn delete(&self, id: i64) -> RepoResult<AssetCategory>;
}

async fn fetch(conn: &mut SqliteConnection, id: i64) -> RepoResult<AssetCategory> {
    let sql = format!("SELECT {COLUMNS} FROM asset_category WHERE id = ?");
    let row = sqlx::query_as::<_, AssetCategory>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    row.ok_or(RepoError::NotFound { entity: EntityType::Category, id })
}

#[derive(Clone)]
pub struct SqliteCategoryRepository {
    pool: SqlitePool,
}

impl SqliteCategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for SqliteCategoryRepository {
    async fn find_all(&self) -> RepoResult<Vec<AssetCategory>> {
        let sql = format!("SELECT {COLUMNS} FROM asset_category ORDER BY code");
        let rows = sqlx::query_as::<_, AssetCategory>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<AssetCategory>> {
        let sql = format!("SELECT {COLUMNS} FROM asset_category WHERE id = ?");
        let row = sqlx::query_as::<_, AssetCategory>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn codes(&self) -> RepoResult<Vec<String>> {
        let codes = sqlx::query_scalar::<_, String>("SELECT code FROM asset_category")
            .fetch_all(&self.pool)
            .await?;
        Ok(codes)
    }

    async fn create(&self, code: String, data: AssetCategoryCreate) -> RepoResult<AssetCategory> {
        let id = snowflake_id();
        let now = now_millis();
        sqlx::query(
            "INSERT INTO asset_category (id, code, name, description, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&code)
        .bind(&data.name)
        .bind(&data.description)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::Database("Failed to create category".into()))
    }

    async fn update(&self, id: i64, data: AssetCategoryUpdate) -> RepoResult<Updated<AssetCategory>> {
        let mut tx = self.pool.begin().await?;
        if !lock_row(&mut tx, "asset_category", id).await? {
            return Err(RepoError::NotFound { entity: EntityType::Category, id });
        }
        let before = fetch(&mut tx, id).await?;

        sqlx::query(
            "UPDATE asset_category SET code = COALESCE(?1, code), name = COALESCE(?2, name), \
             description = NULLIF(COALESCE(?3, description), ''), updated_at = ?4 WHERE id = ?5",
        )
        .bind(&data.code)
        .bind(&data.name)
        .bind(&data.description)
        .bind(now_millis())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let after = fetch(&mut tx, id).await?;
        tx.commit().await?;
        Ok(Updated { before, after })
    }

    async fn delete(&self, id: i64) -> RepoResult<AssetCategory> {
        let sql = format!("DELETE FROM asset_category WHERE id = ? RETURNING {COLUMNS}");
        let row = sqlx::query_as::<_, AssetCategory>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or(RepoError::NotFound { entity: EntityType::Category, id })
    }
}
