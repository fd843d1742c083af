//! Asset Repository

use async_trait::async_trait;
use shared::models::{Asset, AssetCreate, AssetUpdate, EntityType};
use shared::util::{now_millis, snowflake_id};
use sqlx::{SqliteConnection, SqlitePool};

use super::{RepoError, RepoResult, Updated, lock_row};

const COLUMNS: &str = "id, code, name, specification, category_id, location_id, status, quantity, unit, \
    acquisition_date, acquisition_cost, useful_life_years, accumulated_depreciation, funding_source, notes, \
    bulk_id, bulk_sequence, is_bulk_parent, bulk_total_count, created_at, updated_at";

#[async_trait]
pub trait AssetRepository: Send + Sync {
    async fn find_all(&self) -> RepoResult<Vec<Asset>>;
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Asset>>;
    /// Members of one bulk, by sequence
    async fn find_by_bulk_id(&self, bulk_id: &str) -> RepoResult<Vec<Asset>>;
    async fn create(&self, data: AssetCreate) -> RepoResult<Asset>;
    /// Insert `count` copies of `template` under `bulk_id`, all or nothing
    async fn create_bulk(&self, bulk_id: &str, template: AssetCreate, count: i64) -> RepoResult<Vec<Asset>>;
    async fn update(&self, id: i64, data: AssetUpdate) -> RepoResult<Updated<Asset>>;
    /// Remove the row and return it as it was
    async fn delete(&self, id: i64) -> RepoResult<Asset>;
    /// Number of assets filed under a category
    async fn count_by_category(&self, category_id: i64) -> RepoResult<i64>;
    /// Number of assets placed at a location
    async fn count_by_location(&self, location_id: i64) -> RepoResult<i64>;
}

/// Code of the `sequence`-th member of a bulk
pub fn bulk_item_code(code: &str, sequence: i64) -> String {
    format!("{code}-{sequence:03}")
}

/// Position of a row inside a bulk
struct BulkSlot<'a> {
    bulk_id: &'a str,
    sequence: i64,
    total: i64,
}

#[derive(Clone)]
pub struct SqliteAssetRepository {
    pool: SqlitePool,
}

impl SqliteAssetRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

async fn fetch(conn: &mut SqliteConnection, id: i64) -> RepoResult<Asset> {
    let sql = format!("SELECT {COLUMNS} FROM asset WHERE id = ?");
    let row = sqlx::query_as::<_, Asset>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    row.ok_or(RepoError::NotFound { entity: EntityType::Asset, id })
}

async fn insert(conn: &mut SqliteConnection, code: &str, data: &AssetCreate, bulk: Option<BulkSlot<'_>>) -> RepoResult<Asset> {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO asset (id, code, name, specification, category_id, location_id, status, quantity, unit, \
         acquisition_date, acquisition_cost, useful_life_years, accumulated_depreciation, funding_source, notes, \
         bulk_id, bulk_sequence, is_bulk_parent, bulk_total_count, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(code)
    .bind(&data.name)
    .bind(&data.specification)
    .bind(data.category_id)
    .bind(data.location_id)
    .bind(data.status.unwrap_or_default())
    .bind(data.quantity.unwrap_or(1))
    .bind(&data.unit)
    .bind(&data.acquisition_date)
    .bind(data.acquisition_cost.unwrap_or(0.0))
    .bind(data.useful_life_years)
    .bind(data.accumulated_depreciation.unwrap_or(0.0))
    .bind(&data.funding_source)
    .bind(&data.notes)
    .bind(bulk.as_ref().map(|b| b.bulk_id))
    .bind(bulk.as_ref().map(|b| b.sequence))
    .bind(bulk.as_ref().is_some_and(|b| b.sequence == 1))
    .bind(bulk.as_ref().map(|b| b.total))
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await?;
    fetch(conn, id).await
}

#[async_trait]
impl AssetRepository for SqliteAssetRepository {
    async fn find_all(&self) -> RepoResult<Vec<Asset>> {
        let sql = format!("SELECT {COLUMNS} FROM asset ORDER BY code");
        let rows = sqlx::query_as::<_, Asset>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Asset>> {
        let sql = format!("SELECT {COLUMNS} FROM asset WHERE id = ?");
        let row = sqlx::query_as::<_, Asset>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_bulk_id(&self, bulk_id: &str) -> RepoResult<Vec<Asset>> {
        let sql = format!("SELECT {COLUMNS} FROM asset WHERE bulk_id = ? ORDER BY bulk_sequence");
        let rows = sqlx::query_as::<_, Asset>(&sql)
            .bind(bulk_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn create(&self, data: AssetCreate) -> RepoResult<Asset> {
        let mut conn = self.pool.acquire().await?;
        insert(&mut conn, &data.code, &data, None).await
    }

    async fn create_bulk(&self, bulk_id: &str, template: AssetCreate, count: i64) -> RepoResult<Vec<Asset>> {
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(count.max(0) as usize);
        for sequence in 1..=count {
            let code = bulk_item_code(&template.code, sequence);
            let slot = BulkSlot { bulk_id, sequence, total: count };
            created.push(insert(&mut tx, &code, &template, Some(slot)).await?);
        }
        tx.commit().await?;
        Ok(created)
    }

    async fn update(&self, id: i64, data: AssetUpdate) -> RepoResult<Updated<Asset>> {
        let mut tx = self.pool.begin().await?;
        if !lock_row(&mut tx, "asset", id).await? {
            return Err(RepoError::NotFound { entity: EntityType::Asset, id });
        }
        let before = fetch(&mut tx, id).await?;

        // Optional text columns: NULL keeps the value, '' clears it
        sqlx::query(
            "UPDATE asset SET code = COALESCE(?1, code), name = COALESCE(?2, name), \
             specification = NULLIF(COALESCE(?3, specification), ''), category_id = COALESCE(?4, category_id), \
             location_id = COALESCE(?5, location_id), status = COALESCE(?6, status), \
             quantity = COALESCE(?7, quantity), unit = NULLIF(COALESCE(?8, unit), ''), \
             acquisition_date = NULLIF(COALESCE(?9, acquisition_date), ''), \
             acquisition_cost = COALESCE(?10, acquisition_cost), \
             useful_life_years = COALESCE(?11, useful_life_years), \
             accumulated_depreciation = COALESCE(?12, accumulated_depreciation), \
             funding_source = NULLIF(COALESCE(?13, funding_source), ''), notes = NULLIF(COALESCE(?14, notes), ''), \
             updated_at = ?15 WHERE id = ?16",
        )
        .bind(&data.code)
        .bind(&data.name)
        .bind(&data.specification)
        .bind(data.category_id)
        .bind(data.location_id)
        .bind(data.status)
        .bind(data.quantity)
        .bind(&data.unit)
        .bind(&data.acquisition_date)
        .bind(data.acquisition_cost)
        .bind(data.useful_life_years)
        .bind(data.accumulated_depreciation)
        .bind(&data.funding_source)
        .bind(&data.notes)
        .bind(now_millis())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let after = fetch(&mut tx, id).await?;
        tx.commit().await?;
        Ok(Updated { before, after })
    }

    async fn delete(&self, id: i64) -> RepoResult<Asset> {
        let sql = format!("DELETE FROM asset WHERE id = ? RETURNING {COLUMNS}");
        let row = sqlx::query_as::<_, Asset>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or(RepoError::NotFound { entity: EntityType::Asset, id })
    }

    async fn count_by_category(&self, category_id: i64) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM asset WHERE category_id = ?")
            .bind(category_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn count_by_location(&self, location_id: i64) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM asset WHERE location_id = ?")
            .bind(location_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
