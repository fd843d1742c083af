//! In-memory repository doubles for service tests

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use shared::models::*;
use shared::util::now_millis;

use crate::db::repository::{
    AssetRepository, AuditLogStore, CategoryRepository, LocationRepository, RepoError, RepoResult, Updated,
    bulk_item_code,
};

static NEXT_ID: AtomicI64 = AtomicI64::new(1);

fn next_id() -> i64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

fn duplicate(table: &str, code: &str) -> RepoError {
    RepoError::Duplicate(format!("UNIQUE constraint failed: {table}.code ({code})"))
}

/// Optional text update: absent keeps, empty clears
fn set_text(slot: &mut Option<String>, value: Option<String>) {
    if let Some(v) = value {
        *slot = (!v.is_empty()).then_some(v);
    }
}

fn new_asset(code: String, data: AssetCreate) -> Asset {
    let now = now_millis();
    Asset {
        id: next_id(),
        code,
        name: data.name,
        specification: data.specification,
        category_id: data.category_id,
        location_id: data.location_id,
        status: data.status.unwrap_or_default(),
        quantity: data.quantity.unwrap_or(1),
        unit: data.unit,
        acquisition_date: data.acquisition_date,
        acquisition_cost: data.acquisition_cost.unwrap_or(0.0),
        useful_life_years: data.useful_life_years,
        accumulated_depreciation: data.accumulated_depreciation.unwrap_or(0.0),
        funding_source: data.funding_source,
        notes: data.notes,
        bulk_id: None,
        bulk_sequence: None,
        is_bulk_parent: false,
        bulk_total_count: None,
        created_at: now,
        updated_at: now,
    }
}

#[derive(Default)]
pub struct MemoryAssetRepo {
    rows: Mutex<Vec<Asset>>,
}

#[async_trait]
impl AssetRepository for MemoryAssetRepo {
    async fn find_all(&self) -> RepoResult<Vec<Asset>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Asset>> {
        Ok(self.rows.lock().unwrap().iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_bulk_id(&self, bulk_id: &str) -> RepoResult<Vec<Asset>> {
        let mut members: Vec<Asset> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.bulk_id.as_deref() == Some(bulk_id))
            .cloned()
            .collect();
        members.sort_by_key(|a| a.bulk_sequence);
        Ok(members)
    }

    async fn create(&self, data: AssetCreate) -> RepoResult<Asset> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|a| a.code == data.code) {
            return Err(duplicate("asset", &data.code));
        }
        let asset = new_asset(data.code.clone(), data);
        rows.push(asset.clone());
        Ok(asset)
    }

    async fn create_bulk(&self, bulk_id: &str, template: AssetCreate, count: i64) -> RepoResult<Vec<Asset>> {
        let mut rows = self.rows.lock().unwrap();
        let codes: Vec<String> = (1..=count).map(|seq| bulk_item_code(&template.code, seq)).collect();
        if let Some(taken) = codes.iter().find(|c| rows.iter().any(|a| &a.code == *c)) {
            return Err(duplicate("asset", taken));
        }
        let created: Vec<Asset> = codes
            .into_iter()
            .zip(1..)
            .map(|(code, sequence)| Asset {
                bulk_id: Some(bulk_id.to_string()),
                bulk_sequence: Some(sequence),
                is_bulk_parent: sequence == 1,
                bulk_total_count: Some(count),
                ..new_asset(code, template.clone())
            })
            .collect();
        rows.extend(created.iter().cloned());
        Ok(created)
    }

    async fn update(&self, id: i64, data: AssetUpdate) -> RepoResult<Updated<Asset>> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(code) = &data.code
            && rows.iter().any(|a| a.id != id && &a.code == code)
        {
            return Err(duplicate("asset", code));
        }
        let asset = rows
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(RepoError::NotFound { entity: EntityType::Asset, id })?;
        let before = asset.clone();
        if let Some(v) = data.code { asset.code = v; }
        if let Some(v) = data.name { asset.name = v; }
        set_text(&mut asset.specification, data.specification);
        if let Some(v) = data.category_id { asset.category_id = v; }
        if let Some(v) = data.location_id { asset.location_id = v; }
        if let Some(v) = data.status { asset.status = v; }
        if let Some(v) = data.quantity { asset.quantity = v; }
        set_text(&mut asset.unit, data.unit);
        set_text(&mut asset.acquisition_date, data.acquisition_date);
        if let Some(v) = data.acquisition_cost { asset.acquisition_cost = v; }
        if let Some(v) = data.useful_life_years { asset.useful_life_years = Some(v); }
        if let Some(v) = data.accumulated_depreciation { asset.accumulated_depreciation = v; }
        set_text(&mut asset.funding_source, data.funding_source);
        set_text(&mut asset.notes, data.notes);
        asset.updated_at = now_millis();
        Ok(Updated { before, after: asset.clone() })
    }

    async fn delete(&self, id: i64) -> RepoResult<Asset> {
        let mut rows = self.rows.lock().unwrap();
        let index = rows
            .iter()
            .position(|a| a.id == id)
            .ok_or(RepoError::NotFound { entity: EntityType::Asset, id })?;
        Ok(rows.remove(index))
    }

    async fn count_by_category(&self, category_id: i64) -> RepoResult<i64> {
        Ok(self.rows.lock().unwrap().iter().filter(|a| a.category_id == category_id).count() as i64)
    }

    async fn count_by_location(&self, location_id: i64) -> RepoResult<i64> {
        Ok(self.rows.lock().unwrap().iter().filter(|a| a.location_id == location_id).count() as i64)
    }
}

#[derive(Default)]
pub struct MemoryCategoryRepo {
    rows: Mutex<Vec<AssetCategory>>,
}

#[async_trait]
impl CategoryRepository for MemoryCategoryRepo {
    async fn find_all(&self) -> RepoResult<Vec<AssetCategory>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<AssetCategory>> {
        Ok(self.rows.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }

    async fn codes(&self) -> RepoResult<Vec<String>> {
        Ok(self.rows.lock().unwrap().iter().map(|c| c.code.clone()).collect())
    }

    async fn create(&self, code: String, data: AssetCategoryCreate) -> RepoResult<AssetCategory> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|c| c.code == code) {
            return Err(duplicate("asset_category", &code));
        }
        let now = now_millis();
        let category = AssetCategory {
            id: next_id(),
            code,
            name: data.name,
            description: data.description,
            created_at: now,
            updated_at: now,
        };
        rows.push(category.clone());
        Ok(category)
    }

    async fn update(&self, id: i64, data: AssetCategoryUpdate) -> RepoResult<Updated<AssetCategory>> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(code) = &data.code
            && rows.iter().any(|c| c.id != id && &c.code == code)
        {
            return Err(duplicate("asset_category", code));
        }
        let category = rows
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RepoError::NotFound { entity: EntityType::Category, id })?;
        let before = category.clone();
        if let Some(v) = data.code { category.code = v; }
        if let Some(v) = data.name { category.name = v; }
        set_text(&mut category.description, data.description);
        category.updated_at = now_millis();
        Ok(Updated { before, after: category.clone() })
    }

    async fn delete(&self, id: i64) -> RepoResult<AssetCategory> {
        let mut rows = self.rows.lock().unwrap();
        let index = rows
            .iter()
            .position(|c| c.id == id)
            .ok_or(RepoError::NotFound { entity: EntityType::Category, id })?;
        Ok(rows.remove(index))
    }
}

#[derive(Default)]
pub struct MemoryLocationRepo {
    rows: Mutex<Vec<Location>>,
}

#[async_trait]
impl LocationRepository for MemoryLocationRepo {
    async fn find_all(&self) -> RepoResult<Vec<Location>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Location>> {
        Ok(self.rows.lock().unwrap().iter().find(|l| l.id == id).cloned())
    }

    async fn create(&self, data: LocationCreate) -> RepoResult<Location> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|l| l.code == data.code) {
            return Err(duplicate("location", &data.code));
        }
        let now = now_millis();
        let location = Location {
            id: next_id(),
            code: data.code,
            name: data.name,
            building: data.building,
            floor: data.floor,
            room: data.room,
            description: data.description,
            created_at: now,
            updated_at: now,
        };
        rows.push(location.clone());
        Ok(location)
    }

    async fn update(&self, id: i64, data: LocationUpdate) -> RepoResult<Updated<Location>> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(code) = &data.code
            && rows.iter().any(|l| l.id != id && &l.code == code)
        {
            return Err(duplicate("location", code));
        }
        let location = rows
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(RepoError::NotFound { entity: EntityType::Location, id })?;
        let before = location.clone();
        if let Some(v) = data.code { location.code = v; }
        if let Some(v) = data.name { location.name = v; }
        set_text(&mut location.building, data.building);
        set_text(&mut location.floor, data.floor);
        set_text(&mut location.room, data.room);
        set_text(&mut location.description, data.description);
        location.updated_at = now_millis();
        Ok(Updated { before, after: location.clone() })
    }

    async fn delete(&self, id: i64) -> RepoResult<Location> {
        let mut rows = self.rows.lock().unwrap();
        let index = rows
            .iter()
            .position(|l| l.id == id)
            .ok_or(RepoError::NotFound { entity: EntityType::Location, id })?;
        Ok(rows.remove(index))
    }
}

/// Audit store that keeps records in insertion order
#[derive(Default)]
pub struct MemoryAuditStore {
    rows: Mutex<Vec<AuditLog>>,
    last_limit: Mutex<Option<i64>>,
}

impl MemoryAuditStore {
    /// Every record, oldest first
    pub fn all(&self) -> Vec<AuditLog> {
        self.rows.lock().unwrap().clone()
    }

    pub fn count_for(&self, entity_type: EntityType, entity_id: i64) -> usize {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.entity_type == entity_type && r.entity_id == entity_id)
            .count()
    }

    /// Limit passed to the most recent `list_recent` call
    pub fn last_limit(&self) -> Option<i64> {
        *self.last_limit.lock().unwrap()
    }
}

#[async_trait]
impl AuditLogStore for MemoryAuditStore {
    async fn append(&self, record: AuditLogCreate) -> RepoResult<i64> {
        let mut rows = self.rows.lock().unwrap();
        let id = rows.len() as i64 + 1;
        rows.push(AuditLog {
            id,
            entity_type: record.entity_type,
            entity_id: record.entity_id,
            action: record.action,
            actor: record.actor,
            changes: record.changes,
            created_at: record.created_at,
        });
        Ok(id)
    }

    async fn list_by_entity(&self, entity_type: EntityType, entity_id: i64) -> RepoResult<Vec<AuditLog>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .rev()
            .filter(|r| r.entity_type == entity_type && r.entity_id == entity_id)
            .cloned()
            .collect())
    }

    async fn list_recent(&self, limit: i64) -> RepoResult<Vec<AuditLog>> {
        *self.last_limit.lock().unwrap() = Some(limit);
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().rev().take(limit as usize).cloned().collect())
    }
}

/// Audit store whose writes always fail
pub struct FailingAuditStore;

#[async_trait]
impl AuditLogStore for FailingAuditStore {
    async fn append(&self, _record: AuditLogCreate) -> RepoResult<i64> {
        Err(RepoError::Database("disk I/O error".into()))
    }

    async fn list_by_entity(&self, _entity_type: EntityType, _entity_id: i64) -> RepoResult<Vec<AuditLog>> {
        Ok(Vec::new())
    }

    async fn list_recent(&self, _limit: i64) -> RepoResult<Vec<AuditLog>> {
        Ok(Vec::new())
    }
}

/// Audit store that waits before every write
pub struct SlowAuditStore {
    pub inner: Arc<MemoryAuditStore>,
    pub delay: Duration,
}

#[async_trait]
impl AuditLogStore for SlowAuditStore {
    async fn append(&self, record: AuditLogCreate) -> RepoResult<i64> {
        tokio::time::sleep(self.delay).await;
        self.inner.append(record).await
    }

    async fn list_by_entity(&self, entity_type: EntityType, entity_id: i64) -> RepoResult<Vec<AuditLog>> {
        self.inner.list_by_entity(entity_type, entity_id).await
    }

    async fn list_recent(&self, limit: i64) -> RepoResult<Vec<AuditLog>> {
        self.inner.list_recent(limit).await
    }
}
