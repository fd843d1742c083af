//! Asset Service

use std::sync::Arc;

use shared::models::{Asset, AssetBulkCreate, AssetCreate, AssetUpdate, AuditAction, EntityType};
use uuid::Uuid;

use super::error::{ServiceError, ServiceResult};
use super::{non_blank, require_non_blank, run_detached};
use crate::audit::{self, AuditEntry, AuditService};
use crate::db::repository::{AssetRepository, CategoryRepository, LocationRepository, Updated};

const ENTITY: EntityType = EntityType::Asset;

/// Bounds on the number of members in one bulk create
pub const MIN_BULK_COUNT: i64 = 2;
pub const MAX_BULK_COUNT: i64 = 200;

#[derive(Clone)]
pub struct AssetService {
    assets: Arc<dyn AssetRepository>,
    categories: Arc<dyn CategoryRepository>,
    locations: Arc<dyn LocationRepository>,
    audit: AuditService,
}

impl AssetService {
    pub fn new(
        assets: Arc<dyn AssetRepository>,
        categories: Arc<dyn CategoryRepository>,
        locations: Arc<dyn LocationRepository>,
        audit: AuditService,
    ) -> Self {
        Self {
            assets,
            categories,
            locations,
            audit,
        }
    }

    pub async fn list(&self) -> ServiceResult<Vec<Asset>> {
        Ok(self.assets.find_all().await?)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Asset> {
        self.assets
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound { entity: ENTITY, id })
    }

    pub async fn create(&self, mut data: AssetCreate, actor: Option<String>) -> ServiceResult<Asset> {
        self.check_new(&mut data).await?;

        let this = self.clone();
        run_detached(async move {
            let asset = this.assets.create(data).await?;
            tracing::info!(asset_id = asset.id, code = %asset.code, "Asset created");
            this.record_created(&asset, actor).await;
            Ok(asset)
        })
        .await
    }

    /// Create `count` identical assets sharing one bulk id
    ///
    /// Member codes are `{code}-001`, `{code}-002`, ... and each member gets
    /// its own create record.
    pub async fn create_bulk(&self, data: AssetBulkCreate, actor: Option<String>) -> ServiceResult<Vec<Asset>> {
        let AssetBulkCreate { mut template, count } = data;
        if !(MIN_BULK_COUNT..=MAX_BULK_COUNT).contains(&count) {
            return Err(ServiceError::validation(format!(
                "count must be between {MIN_BULK_COUNT} and {MAX_BULK_COUNT} (got {count})"
            )));
        }
        self.check_new(&mut template).await?;
        let bulk_id = Uuid::new_v4().to_string();

        let this = self.clone();
        run_detached(async move {
            let created = this.assets.create_bulk(&bulk_id, template, count).await?;
            tracing::info!(bulk_id = %bulk_id, count, "Bulk assets created");
            for asset in &created {
                this.record_created(asset, actor.clone()).await;
            }
            Ok(created)
        })
        .await
    }

    /// Members of a bulk in sequence order; empty for an unknown id
    pub async fn list_bulk(&self, bulk_id: &str) -> ServiceResult<Vec<Asset>> {
        Ok(self.assets.find_by_bulk_id(bulk_id).await?)
    }

    pub async fn update(&self, id: i64, mut data: AssetUpdate, actor: Option<String>) -> ServiceResult<Asset> {
        let current = self.get(id).await?;

        data.code = non_blank(data.code, "code")?;
        data.name = non_blank(data.name, "name")?;
        check_quantity(data.quantity)?;
        if let Some(category_id) = data.category_id
            && category_id != current.category_id
        {
            self.ensure_category(category_id).await?;
        }
        if let Some(location_id) = data.location_id
            && location_id != current.location_id
        {
            self.ensure_location(location_id).await?;
        }

        let this = self.clone();
        run_detached(async move {
            let Updated { before, after } = this.assets.update(id, data).await?;
            tracing::info!(asset_id = id, "Asset updated");

            this.audit
                .record_after_commit(AuditEntry {
                    entity_type: ENTITY,
                    entity_id: id,
                    action: AuditAction::Update,
                    actor,
                    changes: audit::update_changes(&before, &after, ENTITY),
                })
                .await;
            Ok(after)
        })
        .await
    }

    pub async fn delete(&self, id: i64, actor: Option<String>) -> ServiceResult<Asset> {
        self.get(id).await?;

        let this = self.clone();
        run_detached(async move {
            let before = this.assets.delete(id).await?;
            tracing::info!(asset_id = id, code = %before.code, "Asset deleted");

            this.audit
                .record_after_commit(AuditEntry {
                    entity_type: ENTITY,
                    entity_id: id,
                    action: AuditAction::Delete,
                    actor,
                    changes: audit::delete_changes(&before, ENTITY),
                })
                .await;
            Ok(before)
        })
        .await
    }

    /// Normalise and validate a new asset, including its references
    async fn check_new(&self, data: &mut AssetCreate) -> ServiceResult<()> {
        data.code = require_non_blank(&data.code, "code")?;
        data.name = require_non_blank(&data.name, "name")?;
        check_quantity(data.quantity)?;
        self.ensure_category(data.category_id).await?;
        self.ensure_location(data.location_id).await
    }

    async fn record_created(&self, asset: &Asset, actor: Option<String>) {
        self.audit
            .record_after_commit(AuditEntry {
                entity_type: ENTITY,
                entity_id: asset.id,
                action: AuditAction::Create,
                actor,
                changes: audit::create_changes(asset, ENTITY),
            })
            .await;
    }

    async fn ensure_category(&self, id: i64) -> ServiceResult<()> {
        match self.categories.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::InvalidReference { entity: EntityType::Category, id }),
        }
    }

    async fn ensure_location(&self, id: i64) -> ServiceResult<()> {
        match self.locations.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::InvalidReference { entity: EntityType::Location, id }),
        }
    }
}

fn check_quantity(quantity: Option<i64>) -> ServiceResult<()> {
    match quantity {
        Some(q) if q < 1 => Err(ServiceError::validation(format!(
            "quantity must be at least 1 (got {q})"
        ))),
        _ => Ok(()),
    }
}
