//! Location Service

use std::sync::Arc;

use shared::models::{AuditAction, EntityType, Location, LocationCreate, LocationUpdate};

use super::error::{ServiceError, ServiceResult};
use super::{non_blank, require_non_blank, run_detached};
use crate::audit::{self, AuditEntry, AuditService};
use crate::db::repository::{AssetRepository, LocationRepository, Updated};

const ENTITY: EntityType = EntityType::Location;

#[derive(Clone)]
pub struct LocationService {
    locations: Arc<dyn LocationRepository>,
    assets: Arc<dyn AssetRepository>,
    audit: AuditService,
}

impl LocationService {
    pub fn new(
        locations: Arc<dyn LocationRepository>,
        assets: Arc<dyn AssetRepository>,
        audit: AuditService,
    ) -> Self {
        Self {
            locations,
            assets,
            audit,
        }
    }

    pub async fn list(&self) -> ServiceResult<Vec<Location>> {
        Ok(self.locations.find_all().await?)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Location> {
        self.locations
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound { entity: ENTITY, id })
    }

    pub async fn create(&self, mut data: LocationCreate, actor: Option<String>) -> ServiceResult<Location> {
        data.code = require_non_blank(&data.code, "code")?;
        data.name = require_non_blank(&data.name, "name")?;

        let this = self.clone();
        run_detached(async move {
            let location = this.locations.create(data).await?;
            tracing::info!(location_id = location.id, code = %location.code, "Location created");

            this.audit
                .record_after_commit(AuditEntry {
                    entity_type: ENTITY,
                    entity_id: location.id,
                    action: AuditAction::Create,
                    actor,
                    changes: audit::create_changes(&location, ENTITY),
                })
                .await;
            Ok(location)
        })
        .await
    }

    pub async fn update(&self, id: i64, mut data: LocationUpdate, actor: Option<String>) -> ServiceResult<Location> {
        data.code = non_blank(data.code, "code")?;
        data.name = non_blank(data.name, "name")?;

        let this = self.clone();
        run_detached(async move {
            let Updated { before, after } = this.locations.update(id, data).await?;
            tracing::info!(location_id = id, "Location updated");

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

    /// Refused while any asset is placed at the location
    pub async fn delete(&self, id: i64, actor: Option<String>) -> ServiceResult<Location> {
        self.get(id).await?;
        let assets = self.assets.count_by_location(id).await?;
        if assets > 0 {
            return Err(ServiceError::InUse { entity: ENTITY, id, assets });
        }

        let this = self.clone();
        run_detached(async move {
            let before = this.locations.delete(id).await?;
            tracing::info!(location_id = id, code = %before.code, "Location deleted");

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
}
