//! Asset Category Service

use std::sync::Arc;

use shared::models::{AssetCategory, AssetCategoryCreate, AssetCategoryUpdate, AuditAction, EntityType};

use super::error::{ServiceError, ServiceResult};
use super::{non_blank, require_non_blank, run_detached};
use crate::audit::{self, AuditEntry, AuditService};
use crate::db::repository::{AssetRepository, CategoryRepository, Updated};

const ENTITY: EntityType = EntityType::Category;

/// Step between generated category codes
const CODE_STEP: u64 = 10;

/// Next code after the highest purely numeric code, or `"10"` when none exist
pub fn next_category_code<S: AsRef<str>>(codes: &[S]) -> String {
    codes
        .iter()
        .filter_map(|c| {
            let c = c.as_ref().trim();
            if !c.is_empty() && c.bytes().all(|b| b.is_ascii_digit()) {
                c.parse::<u64>().ok()
            } else {
                None
            }
        })
        .max()
        .map_or(CODE_STEP, |max| max.saturating_add(CODE_STEP))
        .to_string()
}

#[derive(Clone)]
pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
    assets: Arc<dyn AssetRepository>,
    audit: AuditService,
}

impl CategoryService {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        assets: Arc<dyn AssetRepository>,
        audit: AuditService,
    ) -> Self {
        Self {
            categories,
            assets,
            audit,
        }
    }

    pub async fn list(&self) -> ServiceResult<Vec<AssetCategory>> {
        Ok(self.categories.find_all().await?)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<AssetCategory> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound { entity: ENTITY, id })
    }

    pub async fn next_code(&self) -> ServiceResult<String> {
        let codes = self.categories.codes().await?;
        Ok(next_category_code(&codes))
    }

    pub async fn create(&self, mut data: AssetCategoryCreate, actor: Option<String>) -> ServiceResult<AssetCategory> {
        data.name = require_non_blank(&data.name, "name")?;
        let code = match data.code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => code.to_string(),
            _ => self.next_code().await?,
        };

        let this = self.clone();
        run_detached(async move {
            let category = this.categories.create(code, data).await?;
            tracing::info!(category_id = category.id, code = %category.code, "Category created");

            this.audit
                .record_after_commit(AuditEntry {
                    entity_type: ENTITY,
                    entity_id: category.id,
                    action: AuditAction::Create,
                    actor,
                    changes: audit::create_changes(&category, ENTITY),
                })
                .await;
            Ok(category)
        })
        .await
    }

    pub async fn update(
        &self,
        id: i64,
        mut data: AssetCategoryUpdate,
        actor: Option<String>,
    ) -> ServiceResult<AssetCategory> {
        data.code = non_blank(data.code, "code")?;
        data.name = non_blank(data.name, "name")?;

        let this = self.clone();
        run_detached(async move {
            let Updated { before, after } = this.categories.update(id, data).await?;
            tracing::info!(category_id = id, "Category updated");

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

    /// Refused while any asset is filed under the category
    pub async fn delete(&self, id: i64, actor: Option<String>) -> ServiceResult<AssetCategory> {
        self.get(id).await?;
        let assets = self.assets.count_by_category(id).await?;
        if assets > 0 {
            return Err(ServiceError::InUse { entity: ENTITY, id, assets });
        }

        let this = self.clone();
        run_detached(async move {
            let before = this.categories.delete(id).await?;
            tracing::info!(category_id = id, code = %before.code, "Category deleted");

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
