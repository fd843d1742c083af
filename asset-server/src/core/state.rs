use std::sync::Arc;

use crate::audit::AuditService;
use crate::core::{Config, Result};
use crate::db::DbService;
use crate::db::repository::{
    AuditLogStore, SqliteAssetRepository, SqliteAuditLogStore, SqliteCategoryRepository,
    SqliteLocationRepository,
};
use crate::services::{AssetService, CategoryService, LocationService};

/// 服务器状态
///
/// Built once at startup and cloned into every request; all services hold
/// their repositories behind `Arc`, so clones are cheap and share state.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub audit: AuditService,
    pub assets: AssetService,
    pub categories: CategoryService,
    pub locations: LocationService,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ServerState {
    /// Open the database named by `config` and wire every service
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db = DbService::new(&config.database_path).await?;
        Ok(Self::from_db(config.clone(), db))
    }

    /// Wire services over an already migrated database
    pub fn from_db(config: Config, db: DbService) -> Self {
        let audit_store = Arc::new(SqliteAuditLogStore::new(db.pool.clone()));
        Self::with_audit_store(config, db, audit_store)
    }

    /// Like [`ServerState::from_db`] with a caller-supplied audit store
    pub fn with_audit_store(config: Config, db: DbService, audit_store: Arc<dyn AuditLogStore>) -> Self {
        let assets = Arc::new(SqliteAssetRepository::new(db.pool.clone()));
        let categories = Arc::new(SqliteCategoryRepository::new(db.pool.clone()));
        let locations = Arc::new(SqliteLocationRepository::new(db.pool.clone()));
        let audit = AuditService::new(audit_store);

        Self {
            assets: AssetService::new(assets.clone(), categories.clone(), locations.clone(), audit.clone()),
            categories: CategoryService::new(categories, assets.clone(), audit.clone()),
            locations: LocationService::new(locations, assets, audit.clone()),
            audit,
            config,
            db,
        }
    }
}
