//! Service-layer errors and their HTTP mapping

use shared::error::{AppError, ErrorCode};
use shared::models::EntityType;
use thiserror::Error;

use crate::db::repository::RepoError;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input rejected before touching storage
    #[error("{0}")]
    Validation(String),

    /// Asset points at a category or location that does not exist
    #[error("{entity} {id} does not exist")]
    InvalidReference { entity: EntityType, id: i64 },

    /// Delete refused while assets still reference the row
    #[error("{entity} {id} is still referenced by {assets} asset(s)")]
    InUse { entity: EntityType, id: i64, assets: i64 },

    #[error("{entity} {id} not found")]
    NotFound { entity: EntityType, id: i64 },

    /// Database unavailable or constraint violated
    #[error("storage error: {0}")]
    Storage(RepoError),

    /// The task running a write panicked or was aborted
    #[error("write task failed: {0}")]
    Interrupted(String),
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<RepoError> for ServiceError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            other => Self::Storage(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        let message = err.to_string();
        match err {
            ServiceError::Validation(_) => AppError::validation(message),
            ServiceError::InvalidReference { entity, id } => {
                AppError::with_message(ErrorCode::AssetReferenceInvalid, message)
                    .with_detail("entity_type", entity.as_str())
                    .with_detail("id", id)
            }
            ServiceError::InUse { entity, id, assets } => {
                let code = match entity {
                    EntityType::Category => ErrorCode::CategoryInUse,
                    EntityType::Location => ErrorCode::LocationInUse,
                    EntityType::Asset => ErrorCode::ValidationFailed,
                };
                AppError::with_message(code, message)
                    .with_detail("id", id)
                    .with_detail("assets", assets)
            }
            ServiceError::NotFound { entity, id } => {
                let code = match entity {
                    EntityType::Asset => ErrorCode::AssetNotFound,
                    EntityType::Category => ErrorCode::CategoryNotFound,
                    EntityType::Location => ErrorCode::LocationNotFound,
                };
                AppError::with_message(code, message).with_detail("id", id)
            }
            ServiceError::Storage(_) => AppError::database(message),
            ServiceError::Interrupted(_) => AppError::with_message(ErrorCode::InternalError, message),
        }
    }
}
