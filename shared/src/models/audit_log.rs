//! Audit Log Model
//!
//! Audit records are append-only: they are created once by the audit
//! service and never updated or deleted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Kind of entity an audit record refers to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum EntityType {
    Asset,
    Category,
    Location,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Category => "category",
            Self::Location => "location",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asset" => Ok(Self::Asset),
            "category" => Ok(Self::Category),
            "location" => Ok(Self::Location),
            other => Err(AppError::invalid_request(format!(
                "unknown entity type: {other}"
            ))
            .with_detail("entity_type", other)),
        }
    }
}

/// Mutation recorded by an audit entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored audit record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AuditLog {
    /// Store-assigned, strictly increasing
    pub id: i64,
    pub entity_type: EntityType,
    pub entity_id: i64,
    pub action: AuditAction,
    pub actor: Option<String>,
    /// JSON change document (`before` / `after` / `changes`)
    #[cfg_attr(feature = "db", sqlx(json))]
    pub changes: serde_json::Value,
    pub created_at: i64,
}

/// Audit record ready to be appended
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditLogCreate {
    pub entity_type: EntityType,
    pub entity_id: i64,
    pub action: AuditAction,
    pub actor: Option<String>,
    pub changes: serde_json::Value,
    pub created_at: i64,
}
