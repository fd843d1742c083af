//! Asset Category Model

use serde::{Deserialize, Serialize};

/// Asset category entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AssetCategory {
    pub id: i64,
    /// Category code, unique; numeric codes step by 10
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create category payload
///
/// `code` is generated when absent or blank.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetCategoryCreate {
    pub code: Option<String>,
    pub name: String,
    pub description: Option<String>,
}

/// Update category payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetCategoryUpdate {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Next generated category code
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryCode {
    pub code: String,
}
