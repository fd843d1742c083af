//! Asset Model

use serde::{Deserialize, Serialize};

/// Physical condition of an asset
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum AssetStatus {
    #[default]
    Good,
    Damaged,
    /// Usable but no longer fit for purpose
    Inadequate,
}

/// Asset entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Asset {
    pub id: i64,
    /// Inventory code, unique across assets
    pub code: String,
    pub name: String,
    pub specification: Option<String>,
    pub category_id: i64,
    pub location_id: i64,
    pub status: AssetStatus,
    pub quantity: i64,
    pub unit: Option<String>,
    /// ISO date (YYYY-MM-DD)
    pub acquisition_date: Option<String>,
    pub acquisition_cost: f64,
    pub useful_life_years: Option<i64>,
    pub accumulated_depreciation: f64,
    pub funding_source: Option<String>,
    pub notes: Option<String>,
    /// Shared by every asset created in one bulk request
    #[serde(default)]
    pub bulk_id: Option<String>,
    /// 1-based position inside the bulk
    #[serde(default)]
    pub bulk_sequence: Option<i64>,
    /// The first asset of a bulk, shown as the group's row
    #[serde(default)]
    pub is_bulk_parent: bool,
    #[serde(default)]
    pub bulk_total_count: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create asset payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetCreate {
    pub code: String,
    pub name: String,
    pub specification: Option<String>,
    pub category_id: i64,
    pub location_id: i64,
    pub status: Option<AssetStatus>,
    pub quantity: Option<i64>,
    pub unit: Option<String>,
    pub acquisition_date: Option<String>,
    pub acquisition_cost: Option<f64>,
    pub useful_life_years: Option<i64>,
    pub accumulated_depreciation: Option<f64>,
    pub funding_source: Option<String>,
    pub notes: Option<String>,
}

/// Bulk create payload: `count` assets sharing every field of the template
///
/// Item codes are `{code}-{sequence:03}`, e.g. `CH-001`, `CH-002`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetBulkCreate {
    #[serde(flatten)]
    pub template: AssetCreate,
    pub count: i64,
}

/// Update asset payload
///
/// Absent fields keep their stored value. For optional text fields an empty
/// string clears the value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetUpdate {
    pub code: Option<String>,
    pub name: Option<String>,
    pub specification: Option<String>,
    pub category_id: Option<i64>,
    pub location_id: Option<i64>,
    pub status: Option<AssetStatus>,
    pub quantity: Option<i64>,
    pub unit: Option<String>,
    pub acquisition_date: Option<String>,
    pub acquisition_cost: Option<f64>,
    pub useful_life_years: Option<i64>,
    pub accumulated_depreciation: Option<f64>,
    pub funding_source: Option<String>,
    pub notes: Option<String>,
}
