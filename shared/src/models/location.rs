//! Location Model

use serde::{Deserialize, Serialize};

/// Location entity (building / floor / room)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Location {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub building: Option<String>,
    pub floor: Option<String>,
    pub room: Option<String>,
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create location payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationCreate {
    pub code: String,
    pub name: String,
    pub building: Option<String>,
    pub floor: Option<String>,
    pub room: Option<String>,
    pub description: Option<String>,
}

/// Update location payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationUpdate {
    pub code: Option<String>,
    pub name: Option<String>,
    pub building: Option<String>,
    pub floor: Option<String>,
    pub room: Option<String>,
    pub description: Option<String>,
}
