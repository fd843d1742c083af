//! Unified error codes
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Asset errors
//! - 2xxx: Category errors
//! - 3xxx: Location errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 1xxx: Asset ====================
    AssetNotFound = 1001,
    /// Referenced category or location does not exist
    AssetReferenceInvalid = 1002,

    // ==================== 2xxx: Category ====================
    CategoryNotFound = 2001,
    /// Category still referenced by assets
    CategoryInUse = 2002,

    // ==================== 3xxx: Location ====================
    LocationNotFound = 3001,
    /// Location still referenced by assets
    LocationInUse = 3002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
    /// Request timed out
    TimeoutError = 9004,
}

impl ErrorCode {
    /// Every defined code, in numeric order
    pub const ALL: [ErrorCode; 16] = [
        ErrorCode::Success,
        ErrorCode::Unknown,
        ErrorCode::ValidationFailed,
        ErrorCode::NotFound,
        ErrorCode::AlreadyExists,
        ErrorCode::InvalidRequest,
        ErrorCode::AssetNotFound,
        ErrorCode::AssetReferenceInvalid,
        ErrorCode::CategoryNotFound,
        ErrorCode::CategoryInUse,
        ErrorCode::LocationNotFound,
        ErrorCode::LocationInUse,
        ErrorCode::InternalError,
        ErrorCode::DatabaseError,
        ErrorCode::ConfigError,
        ErrorCode::TimeoutError,
    ];

    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Default message, used when an error carries no message of its own
    pub const fn message(&self) -> &'static str {
        use ErrorCode::*;
        match self {
            Success => "Operation completed successfully",
            Unknown => "An unknown error occurred",
            ValidationFailed => "Validation failed",
            NotFound => "Resource not found",
            AlreadyExists => "Resource already exists",
            InvalidRequest => "Invalid request",
            AssetNotFound => "Asset not found",
            AssetReferenceInvalid => "Asset references a missing category or location",
            CategoryNotFound => "Category not found",
            CategoryInUse => "Category is still referenced by assets",
            LocationNotFound => "Location not found",
            LocationInUse => "Location is still referenced by assets",
            InternalError => "Internal server error",
            DatabaseError => "Database error",
            ConfigError => "Configuration error",
            TimeoutError => "Request timed out",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// A wire value that names no [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|c| c.code() == value)
            .ok_or(InvalidErrorCode(value))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
