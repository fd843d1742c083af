//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            Self::NotFound
            | Self::AssetNotFound
            | Self::CategoryNotFound
            | Self::LocationNotFound => StatusCode::NOT_FOUND,

            Self::AlreadyExists => StatusCode::CONFLICT,

            Self::TimeoutError => StatusCode::REQUEST_TIMEOUT,

            Self::Unknown | Self::InternalError | Self::DatabaseError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // Validation and business-rule refusals
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
