//! Unified error system for the asset inventory server
//!
//! - [`ErrorCode`]: Standardized numeric error codes
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Unified API response format
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Asset errors
//! - 2xxx: Category errors
//! - 3xxx: Location errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::new(ErrorCode::AssetNotFound);
//! assert_eq!(err.http_status(), http::StatusCode::NOT_FOUND);
//!
//! let err = AppError::validation("quantity must be at least 1")
//!     .with_detail("field", "quantity");
//!
//! let response: ApiResponse<()> = err.into();
//! assert_eq!(response.code, 2);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
