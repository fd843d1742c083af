//! Shared types for the asset inventory workspace
//!
//! Domain models, the unified error system and small utilities used by
//! `asset-server` and its tests.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use serde::{Deserialize, Serialize};
