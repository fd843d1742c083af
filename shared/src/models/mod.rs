//! Data models
//!
//! Shared between asset-server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64`; timestamps are Unix milliseconds.

pub mod asset;
pub mod audit_log;
pub mod category;
pub mod location;

// Re-exports
pub use asset::*;
pub use audit_log::*;
pub use category::*;
pub use location::*;
