//! 工具模块
//!
//! - [`logger`] - tracing 初始化
//! - Re-exports of the shared error types used by handlers

pub mod logger;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
