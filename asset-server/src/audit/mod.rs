//! 审计日志模块
//!
//! ```text
//! entity service (after commit)
//!   └─ AuditService::record_after_commit() → AuditLogStore::append() → audit_log 表
//! ```
//!
//! Records are append-only: the store exposes no update or delete, and the
//! schema triggers reject both.

pub mod diff;
pub mod service;

pub use diff::{FieldChange, create_changes, delete_changes, update_changes};
pub use service::{AuditEntry, AuditService, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
