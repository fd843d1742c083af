//! Asset Server - 资产、分类与位置管理服务
//!
//! # 架构概述
//!
//! - **数据库** (`db`): SQLite 连接池、迁移和仓储
//! - **审计** (`audit`): 变更差异计算与只追加的审计日志
//! - **业务服务** (`services`): 资产、分类、位置的业务规则
//! - **HTTP API** (`api`): RESTful 接口与中间件
//!
//! # 模块结构
//!
//! ```text
//! asset-server/src/
//! ├── core/          # 配置、状态、错误、服务器生命周期
//! ├── db/            # 连接池与仓储
//! ├── audit/         # diff + AuditService
//! ├── services/      # 实体业务服务
//! ├── api/           # HTTP 路由和处理器
//! ├── server/        # 中间件
//! └── utils/         # 日志
//! ```
//!
//! Every successful create, update or delete records one audit entry after
//! the mutation commits. A failed audit write is logged and never fails the
//! request.

pub mod api;
pub mod audit;
pub mod core;
pub mod db;
pub mod server;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Environment, Server, ServerError, ServerState};
pub use utils::logger::{init_logger, init_logger_with_file};
