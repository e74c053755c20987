//! Blog Server - 博客/CMS 管理后台服务
//!
//! # 架构概述
//!
//! - **授权** (`auth`): JWT 登录、静态的 角色 → 资源 → 操作 权限表、
//!   路由访问判定和权限中间件
//! - **排序** (`db::repository`): 分类和顶部菜单树，创建时追加到末尾，
//!   事务内重排，按兄弟分组重置顺序
//! - **HTTP API** (`api`): 公开读取接口和需要权限的管理接口
//!
//! # 模块结构
//!
//! ```text
//! blog-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT、权限表、中间件
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # SQLite 连接池、迁移、仓储
//! └── utils/         # 日志、校验、密码哈希
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod utils;

// 重新导出常用类型
pub use auth::{CurrentUser, JwtService, PermissionChecker};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// 重新导出 shared 中的统一错误类型
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// 重新导出日志函数
pub use utils::logger::init_logger_with_file;

// 安全日志宏 - 事件写入 "security" target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
