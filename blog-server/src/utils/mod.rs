//! 工具模块 - 日志、输入校验、密码哈希
//!
//! 错误类型从 `shared::error` 重新导出，处理器只需从
//! `crate::utils` 导入。

pub mod logger;
pub mod password;
pub mod validation;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
