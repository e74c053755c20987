//! 仓储模块
//!
//! SQLite 表的增删改查和排序操作。每个子模块提供接收 `&SqlitePool` 的
//! 自由函数；所有多行写入都在单个事务中执行。

pub mod category;
pub mod footer;
pub mod menu;
pub mod tree;
pub mod user;

use shared::error::{AppError, ErrorCode};
use sqlx::{Sqlite, SqlitePool, Transaction};
use thiserror::Error;

/// 仓储错误类型
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Business rule violation with a specific error code
    #[error("{1}")]
    Business(ErrorCode, String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err
            && db_err.is_unique_violation()
        {
            return RepoError::Duplicate(db_err.message().to_string());
        }
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Business(code, msg) => AppError::with_message(code, msg),
            RepoError::Database(msg) => {
                tracing::error!(error = %msg, "Repository database error");
                AppError::database("Database operation failed")
            }
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Start a write transaction holding the SQLite write lock from its first statement
///
/// A deferred transaction that reads before it writes gets `SQLITE_BUSY_SNAPSHOT`
/// once another writer commits in between, and `busy_timeout` does not retry that.
/// `BEGIN IMMEDIATE` queues on the lock instead.
pub async fn begin_write(pool: &SqlitePool) -> RepoResult<Transaction<'static, Sqlite>> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}
