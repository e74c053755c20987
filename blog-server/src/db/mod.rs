//! 数据库模块
//!
//! 持有进程级 SQLite 连接池并执行迁移。仓储是接收 `&SqlitePool` 的
//! 自由函数，连接池通过
//! [`ServerState`](crate::core::ServerState) 传入。

pub mod repository;

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};

use crate::utils::AppError;

/// 数据库服务 - 持有 SQLite 连接池
#[derive(Clone, Debug)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Open (or create) the database at `database_url` and apply migrations
    ///
    /// File databases use WAL with normal sync. `sqlite::memory:` gets a single
    /// connection that is never recycled, since each connection would see its
    /// own empty database.
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");

        let mut options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::database(format!("Invalid database URL: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));
        if !in_memory {
            options = options
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .optimize_on_close(true, None);
        }

        let mut pool_options = SqlitePoolOptions::new();
        if in_memory {
            pool_options = pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        } else {
            pool_options = pool_options.max_connections(max_connections.max(1));
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        tracing::info!(in_memory, "Database connection established (SQLite)");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;
        tracing::info!("Database migrations applied");

        Ok(Self { pool })
    }

    /// Fresh in-memory database with migrations applied
    pub async fn in_memory() -> Result<Self, AppError> {
        Self::new("sqlite::memory:", 1).await
    }
}
