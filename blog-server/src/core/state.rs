use std::sync::Arc;

use shared::models::Role;
use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::{AdminBootstrap, Config};
use crate::db::DbService;
use crate::db::repository::user::{self, NewUser};
use crate::utils::password::hash_password;
use crate::utils::{AppError, AppResult};

/// 服务器状态 - 所有请求处理器共享
///
/// 克隆成本很低: 连接池和 JWT 服务都是引用计数。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 已加载的配置 |
/// | pool | 进程级 SQLite 连接池 |
/// | jwt_service | 令牌签发与验证 |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// 由各组件创建服务器状态
    ///
    /// 通常应使用 [`initialize()`](Self::initialize)。
    pub fn new(config: Config, pool: SqlitePool, jwt_service: Arc<JwtService>) -> Self {
        Self {
            config,
            pool,
            jwt_service,
        }
    }

    /// 初始化服务器状态
    ///
    /// 1. 数据库 (连接池 + 迁移)
    /// 2. JWT 服务
    /// 3. 已配置且尚无用户时，创建初始管理员
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let db = DbService::new(&config.database_url, config.db_max_connections).await?;
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let state = Self::new(config.clone(), db.pool, jwt_service);

        if let Some(admin) = &config.admin {
            state.bootstrap_admin(admin).await?;
        }

        Ok(state)
    }

    /// 用户表为空时创建第一个管理员
    ///
    /// 返回是否创建了账号。
    pub async fn bootstrap_admin(&self, admin: &AdminBootstrap) -> AppResult<bool> {
        if user::count(&self.pool).await? > 0 {
            tracing::debug!("Users exist, skipping admin bootstrap");
            return Ok(false);
        }
        if admin.password.is_empty() {
            return Err(AppError::validation("ADMIN_PASSWORD must not be empty"));
        }

        let password_hash = hash_password(&admin.password).await?;
        let created = user::create(
            &self.pool,
            NewUser {
                username: &admin.username,
                email: &admin.email,
                password_hash: &password_hash,
                role: Role::Admin,
            },
        )
        .await?;

        tracing::info!(user_id = created.id, username = %created.username, "Bootstrap admin created");
        Ok(true)
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// 获取数据库连接池
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
