use crate::auth::{JwtConfig, JwtError};

/// Bootstrap administrator, created when the users table is empty
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub username: String,
    pub password: String,
    pub email: String,
}

/// 服务器配置
///
/// # 环境变量
///
/// | 变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | DATABASE_URL | sqlite://blog.db?mode=rwc | SQLite 数据库 |
/// | DB_MAX_CONNECTIONS | 5 | 连接池大小 |
/// | HTTP_PORT | 3000 | HTTP 端口 |
/// | ENVIRONMENT | development | development / staging / production |
/// | JWT_SECRET | debug 构建随机生成 | 至少 32 个字符 |
/// | JWT_EXPIRATION_MINUTES | 1440 | 令牌有效期 |
/// | ADMIN_USERNAME / ADMIN_PASSWORD / ADMIN_EMAIL | 未设置 | 初始管理员账号 |
/// | LOG_LEVEL | info | RUST_LOG 优先 |
/// | LOG_DIR | 未设置 | 按天滚动的日志文件 |
///
/// # 示例
///
/// ```ignore
/// DATABASE_URL=sqlite:///var/lib/blog/blog.db HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub http_port: u16,
    pub jwt: JwtConfig,
    /// development | staging | production
    pub environment: String,
    pub admin: Option<AdminBootstrap>,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 未设置的变量使用默认值。仅当 release 构建缺少 JWT 密钥
    /// 或密钥短于 32 个字符时失败。
    pub fn from_env() -> Result<Self, JwtError> {
        let admin = match (
            std::env::var("ADMIN_USERNAME"),
            std::env::var("ADMIN_PASSWORD"),
        ) {
            (Ok(username), Ok(password)) if !username.trim().is_empty() => {
                let email = std::env::var("ADMIN_EMAIL")
                    .unwrap_or_else(|_| format!("{}@localhost.localdomain", username.trim()));
                Some(AdminBootstrap {
                    username: username.trim().to_string(),
                    password,
                    email,
                })
            }
            _ => None,
        };

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://blog.db?mode=rwc".into()),
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::from_env()?,
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            admin,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
        })
    }

    /// In-memory database and a fixed JWT secret, for tests
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".into(),
            db_max_connections: 1,
            http_port: 0,
            jwt: JwtConfig::with_secret("test-only-secret-with-at-least-32-chars"),
            environment: "test".into(),
            admin: None,
            log_level: "debug".into(),
            log_dir: None,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
