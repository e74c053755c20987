//! JWT 令牌服务
//!
//! 签发和验证 HS256 访问令牌，令牌携带用户 ID、用户名和角色。
//! 权限不写入令牌，每次请求通过
//! [`PermissionChecker`](super::PermissionChecker) 从角色推导。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::PermissionChecker;

/// `JWT_SECRET` 的最小长度
pub const MIN_SECRET_LEN: usize = 32;

/// JWT 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// 签名密钥 (至少 32 字节)
    pub secret: String,
    /// 令牌过期时间 (分钟)
    pub expiration_minutes: i64,
    /// 令牌签发者
    pub issuer: String,
    /// 令牌受众
    pub audience: String,
}

impl JwtConfig {
    /// Load from `JWT_SECRET`, `JWT_EXPIRATION_MINUTES`, `JWT_ISSUER`, `JWT_AUDIENCE`.
    ///
    /// Debug builds without `JWT_SECRET` get a random printable secret, so
    /// tokens do not survive a restart. Release builds refuse to start.
    pub fn from_env() -> Result<Self, JwtError> {
        Ok(Self {
            secret: load_jwt_secret()?,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440), // 24 hours
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "blog-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "blog-dashboard".to_string()),
        })
    }

    /// Fixed configuration with a caller-provided secret (tests, tooling)
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expiration_minutes: 1440,
            issuer: "blog-server".to_string(),
            audience: "blog-dashboard".to_string(),
        }
    }
}

/// 存储在令牌中的 JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户 ID (Subject)
    pub sub: String,
    pub username: String,
    /// Role name as stored on the user (`AUTHOR`, `EDITOR`, `ADMIN`)
    pub role: String,
    /// 过期时间戳
    pub exp: i64,
    /// 签发时间戳
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),

    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// 生成可打印的随机密钥 (仅用于开发环境)
pub fn generate_secure_printable_jwt_secret() -> Result<String, JwtError> {
    const ALLOWED: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+[]{}|;:,.<>?";

    let rng = SystemRandom::new();
    let mut bytes = [0u8; 64];
    rng.fill(&mut bytes).map_err(|_| {
        JwtError::KeyGenerationFailed("Failed to generate secure random key".to_string())
    })?;

    Ok(bytes
        .iter()
        .map(|b| ALLOWED[*b as usize % ALLOWED.len()] as char)
        .collect())
}

/// 从环境变量加载 JWT 密钥
fn load_jwt_secret() -> Result<String, JwtError> {
    match std::env::var("JWT_SECRET") {
        Ok(secret) => {
            if secret.len() < MIN_SECRET_LEN {
                return Err(JwtError::ConfigError(format!(
                    "JWT_SECRET must be at least {MIN_SECRET_LEN} characters long"
                )));
            }
            Ok(secret)
        }
        Err(_) => {
            #[cfg(debug_assertions)]
            {
                tracing::warn!("JWT_SECRET not set! Generating temporary key for development.");
                generate_secure_printable_jwt_secret()
            }
            #[cfg(not(debug_assertions))]
            {
                Err(JwtError::ConfigError(
                    "JWT_SECRET environment variable must be set in production!".to_string(),
                ))
            }
        }
    }
}

/// JWT 令牌服务
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .field("expiration_minutes", &self.config.expiration_minutes)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    /// 使用指定配置创建 JWT 服务
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 为用户生成访问令牌
    pub fn generate_token(&self, user_id: i64, username: &str, role: &str) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            role: role.to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 验证并解码令牌
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// 从 `Authorization: Bearer <token>` 头提取令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// 令牌有效期 (秒)
    pub fn expires_in_seconds(&self) -> i64 {
        self.config.expiration_minutes * 60
    }
}

/// 当前用户上下文，从 JWT Claims 解析
///
/// 由认证中间件注入请求扩展。
///
/// # 示例
///
/// ```ignore
/// async fn handler(user: CurrentUser) -> Json<()> {
///     if user.permissions().can("categories", Action::Update) {
///         // ...
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    /// Raw role string from the token; may not name a known role
    pub role: String,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = JwtError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse()
            .map_err(|_| JwtError::InvalidToken(format!("Invalid subject '{}'", claims.sub)))?;
        Ok(Self {
            id,
            username: claims.username,
            role: claims.role,
        })
    }
}

impl CurrentUser {
    /// Permission checker for this user's role
    pub fn permissions(&self) -> PermissionChecker {
        PermissionChecker::from_role_str(&self.role)
    }
}
