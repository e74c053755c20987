//! CurrentUser 提取器
//!
//! 处理器可以直接接收 `user: CurrentUser` 参数。优先复用
//! [`require_auth`](super::require_auth) 注入的用户，否则自行验证
//! Bearer 令牌。

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::AppError;
use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = match auth_header {
            Some(header) => JwtService::extract_from_header(header)
                .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
            None => {
                security_log!("WARN", "auth_missing", uri = format!("{:?}", parts.uri));
                return Err(AppError::unauthorized());
            }
        };

        let claims = state.get_jwt_service().validate_token(token).map_err(|e| {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", parts.uri)
            );
            match e {
                JwtError::ExpiredToken => AppError::token_expired(),
                _ => AppError::invalid_token("Invalid token"),
            }
        })?;

        let user = CurrentUser::try_from(claims)
            .map_err(|e| AppError::invalid_token(format!("Malformed JWT claims: {}", e)))?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}
