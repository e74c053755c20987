//! 认证中间件
//!
//! 为 JWT 认证和权限检查提供 Axum 中间件

use std::future::Future;
use std::pin::Pin;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::Method;
use shared::models::Action;

use crate::AppError;
use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;

/// 无需令牌的请求: `(method, path)`
const PUBLIC_API_ROUTES: &[(Method, &str)] = &[
    (Method::POST, "/api/auth/login"),
    (Method::GET, "/api/categories"),
    (Method::GET, "/api/menus/header"),
    (Method::GET, "/api/menus/footer"),
];

fn is_public_api_route(method: &Method, path: &str) -> bool {
    let path = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };
    PUBLIC_API_ROUTES
        .iter()
        .any(|(m, p)| m == method && *p == path)
}

/// 认证中间件 - 要求用户登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT。
/// 验证成功后将 [`CurrentUser`] 注入请求扩展。
///
/// # 跳过的请求
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径 (`/health`，未知路径交给 404)
/// - [`PUBLIC_API_ROUTES`]
///
/// # 错误
///
/// | 情况 | HTTP |
/// |------|------------|
/// | 缺少 Authorization 头 | 401 NotAuthenticated |
/// | 令牌已过期 | 401 TokenExpired |
/// | 令牌格式错误或伪造 | 401 TokenInvalid |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    if is_public_api_route(req.method(), path) {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    let user = state
        .get_jwt_service()
        .validate_token(token)
        .and_then(CurrentUser::try_from);

    match user {
        Ok(user) => {
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );

            match e {
                JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

type MiddlewareFuture = Pin<Box<dyn Future<Output = Result<Response, AppError>> + Send>>;

/// 权限中间件 - 要求当前角色拥有 `resource:action`
///
/// 必须在 [`require_auth`] 之后运行。拒绝时返回 403，
/// `details.userRole` 回显调用者角色，
/// `details.required` 给出缺少的权限。
///
/// # 用法
///
/// ```ignore
/// use axum::middleware;
/// Router::new()
///     .route("/api/users", get(handler::list)
///         .layer(middleware::from_fn(require_permission("users", Action::Read))));
/// ```
pub fn require_permission(
    resource: &'static str,
    action: Action,
) -> impl Fn(Request, Next) -> MiddlewareFuture + Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or_else(AppError::unauthorized)?;

            if !user.permissions().can(resource, action) {
                security_log!(
                    "WARN",
                    "permission_denied",
                    user_id = user.id,
                    username = user.username.clone(),
                    user_role = user.role.clone(),
                    required_permission = format!("{resource}:{action}")
                );
                return Err(AppError::forbidden("Insufficient permissions")
                    .with_detail("userRole", user.role.clone())
                    .with_detail("required", format!("{resource}:{action}")));
            }

            Ok(next.run(req).await)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_routes_match_method_and_path() {
        assert!(is_public_api_route(&Method::GET, "/api/categories"));
        assert!(is_public_api_route(&Method::GET, "/api/categories/"));
        assert!(!is_public_api_route(&Method::POST, "/api/categories"));
        assert!(!is_public_api_route(&Method::GET, "/api/categories/reorder"));
        assert!(is_public_api_route(&Method::POST, "/api/auth/login"));
        assert!(!is_public_api_route(&Method::GET, "/api/auth/me"));
        assert!(!is_public_api_route(&Method::PUT, "/api/menus/footer"));
    }
}
