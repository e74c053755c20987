//! 认证处理器

use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use shared::models::{LoginRequest, LoginResponse, User};

use crate::api::extract::ValidJson;
use crate::auth::{CurrentUser, NavItem, Permission};
use crate::core::ServerState;
use crate::db::repository::user;
use crate::security_log;
use crate::utils::password::verify_login;
use crate::utils::{ApiResponse, AppError, AppResult};

/// POST /api/auth/login
///
/// 用户不存在和密码错误返回相同的 401。
pub async fn login(
    State(state): State<ServerState>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    let username = req.username.trim();
    if username.is_empty() {
        return Err(AppError::required_field("username"));
    }
    if req.password.is_empty() {
        return Err(AppError::required_field("password"));
    }

    let credentials = user::find_credentials(&state.pool, username).await?;
    let stored_hash = credentials.as_ref().map(|c| c.password_hash.as_str());
    let verified = verify_login(&req.password, stored_hash).await?;
    let Some(credentials) = credentials.filter(|_| verified) else {
        security_log!("WARN", "login_failed", username = username.to_string());
        return Err(AppError::invalid_credentials());
    };

    let token = state
        .get_jwt_service()
        .generate_token(credentials.id, &credentials.username, &credentials.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    let user = User::from(credentials);
    tracing::info!(user_id = user.id, username = %user.username, role = %user.role, "User logged in");

    Ok(ApiResponse::success(LoginResponse {
        token,
        expires_in: state.get_jwt_service().expires_in_seconds(),
        user,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user: User,
    pub role_description: &'static str,
    pub permissions: &'static [Permission],
    pub navigation: Vec<&'static NavItem>,
}

/// GET /api/auth/me
///
/// 权限取自令牌中的角色。
pub async fn me(State(state): State<ServerState>, current: CurrentUser) -> AppResult<ApiResponse<MeResponse>> {
    let user = user::find_by_id(&state.pool, current.id)
        .await?
        .ok_or_else(|| AppError::invalid_token("User no longer exists"))?;
    let checker = current.permissions();

    Ok(ApiResponse::success(MeResponse {
        user,
        role_description: checker.role_description(),
        permissions: checker.user_permissions(),
        navigation: checker.visible_navigation(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct RouteAccessQuery {
    pub route: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RouteAccessResponse {
    pub route: String,
    pub allowed: bool,
}

/// GET /api/auth/route-access?route=/dashboard/users
pub async fn route_access(
    current: CurrentUser,
    Query(query): Query<RouteAccessQuery>,
) -> AppResult<ApiResponse<RouteAccessResponse>> {
    let route = query
        .route
        .filter(|r| !r.trim().is_empty())
        .ok_or_else(|| AppError::required_field("route"))?;
    let allowed = current.permissions().can_access_route(&route);

    Ok(ApiResponse::success(RouteAccessResponse { route, allowed }))
}
