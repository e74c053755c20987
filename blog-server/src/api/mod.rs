//! API 路由
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 登录、当前用户、路由访问
//! - [`categories`] - 分类树
//! - [`menus`] - 顶部菜单 (树) 和底部菜单 (平铺)
//! - [`users`] - 用户管理
//!
//! 认证对整个应用只执行一次 ([`require_auth`])；
//! 每个受保护路由带有自己的 `resource:action` 权限层。

pub mod auth;
pub mod categories;
pub mod extract;
pub mod health;
pub mod menus;
pub mod users;

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::require_auth;
use crate::core::ServerState;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// 请求 ID 生成器 (UUID v4)
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// All routes, without middleware or state
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(categories::router())
        .merge(menus::router())
        .merge(users::router())
}

/// Fully configured application, used by the HTTP server and by tests
///
/// A request passes request id, CORS, tracing and authentication, in that order.
pub fn build_app(state: ServerState) -> Router {
    build_router()
        // JWT 认证 - 在所有权限层之前注入 CurrentUser
        .layer(axum_middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(TraceLayer::new_for_http())
        // CORS - 管理后台和公开站点来自其他源
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        .with_state(state)
}
