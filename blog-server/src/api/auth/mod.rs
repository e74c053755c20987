//! 认证路由
//!
//! - `POST /api/auth/login`: 公开
//! - `GET /api/auth/me`, `GET /api/auth/route-access`: 任意已登录用户

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/auth/login", post(handler::login))
        .route("/api/auth/me", get(handler::me))
        .route("/api/auth/route-access", get(handler::route_access))
}
