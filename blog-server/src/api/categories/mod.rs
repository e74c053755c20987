//! 分类 API
//!
//! | 路径 | 方法 | 权限 |
//! |------|------|------|
//! | /api/categories | GET | 公开 (仅启用项) |
//! | /api/dashboard/categories | GET | categories:read |
//! | /api/categories | POST | categories:create |
//! | /api/categories/{id} | PUT | categories:update |
//! | /api/categories/{id} | DELETE | categories:delete |
//! | /api/categories/reorder | POST | categories:update |
//! | /api/categories/reset-orders | POST | categories:update |

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use shared::models::Action;

use crate::auth::require_permission;
use crate::core::ServerState;

const RESOURCE: &str = "categories";

pub fn router() -> Router<ServerState> {
    let public_routes = Router::new().route("/api/categories", get(handler::list_public));

    let read_routes = Router::new()
        .route("/api/dashboard/categories", get(handler::list))
        .layer(middleware::from_fn(require_permission(RESOURCE, Action::Read)));

    let create_routes = Router::new()
        .route("/api/categories", post(handler::create))
        .layer(middleware::from_fn(require_permission(RESOURCE, Action::Create)));

    let update_routes = Router::new()
        .route("/api/categories/{id}", put(handler::update))
        .route("/api/categories/reorder", post(handler::reorder))
        .route("/api/categories/reset-orders", post(handler::reset_orders))
        .layer(middleware::from_fn(require_permission(RESOURCE, Action::Update)));

    let delete_routes = Router::new()
        .route("/api/categories/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_permission(RESOURCE, Action::Delete)));

    public_routes
        .merge(read_routes)
        .merge(create_routes)
        .merge(update_routes)
        .merge(delete_routes)
}
