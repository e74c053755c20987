//! User management API
//!
//! | path | method | permission |
//! |------|------|------|
//! | /api/users | GET | users:read |
//! | /api/users | POST | users:create |
//! | /api/users/{id} | PUT | users:update |
//! | /api/users/{id} | DELETE | users:delete |

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use shared::models::Action;

use crate::auth::require_permission;
use crate::core::ServerState;

const RESOURCE: &str = "users";

pub fn router() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/api/users", get(handler::list))
        .layer(middleware::from_fn(require_permission(RESOURCE, Action::Read)));

    let create_routes = Router::new()
        .route("/api/users", post(handler::create))
        .layer(middleware::from_fn(require_permission(RESOURCE, Action::Create)));

    let update_routes = Router::new()
        .route("/api/users/{id}", put(handler::update))
        .layer(middleware::from_fn(require_permission(RESOURCE, Action::Update)));

    let delete_routes = Router::new()
        .route("/api/users/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_permission(RESOURCE, Action::Delete)));

    read_routes
        .merge(create_routes)
        .merge(update_routes)
        .merge(delete_routes)
}
