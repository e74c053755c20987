//! Menu API
//!
//! Header menu (tree):
//!
//! | path | method | permission |
//! |------|------|------|
//! | /api/menus/header | GET | public (active only) |
//! | /api/dashboard/menus/header | GET | menus:read |
//! | /api/menus/header | POST | menus:create |
//! | /api/menus/header/{id} | PUT | menus:update |
//! | /api/menus/header/{id} | DELETE | menus:delete |
//! | /api/menus/header/reorder | POST | menus:update |
//! | /api/menus/header/reset-orders | POST | menus:update |
//!
//! Footer menu (flat, grouped by section):
//!
//! | path | method | permission |
//! |------|------|------|
//! | /api/menus/footer | GET | public (active only) |
//! | /api/dashboard/menus/footer | GET | menus:read |
//! | /api/menus/footer | PUT | menus:update (replaces every item) |

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use shared::models::Action;

use crate::auth::require_permission;
use crate::core::ServerState;

const RESOURCE: &str = "menus";

pub fn router() -> Router<ServerState> {
    let public_routes = Router::new()
        .route("/api/menus/header", get(handler::list_header_public))
        .route("/api/menus/footer", get(handler::list_footer_public));

    let read_routes = Router::new()
        .route("/api/dashboard/menus/header", get(handler::list_header))
        .route("/api/dashboard/menus/footer", get(handler::list_footer))
        .layer(middleware::from_fn(require_permission(RESOURCE, Action::Read)));

    let create_routes = Router::new()
        .route("/api/menus/header", post(handler::create_header))
        .layer(middleware::from_fn(require_permission(RESOURCE, Action::Create)));

    let update_routes = Router::new()
        .route("/api/menus/header/{id}", put(handler::update_header))
        .route("/api/menus/header/reorder", post(handler::reorder_header))
        .route("/api/menus/header/reset-orders", post(handler::reset_header_orders))
        .route("/api/menus/footer", put(handler::replace_footer))
        .layer(middleware::from_fn(require_permission(RESOURCE, Action::Update)));

    let delete_routes = Router::new()
        .route("/api/menus/header/{id}", delete(handler::delete_header))
        .layer(middleware::from_fn(require_permission(RESOURCE, Action::Delete)));

    public_routes
        .merge(read_routes)
        .merge(create_routes)
        .merge(update_routes)
        .merge(delete_routes)
}
