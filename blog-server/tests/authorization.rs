//! Authentication and permission gating through the full router

mod common;

use common::TestApp;
use http::{Method, StatusCode};
use serde_json::json;
use shared::models::Role;

/// Every gated endpoint, with a syntactically valid body where one is needed
fn gated_endpoints() -> Vec<(Method, &'static str)> {
    vec![
        (Method::GET, "/api/auth/me"),
        (Method::GET, "/api/auth/route-access?route=/dashboard"),
        (Method::GET, "/api/dashboard/categories"),
        (Method::POST, "/api/categories"),
        (Method::PUT, "/api/categories/1"),
        (Method::DELETE, "/api/categories/1"),
        (Method::POST, "/api/categories/reorder"),
        (Method::POST, "/api/categories/reset-orders"),
        (Method::GET, "/api/dashboard/menus/header"),
        (Method::GET, "/api/dashboard/menus/footer"),
        (Method::POST, "/api/menus/header"),
        (Method::PUT, "/api/menus/header/1"),
        (Method::DELETE, "/api/menus/header/1"),
        (Method::POST, "/api/menus/header/reorder"),
        (Method::POST, "/api/menus/header/reset-orders"),
        (Method::PUT, "/api/menus/footer"),
        (Method::GET, "/api/users"),
        (Method::POST, "/api/users"),
        (Method::PUT, "/api/users/1"),
        (Method::DELETE, "/api/users/1"),
    ]
}

#[tokio::test]
async fn test_missing_token_is_401_everywhere() {
    let app = TestApp::new().await;
    for (method, uri) in gated_endpoints() {
        let res = app.request(method.clone(), uri, None, Some(json!({}))).await;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(res.body["code"], 1001, "{method} {uri}");
    }
}

#[tokio::test]
async fn test_forged_token_is_401() {
    let app = TestApp::new().await;
    let res = app.get("/api/users", Some("not-a-jwt")).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["code"], 1004);

    let res = app
        .request(Method::GET, "/api/users", None, None)
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_editor_on_users_is_403_with_role() {
    let app = TestApp::new().await;
    let token = app.token(Role::Editor).await;

    let res = app.get("/api/users", Some(&token)).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.body["code"], 2001);
    assert_eq!(res.body["details"]["userRole"], "EDITOR");
    assert_eq!(res.body["details"]["required"], "users:read");
}

#[tokio::test]
async fn test_author_cannot_touch_categories() {
    let app = TestApp::new().await;
    let token = app.token(Role::Author).await;

    let res = app.get("/api/dashboard/categories", Some(&token)).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.body["details"]["userRole"], "AUTHOR");

    let res = app
        .post("/api/categories", &token, json!({ "name": "News" }))
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.body["details"]["required"], "categories:create");
}

#[tokio::test]
async fn test_permission_checked_before_body() {
    let app = TestApp::new().await;
    let author = app.token(Role::Author).await;
    let editor = app.token(Role::Editor).await;
    let garbage = json!({ "reorderData": "nope" });

    let res = app.post("/api/categories/reorder", &author, garbage.clone()).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app.post("/api/categories/reorder", &editor, garbage).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_role_in_token_is_allowed_nothing() {
    let app = TestApp::new().await;
    let token = app
        .state
        .get_jwt_service()
        .generate_token(42, "ghost", "SUPERUSER")
        .unwrap();

    let res = app.get("/api/dashboard/categories", Some(&token)).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.body["details"]["userRole"], "SUPERUSER");
}

#[tokio::test]
async fn test_public_routes_need_no_token() {
    let app = TestApp::new().await;
    for uri in [
        "/health",
        "/api/categories",
        "/api/categories?format=flat",
        "/api/menus/header",
        "/api/menus/footer",
    ] {
        let res = app.get(uri, None).await;
        assert_eq!(res.status, StatusCode::OK, "{uri}");
    }

    let res = app.get("/health", None).await;
    assert_eq!(res.body["status"], "healthy");
    assert_eq!(res.body["database"]["status"], "ok");
}

#[tokio::test]
async fn test_route_access_endpoint() {
    let app = TestApp::new().await;
    let editor = app.token(Role::Editor).await;
    let admin = app.token(Role::Admin).await;

    let res = app
        .get("/api/auth/route-access?route=/dashboard/settings", Some(&editor))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["allowed"], false);
    assert_eq!(res.data()["route"], "/dashboard/settings");

    let res = app
        .get("/api/auth/route-access?route=/dashboard/settings", Some(&admin))
        .await;
    assert_eq!(res.data()["allowed"], true);

    let res = app
        .get("/api/auth/route-access?route=/some/unmapped/route", Some(&editor))
        .await;
    assert_eq!(res.data()["allowed"], true);

    let res = app.get("/api/auth/route-access", Some(&editor)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_me_lists_permissions_and_navigation() {
    let app = TestApp::new().await;
    let author = app.user("alice", Role::Author).await;
    let token = app.token_for(&author);

    let res = app.get("/api/auth/me", Some(&token)).await;
    assert_eq!(res.status, StatusCode::OK);
    let data = res.data();
    assert_eq!(data["user"]["username"], "alice");
    assert_eq!(data["roleDescription"], "Can create and manage own posts");

    let resources: Vec<&str> = data["permissions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["resource"].as_str().unwrap())
        .collect();
    assert_eq!(resources, vec!["posts", "profile"]);

    let nav: Vec<&str> = data["navigation"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["href"].as_str().unwrap())
        .collect();
    assert_eq!(nav, vec!["/dashboard", "/dashboard/posts", "/dashboard/profile"]);
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = TestApp::new().await;
    use tower::ServiceExt;
    let response = app
        .app
        .clone()
        .oneshot(
            http::Request::builder()
                .uri("/health")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}
