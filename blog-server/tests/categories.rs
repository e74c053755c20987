//! Category tree through the HTTP API

mod common;

use common::{TestApp, ids};
use http::StatusCode;
use serde_json::{Value, json};
use shared::models::Role;

async fn create(app: &TestApp, token: &str, body: Value) -> i64 {
    let res = app.post("/api/categories", token, body).await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    res.data()["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_hierarchy_nests_children_and_orders_siblings() {
    let app = TestApp::new().await;
    let token = app.token(Role::Editor).await;
    let a = create(&app, &token, json!({ "name": "A" })).await;
    let b = create(&app, &token, json!({ "name": "B" })).await;
    let c = create(&app, &token, json!({ "name": "C", "parentId": a })).await;

    let res = app.get("/api/categories", None).await;
    assert_eq!(res.status, StatusCode::OK);
    let roots = res.data();
    assert_eq!(ids(roots), vec![a, b]);
    assert_eq!(ids(&roots[0]["children"]), vec![c]);
    assert_eq!(roots[0]["level"], 0);
    assert_eq!(roots[0]["children"][0]["level"], 1);
    assert_eq!(roots[0]["children"][0]["order"], 0);
    assert_eq!(roots[1]["order"], 1);
    assert_eq!(roots[1]["children"], json!([]));

    let res = app.get("/api/categories?format=flat", None).await;
    assert_eq!(ids(res.data()), vec![a, c, b]);

    let res = app.get("/api/categories?format=tree", None).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reorder_swaps_siblings() {
    let app = TestApp::new().await;
    let token = app.token(Role::Editor).await;
    let a = create(&app, &token, json!({ "name": "A" })).await;
    let b = create(&app, &token, json!({ "name": "B" })).await;

    let res = app
        .post(
            "/api/categories/reorder",
            &token,
            json!({ "reorderData": [{ "categoryId": a, "newOrder": 1 }, { "categoryId": b, "newOrder": 0 }] }),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["updated"], 2);

    let res = app.get("/api/dashboard/categories?format=flat", Some(&token)).await;
    assert_eq!(ids(res.data()), vec![b, a]);
}

#[tokio::test]
async fn test_reorder_with_unknown_id_changes_nothing() {
    let app = TestApp::new().await;
    let token = app.token(Role::Editor).await;
    let a = create(&app, &token, json!({ "name": "A" })).await;
    let b = create(&app, &token, json!({ "name": "B" })).await;

    let res = app
        .post(
            "/api/categories/reorder",
            &token,
            json!({ "reorderData": [
                { "categoryId": a, "newOrder": 1 },
                { "categoryId": b, "newOrder": 0 },
                { "categoryId": 9999, "newOrder": 2 }
            ] }),
        )
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app.get("/api/dashboard/categories?format=flat", Some(&token)).await;
    let orders: Vec<(i64, i64)> = res
        .data()
        .as_array()
        .unwrap()
        .iter()
        .map(|c| (c["id"].as_i64().unwrap(), c["order"].as_i64().unwrap()))
        .collect();
    assert_eq!(orders, vec![(a, 0), (b, 1)]);
}

#[tokio::test]
async fn test_reorder_validation() {
    let app = TestApp::new().await;
    let token = app.token(Role::Editor).await;
    let a = create(&app, &token, json!({ "name": "A" })).await;

    let res = app
        .post("/api/categories/reorder", &token, json!({ "reorderData": [{ "newOrder": 0 }] }))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["details"]["field"], "categoryId");

    let res = app
        .post("/api/categories/reorder", &token, json!({ "reorderData": [{ "categoryId": a }] }))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["details"]["field"], "newOrder");

    let res = app
        .post("/api/categories/reorder", &token, json!({ "reorderData": [] }))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reset_orders_compacts_groups() {
    let app = TestApp::new().await;
    let token = app.token(Role::Editor).await;
    let a = create(&app, &token, json!({ "name": "A" })).await;
    let b = create(&app, &token, json!({ "name": "B" })).await;
    let c = create(&app, &token, json!({ "name": "C" })).await;

    app.post(
        "/api/categories/reorder",
        &token,
        json!({ "reorderData": [{ "categoryId": a, "newOrder": 5 }, { "categoryId": c, "newOrder": 5 }] }),
    )
    .await;

    let res = app.post("/api/categories/reset-orders", &token, json!({})).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["updated"], 3);

    let res = app.get("/api/dashboard/categories", Some(&token)).await;
    let orders: Vec<i64> = res
        .data()
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["order"].as_i64().unwrap())
        .collect();
    assert_eq!(ids(res.data()), vec![a, b, c]);
    assert_eq!(orders, vec![0, 1, 2]);
}

#[tokio::test]
async fn test_delete_with_children_is_409() {
    let app = TestApp::new().await;
    let token = app.token(Role::Editor).await;
    let a = create(&app, &token, json!({ "name": "A" })).await;
    let c = create(&app, &token, json!({ "name": "C", "parentId": a })).await;

    let res = app.delete(&format!("/api/categories/{a}"), &token).await;
    assert_eq!(res.status, StatusCode::CONFLICT);

    let res = app.delete(&format!("/api/categories/{c}"), &token).await;
    assert_eq!(res.status, StatusCode::OK);
    let res = app.delete(&format!("/api/categories/{a}"), &token).await;
    assert_eq!(res.status, StatusCode::OK);
    let res = app.delete(&format!("/api/categories/{a}"), &token).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reparent_into_descendant_is_400() {
    let app = TestApp::new().await;
    let token = app.token(Role::Editor).await;
    let a = create(&app, &token, json!({ "name": "A" })).await;
    let c = create(&app, &token, json!({ "name": "C", "parentId": a })).await;
    let d = create(&app, &token, json!({ "name": "D", "parentId": c })).await;

    let res = app
        .put(&format!("/api/categories/{a}"), &token, json!({ "parentId": d }))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app
        .put(&format!("/api/categories/{a}"), &token, json!({ "parentId": a }))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app
        .put(&format!("/api/categories/{d}"), &token, json!({ "parentId": null }))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["parentId"], Value::Null);
    assert_eq!(res.data()["order"], 1);
}

#[tokio::test]
async fn test_create_validation_and_slug_conflict() {
    let app = TestApp::new().await;
    let token = app.token(Role::Editor).await;
    create(&app, &token, json!({ "name": "Rust News" })).await;

    let res = app.post("/api/categories", &token, json!({ "name": "  " })).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app
        .post("/api/categories", &token, json!({ "name": "Other", "slug": "Bad Slug" }))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app
        .post("/api/categories", &token, json!({ "name": "Rust news" }))
        .await;
    assert_eq!(res.status, StatusCode::CONFLICT);

    let res = app
        .post("/api/categories", &token, json!({ "name": "Orphan", "parentId": 777 }))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app.post("/api/categories", &token, json!({ "slug": "x" })).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_public_listing_hides_inactive_subtrees() {
    let app = TestApp::new().await;
    let token = app.token(Role::Editor).await;
    let a = create(&app, &token, json!({ "name": "A", "isActive": false })).await;
    create(&app, &token, json!({ "name": "C", "parentId": a })).await;
    let b = create(&app, &token, json!({ "name": "B" })).await;

    let res = app.get("/api/categories?format=flat", None).await;
    assert_eq!(ids(res.data()), vec![b]);

    let res = app.get("/api/dashboard/categories?format=flat", Some(&token)).await;
    assert_eq!(res.data().as_array().unwrap().len(), 3);
}
