//! Shared harness: full app over an in-memory database, driven with `oneshot`

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use blog_server::db::repository::user::{self, NewUser};
use blog_server::utils::password::hash_password;
use blog_server::{Config, ServerState};
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use shared::models::{Role, User};
use tower::ServiceExt;

pub const PASSWORD: &str = "correct-horse-battery";

pub struct TestApp {
    pub app: Router,
    pub state: ServerState,
}

pub struct Response {
    pub status: StatusCode,
    pub body: Value,
}

impl Response {
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }
}

impl TestApp {
    pub async fn new() -> Self {
        let state = ServerState::initialize(&Config::for_tests())
            .await
            .expect("test state");
        let app = blog_server::api::build_app(state.clone());
        Self { app, state }
    }

    /// Insert a user directly; the password is only hashed for accounts used to log in
    pub async fn user(&self, username: &str, role: Role) -> User {
        user::create(
            &self.state.pool,
            NewUser {
                username,
                email: &format!("{username}@example.com"),
                password_hash: "$argon2id$v=19$m=19456,t=2,p=1$unused$unused",
                role,
            },
        )
        .await
        .expect("insert user")
    }

    pub async fn user_with_password(&self, username: &str, role: Role) -> User {
        let hash = hash_password(PASSWORD).await.expect("hash");
        user::create(
            &self.state.pool,
            NewUser {
                username,
                email: &format!("{username}@example.com"),
                password_hash: &hash,
                role,
            },
        )
        .await
        .expect("insert user")
    }

    pub fn token_for(&self, user: &User) -> String {
        self.state
            .get_jwt_service()
            .generate_token(user.id, &user.username, &user.role)
            .expect("token")
    }

    /// Token for a fresh user with `role`
    pub async fn token(&self, role: Role) -> String {
        let user = self.user(&format!("{}-user", role.as_str().to_lowercase()), role).await;
        self.token_for(&user)
    }

    pub async fn request(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(http::header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).expect("request"))
            .await
            .expect("infallible");
        let status = response.status();
        let bytes = response.into_body().collect().await.expect("body").to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        Response { status, body }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> Response {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> Response {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> Response {
        self.request(Method::DELETE, uri, Some(token), None).await
    }
}

/// Ids of a JSON array of nodes, in order
pub fn ids(items: &Value) -> Vec<i64> {
    items
        .as_array()
        .expect("array")
        .iter()
        .map(|item| item["id"].as_i64().expect("id"))
        .collect()
}
