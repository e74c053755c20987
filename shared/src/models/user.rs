//! User Model

use serde::{Deserialize, Serialize};

/// Dashboard user (password hash never leaves the server)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Stored as text; unknown values are treated as "no role" by the permission checker
    pub role: String,
    pub created_at: i64,
}

/// Create user payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreate {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Update user payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub email: Option<String>,
    pub role: Option<String>,
    pub password: Option<String>,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: i64,
    pub user: User,
}
