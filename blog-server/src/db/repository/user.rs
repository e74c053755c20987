//! User Repository
//!
//! Password hashes are only loaded by [`find_credentials`] and never leave
//! this module inside a [`User`].

use shared::error::ErrorCode;
use shared::models::{Role, User};
use shared::util::now_millis;
use sqlx::{SqliteConnection, SqlitePool};

use super::{RepoError, RepoResult, begin_write};

/// User row including the password hash, for login only
#[derive(Debug, sqlx::FromRow)]
pub struct UserCredentials {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    pub created_at: i64,
    pub password_hash: String,
}

impl From<UserCredentials> for User {
    fn from(row: UserCredentials) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            role: row.role,
            created_at: row.created_at,
        }
    }
}

/// Fields of a new account; the password is already hashed
#[derive(Debug)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: Role,
}

/// Changes to an account; `None` keeps the current value
#[derive(Debug, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub role: Option<Role>,
    pub password_hash: Option<String>,
}

fn not_found(id: i64) -> RepoError {
    RepoError::Business(ErrorCode::UserNotFound, format!("User {id} not found"))
}

async fn ensure_email_free(conn: &mut SqliteConnection, email: &str, except: Option<i64>) -> RepoResult<()> {
    let taken: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ? AND id IS NOT ?")
        .bind(email)
        .bind(except)
        .fetch_one(conn)
        .await?;
    if taken > 0 {
        return Err(RepoError::Business(
            ErrorCode::EmailExists,
            format!("Email '{email}' is already registered"),
        ));
    }
    Ok(())
}

pub async fn list(pool: &SqlitePool) -> RepoResult<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        "SELECT id, username, email, role, created_at FROM users ORDER BY created_at, id",
    )
    .fetch_all(pool)
    .await?;
    Ok(users)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT id, username, email, role, created_at FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_credentials(pool: &SqlitePool, username: &str) -> RepoResult<Option<UserCredentials>> {
    let row = sqlx::query_as::<_, UserCredentials>(
        "SELECT id, username, email, role, created_at, password_hash FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users").fetch_one(pool).await?;
    Ok(count)
}

pub async fn create(pool: &SqlitePool, data: NewUser<'_>) -> RepoResult<User> {
    let mut tx = begin_write(pool).await?;

    let taken: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?")
        .bind(data.username)
        .fetch_one(&mut *tx)
        .await?;
    if taken > 0 {
        return Err(RepoError::Business(
            ErrorCode::UsernameExists,
            format!("Username '{}' is already taken", data.username),
        ));
    }
    ensure_email_free(&mut tx, data.email, None).await?;

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (username, email, password_hash, role, created_at)
         VALUES (?, ?, ?, ?, ?)
         RETURNING id, username, email, role, created_at",
    )
    .bind(data.username)
    .bind(data.email)
    .bind(data.password_hash)
    .bind(data.role.as_str())
    .bind(now_millis())
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok(user)
}

pub async fn update(pool: &SqlitePool, id: i64, changes: UserChanges) -> RepoResult<User> {
    let mut tx = begin_write(pool).await?;

    let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE id = ?")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
    if exists == 0 {
        return Err(not_found(id));
    }
    if let Some(email) = &changes.email {
        ensure_email_free(&mut tx, email, Some(id)).await?;
    }

    let user = sqlx::query_as::<_, User>(
        "UPDATE users SET
            email = COALESCE(?, email),
            role = COALESCE(?, role),
            password_hash = COALESCE(?, password_hash)
         WHERE id = ?
         RETURNING id, username, email, role, created_at",
    )
    .bind(changes.email)
    .bind(changes.role.map(|r| r.as_str()))
    .bind(changes.password_hash)
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok(user)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<User> {
    let user = sqlx::query_as::<_, User>(
        "DELETE FROM users WHERE id = ? RETURNING id, username, email, role, created_at",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| not_found(id))?;
    Ok(user)
}
