//! User API Handlers

use axum::extract::{Path, State};
use shared::models::{Role, User, UserCreate, UserUpdate};

use crate::api::extract::ValidJson;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::user::{self, NewUser, UserChanges};
use crate::security_log;
use crate::utils::password::hash_password;
use crate::utils::validation::{
    MAX_SHORT_TEXT_LEN, validate_email, validate_password, validate_required_text,
};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

fn parse_role(value: &str) -> AppResult<Role> {
    Role::parse(value).ok_or_else(|| {
        AppError::with_message(ErrorCode::UnknownRole, format!("Unknown role '{value}'"))
            .with_detail("field", "role")
            .with_detail(
                "allowed",
                Role::ALL.iter().map(|r| r.as_str()).collect::<Vec<_>>(),
            )
    })
}

/// GET /api/users
pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<User>>> {
    Ok(ApiResponse::success(user::list(&state.pool).await?))
}

/// POST /api/users
pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    ValidJson(payload): ValidJson<UserCreate>,
) -> AppResult<ApiResponse<User>> {
    let username = payload.username.trim();
    validate_required_text(username, "username", MAX_SHORT_TEXT_LEN)?;
    let email = payload.email.trim();
    validate_email(email)?;
    validate_password(&payload.password)?;
    let role = parse_role(&payload.role)?;

    let password_hash = hash_password(&payload.password).await?;
    let created = user::create(
        &state.pool,
        NewUser {
            username,
            email,
            password_hash: &password_hash,
            role,
        },
    )
    .await?;

    security_log!(
        "INFO",
        "user_created",
        user_id = created.id,
        role = created.role.clone(),
        by = current.username.clone()
    );
    Ok(ApiResponse::success(created))
}

/// PUT /api/users/{id} - email, role and password changes
pub async fn update(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
    ValidJson(payload): ValidJson<UserUpdate>,
) -> AppResult<ApiResponse<User>> {
    let email = match payload.email {
        Some(email) => {
            let email = email.trim().to_string();
            validate_email(&email)?;
            Some(email)
        }
        None => None,
    };
    let role = payload.role.as_deref().map(parse_role).transpose()?;
    let password_hash = match payload.password.as_deref() {
        Some(password) => {
            validate_password(password)?;
            Some(hash_password(password).await?)
        }
        None => None,
    };

    let updated = user::update(
        &state.pool,
        id,
        UserChanges {
            email,
            role,
            password_hash,
        },
    )
    .await?;

    if role.is_some() {
        security_log!(
            "INFO",
            "user_role_changed",
            user_id = id,
            role = updated.role.clone(),
            by = current.username.clone()
        );
    }
    Ok(ApiResponse::success(updated))
}

/// DELETE /api/users/{id} - an account cannot delete itself
pub async fn delete(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<User>> {
    if id == current.id {
        return Err(AppError::new(ErrorCode::CannotDeleteSelf));
    }

    let deleted = user::delete(&state.pool, id).await?;
    security_log!(
        "INFO",
        "user_deleted",
        user_id = id,
        username = deleted.username.clone(),
        by = current.username.clone()
    );
    Ok(ApiResponse::success(deleted))
}
