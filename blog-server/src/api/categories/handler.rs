//! Category API Handlers

use axum::extract::{Path, Query, State};
use shared::models::{Category, CategoryCreate, CategoryUpdate, ReorderRequest};

use crate::api::extract::{FormatQuery, TreeListing, UpdatedCount, ValidJson};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::category::{self, CATEGORIES};
use crate::db::repository::tree;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text, validate_slug,
};
use crate::utils::{ApiResponse, AppResult};

/// GET /api/categories - active categories for the public site
pub async fn list_public(
    State(state): State<ServerState>,
    Query(query): Query<FormatQuery>,
) -> AppResult<ApiResponse<TreeListing<Category>>> {
    let format = query.parse()?;
    let items = tree::active_hierarchy::<Category>(&state.pool, &CATEGORIES).await?;
    Ok(ApiResponse::success(TreeListing::new(items, format)))
}

/// GET /api/dashboard/categories - every category, including inactive ones
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<FormatQuery>,
) -> AppResult<ApiResponse<TreeListing<Category>>> {
    let format = query.parse()?;
    let items = tree::hierarchy::<Category>(&state.pool, &CATEGORIES).await?;
    Ok(ApiResponse::success(TreeListing::new(items, format)))
}

/// POST /api/categories
pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    ValidJson(mut payload): ValidJson<CategoryCreate>,
) -> AppResult<ApiResponse<Category>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    let slug = match payload.slug.take().filter(|s| !s.trim().is_empty()) {
        Some(slug) => slug.trim().to_string(),
        None => shared::util::slugify(&payload.name),
    };
    validate_slug(&slug)?;
    payload.slug = Some(slug);

    let created = category::create(&state.pool, payload).await?;
    tracing::info!(category_id = created.id, slug = %created.slug, user = %current.username, "Category created");
    Ok(ApiResponse::success(created))
}

/// PUT /api/categories/{id}
pub async fn update(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
    ValidJson(payload): ValidJson<CategoryUpdate>,
) -> AppResult<ApiResponse<Category>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(slug) = &payload.slug {
        validate_slug(slug)?;
    }
    if let Some(description) = &payload.description {
        validate_optional_text(description, "description", MAX_NOTE_LEN)?;
    }

    let updated = category::update(&state.pool, id, payload).await?;
    tracing::info!(category_id = id, user = %current.username, "Category updated");
    Ok(ApiResponse::success(updated))
}

/// DELETE /api/categories/{id} - rejected while the category has children
pub async fn delete(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Category>> {
    let deleted = category::delete(&state.pool, id).await?;
    tracing::info!(category_id = id, user = %current.username, "Category deleted");
    Ok(ApiResponse::success(deleted))
}

/// POST /api/categories/reorder `{ reorderData: [{ categoryId, newOrder }] }`
pub async fn reorder(
    State(state): State<ServerState>,
    ValidJson(payload): ValidJson<ReorderRequest>,
) -> AppResult<ApiResponse<UpdatedCount>> {
    let items = payload.into_items("categoryId")?;
    let updated = tree::reorder(&state.pool, &CATEGORIES, &items).await?;
    Ok(ApiResponse::success(UpdatedCount { updated }))
}

/// POST /api/categories/reset-orders
pub async fn reset_orders(State(state): State<ServerState>) -> AppResult<ApiResponse<UpdatedCount>> {
    let updated = tree::reset_orders::<Category>(&state.pool, &CATEGORIES).await?;
    Ok(ApiResponse::success(UpdatedCount { updated }))
}
