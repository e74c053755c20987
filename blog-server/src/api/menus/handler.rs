//! Menu API Handlers

use axum::extract::{Path, Query, State};
use shared::models::{
    FooterMenuItem, FooterMenuItemInput, HeaderMenuItem, HeaderMenuItemCreate, HeaderMenuItemUpdate,
    ReorderRequest,
};

use crate::api::extract::{FormatQuery, TreeListing, UpdatedCount, ValidJson};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::menu::{self, HEADER_MENU};
use crate::db::repository::{footer, tree};
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_href, validate_required_text};
use crate::utils::{ApiResponse, AppResult};

// ── Header ──────────────────────────────────────────────────────────

/// GET /api/menus/header - active items for the public site
pub async fn list_header_public(
    State(state): State<ServerState>,
    Query(query): Query<FormatQuery>,
) -> AppResult<ApiResponse<TreeListing<HeaderMenuItem>>> {
    let format = query.parse()?;
    let items = tree::active_hierarchy::<HeaderMenuItem>(&state.pool, &HEADER_MENU).await?;
    Ok(ApiResponse::success(TreeListing::new(items, format)))
}

/// GET /api/dashboard/menus/header
pub async fn list_header(
    State(state): State<ServerState>,
    Query(query): Query<FormatQuery>,
) -> AppResult<ApiResponse<TreeListing<HeaderMenuItem>>> {
    let format = query.parse()?;
    let items = tree::hierarchy::<HeaderMenuItem>(&state.pool, &HEADER_MENU).await?;
    Ok(ApiResponse::success(TreeListing::new(items, format)))
}

/// POST /api/menus/header
pub async fn create_header(
    State(state): State<ServerState>,
    current: CurrentUser,
    ValidJson(payload): ValidJson<HeaderMenuItemCreate>,
) -> AppResult<ApiResponse<HeaderMenuItem>> {
    validate_required_text(&payload.label, "label", MAX_NAME_LEN)?;
    validate_href(payload.href.trim())?;

    let created = menu::create(&state.pool, payload).await?;
    tracing::info!(item_id = created.id, user = %current.username, "Header menu item created");
    Ok(ApiResponse::success(created))
}

/// PUT /api/menus/header/{id}
pub async fn update_header(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
    ValidJson(payload): ValidJson<HeaderMenuItemUpdate>,
) -> AppResult<ApiResponse<HeaderMenuItem>> {
    if let Some(label) = &payload.label {
        validate_required_text(label, "label", MAX_NAME_LEN)?;
    }
    if let Some(href) = &payload.href {
        validate_href(href.trim())?;
    }

    let updated = menu::update(&state.pool, id, payload).await?;
    tracing::info!(item_id = id, user = %current.username, "Header menu item updated");
    Ok(ApiResponse::success(updated))
}

/// DELETE /api/menus/header/{id} - rejected while the item has children
pub async fn delete_header(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<HeaderMenuItem>> {
    let deleted = menu::delete(&state.pool, id).await?;
    tracing::info!(item_id = id, user = %current.username, "Header menu item deleted");
    Ok(ApiResponse::success(deleted))
}

/// POST /api/menus/header/reorder `{ reorderData: [{ itemId, newOrder }] }`
pub async fn reorder_header(
    State(state): State<ServerState>,
    ValidJson(payload): ValidJson<ReorderRequest>,
) -> AppResult<ApiResponse<UpdatedCount>> {
    let items = payload.into_items("itemId")?;
    let updated = tree::reorder(&state.pool, &HEADER_MENU, &items).await?;
    Ok(ApiResponse::success(UpdatedCount { updated }))
}

/// POST /api/menus/header/reset-orders
pub async fn reset_header_orders(State(state): State<ServerState>) -> AppResult<ApiResponse<UpdatedCount>> {
    let updated = tree::reset_orders::<HeaderMenuItem>(&state.pool, &HEADER_MENU).await?;
    Ok(ApiResponse::success(UpdatedCount { updated }))
}

// ── Footer ──────────────────────────────────────────────────────────

/// GET /api/menus/footer - active links for the public site
pub async fn list_footer_public(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<FooterMenuItem>>> {
    let items = footer::list(&state.pool)
        .await?
        .into_iter()
        .filter(|item| item.is_active)
        .collect();
    Ok(ApiResponse::success(items))
}

/// GET /api/dashboard/menus/footer
pub async fn list_footer(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<FooterMenuItem>>> {
    Ok(ApiResponse::success(footer::list(&state.pool).await?))
}

/// PUT /api/menus/footer - replace the whole footer
pub async fn replace_footer(
    State(state): State<ServerState>,
    current: CurrentUser,
    ValidJson(items): ValidJson<Vec<FooterMenuItemInput>>,
) -> AppResult<ApiResponse<Vec<FooterMenuItem>>> {
    for (index, item) in items.iter().enumerate() {
        validate_required_text(&item.section, "section", MAX_SHORT_TEXT_LEN)
            .and_then(|_| validate_required_text(&item.label, "label", MAX_NAME_LEN))
            .and_then(|_| validate_href(item.href.trim()))
            .map_err(|e| e.with_detail("index", index))?;
    }

    let replaced = footer::replace_all(&state.pool, items).await?;
    tracing::info!(count = replaced.len(), user = %current.username, "Footer menu replaced");
    Ok(ApiResponse::success(replaced))
}
