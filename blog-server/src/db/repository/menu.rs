//! Header Menu Repository

use shared::error::ErrorCode;
use shared::models::{HeaderMenuItem, HeaderMenuItemCreate, HeaderMenuItemUpdate};
use shared::util::now_millis;
use sqlx::SqlitePool;

use super::{RepoResult, begin_write};
use super::tree::{self, TreeTable};

pub const HEADER_MENU: TreeTable = TreeTable {
    table: "header_menu_items",
    entity: "Menu item",
    columns: "id, label, href, parent_id, sort_order, is_active, open_in_new_tab, created_at, updated_at",
    not_found: ErrorCode::MenuItemNotFound,
    has_children: ErrorCode::MenuItemHasChildren,
    parent_invalid: ErrorCode::MenuParentInvalid,
};

/// Create a header item at the end of its sibling group
pub async fn create(pool: &SqlitePool, data: HeaderMenuItemCreate) -> RepoResult<HeaderMenuItem> {
    let now = now_millis();
    let mut tx = begin_write(pool).await?;
    tree::ensure_parent_exists(&mut tx, &HEADER_MENU, data.parent_id).await?;
    let order = tree::next_order(&mut tx, &HEADER_MENU, data.parent_id).await?;

    let item: HeaderMenuItem = sqlx::query_as(
        "INSERT INTO header_menu_items (label, href, parent_id, sort_order, is_active, open_in_new_tab, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING id, label, href, parent_id, sort_order, is_active, open_in_new_tab, created_at, updated_at",
    )
    .bind(data.label.trim())
    .bind(data.href.trim())
    .bind(data.parent_id)
    .bind(order)
    .bind(data.is_active.unwrap_or(true))
    .bind(data.open_in_new_tab.unwrap_or(false))
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok(item)
}

pub async fn update(pool: &SqlitePool, id: i64, data: HeaderMenuItemUpdate) -> RepoResult<HeaderMenuItem> {
    let now = now_millis();
    let mut tx = begin_write(pool).await?;

    let existing: HeaderMenuItem = tree::find_by_id(&mut tx, &HEADER_MENU, id)
        .await?
        .ok_or_else(|| HEADER_MENU.not_found(id))?;

    sqlx::query(
        "UPDATE header_menu_items SET label = ?, href = ?, is_active = ?, open_in_new_tab = ?, updated_at = ? WHERE id = ?",
    )
    .bind(data.label.as_deref().map(str::trim).unwrap_or(existing.label.as_str()))
    .bind(data.href.as_deref().map(str::trim).unwrap_or(existing.href.as_str()))
    .bind(data.is_active.unwrap_or(existing.is_active))
    .bind(data.open_in_new_tab.unwrap_or(existing.open_in_new_tab))
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if let Some(new_parent) = data.parent_id {
        tree::reparent(&mut tx, &HEADER_MENU, &existing, new_parent, now).await?;
    }

    let updated: HeaderMenuItem = tree::find_by_id(&mut tx, &HEADER_MENU, id)
        .await?
        .ok_or_else(|| HEADER_MENU.not_found(id))?;
    tx.commit().await?;

    Ok(updated)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<HeaderMenuItem> {
    tree::delete(pool, &HEADER_MENU, id).await
}
