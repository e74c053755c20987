//! Footer Menu Repository
//!
//! Footer links are flat and grouped by section. The dashboard always submits
//! the complete footer, so writes replace the table wholesale.

use std::collections::HashMap;

use shared::models::{FooterMenuItem, FooterMenuItemInput};
use shared::util::now_millis;
use sqlx::SqlitePool;

use super::{RepoResult, begin_write};

/// All footer items ordered by section, then order within the section
pub async fn list(pool: &SqlitePool) -> RepoResult<Vec<FooterMenuItem>> {
    let items = sqlx::query_as::<_, FooterMenuItem>(
        "SELECT id, section, label, href, sort_order, is_active, created_at
         FROM footer_menu_items
         ORDER BY section, sort_order, id",
    )
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// Replace every footer item with `items`
///
/// Order is the item's position among the submitted items of the same section.
pub async fn replace_all(pool: &SqlitePool, items: Vec<FooterMenuItemInput>) -> RepoResult<Vec<FooterMenuItem>> {
    let now = now_millis();
    let mut next_order: HashMap<String, i32> = HashMap::new();

    let mut tx = begin_write(pool).await?;
    let removed = sqlx::query("DELETE FROM footer_menu_items")
        .execute(&mut *tx)
        .await?
        .rows_affected();

    for item in &items {
        let section = item.section.trim();
        let order = next_order.entry(section.to_string()).or_insert(0);
        sqlx::query(
            "INSERT INTO footer_menu_items (section, label, href, sort_order, is_active, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(section)
        .bind(item.label.trim())
        .bind(item.href.trim())
        .bind(*order)
        .bind(item.is_active.unwrap_or(true))
        .bind(now)
        .execute(&mut *tx)
        .await?;
        *order += 1;
    }
    tx.commit().await?;

    tracing::info!(removed, inserted = items.len(), "Footer menu replaced");
    list(pool).await
}
