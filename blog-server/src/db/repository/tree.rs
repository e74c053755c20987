//! Ordered tree tables
//!
//! Shared operations for tables whose rows form a tree with per-sibling-group
//! ordering (categories, header menu items). A [`TreeTable`] describes the
//! table; the functions here are generic over the row type.
//!
//! Sibling groups are keyed by `parent_id` (`NULL` for roots). SQLite's `IS`
//! operator compares `NULL` as a value, so `parent_id IS ?` selects a group
//! whether or not the bound parent is `None`.

use shared::error::ErrorCode;
use shared::models::ReorderItem;
use shared::tree::{self, TreeItem, TreeNode};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, SqliteConnection, SqlitePool};

use super::{RepoError, RepoResult, begin_write};

/// A row type stored in a [`TreeTable`]
pub trait TreeRow: TreeNode + for<'r> FromRow<'r, SqliteRow> + Send + Unpin {}

impl<T> TreeRow for T where T: TreeNode + for<'r> FromRow<'r, SqliteRow> + Send + Unpin {}

/// Static description of an ordered tree table
#[derive(Debug, Clone, Copy)]
pub struct TreeTable {
    pub table: &'static str,
    /// Human-readable entity name used in error messages
    pub entity: &'static str,
    /// Column list selected into the row type
    pub columns: &'static str,
    pub not_found: ErrorCode,
    pub has_children: ErrorCode,
    pub parent_invalid: ErrorCode,
}

impl TreeTable {
    pub fn not_found(&self, id: i64) -> RepoError {
        RepoError::Business(self.not_found, format!("{} {} not found", self.entity, id))
    }

    fn invalid_parent(&self, message: String) -> RepoError {
        RepoError::Business(self.parent_invalid, message)
    }
}

// ── Reads ───────────────────────────────────────────────────────────

/// Every row of the table, unordered
pub async fn load_all<T: TreeRow>(conn: &mut SqliteConnection, table: &TreeTable) -> RepoResult<Vec<T>> {
    let sql = format!(
        "SELECT {} FROM {} ORDER BY parent_id, sort_order, created_at, id",
        table.columns, table.table
    );
    Ok(sqlx::query_as::<_, T>(&sql).fetch_all(conn).await?)
}

pub async fn find_by_id<T: TreeRow>(
    conn: &mut SqliteConnection,
    table: &TreeTable,
    id: i64,
) -> RepoResult<Option<T>> {
    let sql = format!("SELECT {} FROM {} WHERE id = ?", table.columns, table.table);
    Ok(sqlx::query_as::<_, T>(&sql).bind(id).fetch_optional(conn).await?)
}

/// Full hierarchy, children nested under their parents
pub async fn hierarchy<T: TreeRow>(pool: &SqlitePool, table: &TreeTable) -> RepoResult<Vec<TreeItem<T>>> {
    let mut conn = pool.acquire().await?;
    let rows = load_all::<T>(&mut conn, table).await?;
    Ok(tree::build_hierarchy(rows))
}

/// Hierarchy without inactive nodes (an inactive node hides its subtree)
pub async fn active_hierarchy<T: TreeRow>(
    pool: &SqlitePool,
    table: &TreeTable,
) -> RepoResult<Vec<TreeItem<T>>> {
    Ok(tree::prune_inactive(hierarchy(pool, table).await?))
}

/// All nodes in depth-first hierarchy order
pub async fn flat<T: TreeRow>(pool: &SqlitePool, table: &TreeTable) -> RepoResult<Vec<T>> {
    Ok(tree::flatten(hierarchy(pool, table).await?))
}

// ── Write helpers (run inside a caller's transaction) ───────────────

/// Number of nodes in a sibling group, which is the order of the next appended node
pub async fn next_order(
    conn: &mut SqliteConnection,
    table: &TreeTable,
    parent_id: Option<i64>,
) -> RepoResult<i32> {
    let sql = format!("SELECT COUNT(*) FROM {} WHERE parent_id IS ?", table.table);
    let count: i64 = sqlx::query_scalar(&sql).bind(parent_id).fetch_one(conn).await?;
    i32::try_from(count).map_err(|_| RepoError::Validation(format!("Too many siblings in {}", table.table)))
}

/// Reject a parent reference that does not exist
pub async fn ensure_parent_exists(
    conn: &mut SqliteConnection,
    table: &TreeTable,
    parent_id: Option<i64>,
) -> RepoResult<()> {
    let Some(parent_id) = parent_id else {
        return Ok(());
    };
    let sql = format!("SELECT COUNT(*) FROM {} WHERE id = ?", table.table);
    let count: i64 = sqlx::query_scalar(&sql).bind(parent_id).fetch_one(conn).await?;
    if count == 0 {
        return Err(table.invalid_parent(format!(
            "Parent {} {} does not exist",
            table.entity.to_lowercase(),
            parent_id
        )));
    }
    Ok(())
}

/// Rewrite a sibling group's orders to `0..N-1`, keeping the current sequence.
///
/// Returns how many rows changed.
pub async fn compact_group(
    conn: &mut SqliteConnection,
    table: &TreeTable,
    parent_id: Option<i64>,
    now: i64,
) -> RepoResult<usize> {
    let sql = format!(
        "SELECT id, sort_order FROM {} WHERE parent_id IS ? ORDER BY sort_order, created_at, id",
        table.table
    );
    let siblings: Vec<(i64, i32)> = sqlx::query_as(&sql).bind(parent_id).fetch_all(&mut *conn).await?;

    let update = format!("UPDATE {} SET sort_order = ?, updated_at = ? WHERE id = ?", table.table);
    let mut changed = 0;
    for (position, (id, order)) in siblings.into_iter().enumerate() {
        let position = position as i32;
        if order != position {
            sqlx::query(&update)
                .bind(position)
                .bind(now)
                .bind(id)
                .execute(&mut *conn)
                .await?;
            changed += 1;
        }
    }
    Ok(changed)
}

/// Move `node` under `new_parent`: appended to the new group, old group compacted.
///
/// Rejects moving a node under itself or one of its descendants.
pub async fn reparent<T: TreeRow>(
    conn: &mut SqliteConnection,
    table: &TreeTable,
    node: &T,
    new_parent: Option<i64>,
    now: i64,
) -> RepoResult<()> {
    let old_parent = node.parent_id();
    if old_parent == new_parent {
        return Ok(());
    }

    if let Some(parent_id) = new_parent {
        ensure_parent_exists(&mut *conn, table, Some(parent_id)).await?;

        let rows = load_all::<T>(&mut *conn, table).await?;
        if tree::is_descendant(&tree::parent_map(&rows), parent_id, node.id()) {
            return Err(table.invalid_parent(format!(
                "Cannot move {} {} under itself or one of its descendants",
                table.entity.to_lowercase(),
                node.id()
            )));
        }
    }

    let order = next_order(&mut *conn, table, new_parent).await?;
    let sql = format!(
        "UPDATE {} SET parent_id = ?, sort_order = ?, updated_at = ? WHERE id = ?",
        table.table
    );
    sqlx::query(&sql)
        .bind(new_parent)
        .bind(order)
        .bind(now)
        .bind(node.id())
        .execute(&mut *conn)
        .await?;

    compact_group(conn, table, old_parent, now).await?;
    Ok(())
}

// ── Transactional operations ────────────────────────────────────────

/// Apply `{id, newOrder}` pairs atomically.
///
/// Items are validated beforehand (non-empty, no duplicate ids, no negative
/// orders). An unknown id rolls back every update. The submitted orders are
/// not required to form a permutation of their group.
pub async fn reorder(pool: &SqlitePool, table: &TreeTable, items: &[ReorderItem]) -> RepoResult<usize> {
    let now = shared::util::now_millis();
    let sql = format!("UPDATE {} SET sort_order = ?, updated_at = ? WHERE id = ?", table.table);

    let mut tx = begin_write(pool).await?;
    for item in items {
        let result = sqlx::query(&sql)
            .bind(item.new_order)
            .bind(now)
            .bind(item.id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(table.not_found(item.id));
        }
    }
    tx.commit().await?;

    tracing::info!(table = table.table, count = items.len(), "Sibling orders updated");
    Ok(items.len())
}

/// Rewrite every sibling group to `0..N-1` in creation order. Returns the number
/// of nodes rewritten.
pub async fn reset_orders<T: TreeRow>(pool: &SqlitePool, table: &TreeTable) -> RepoResult<usize> {
    let now = shared::util::now_millis();
    let sql = format!("UPDATE {} SET sort_order = ?, updated_at = ? WHERE id = ?", table.table);

    let mut tx = begin_write(pool).await?;
    let rows = load_all::<T>(&mut tx, table).await?;
    let plan = tree::sequential_orders(&rows);
    for (id, order) in &plan {
        sqlx::query(&sql)
            .bind(*order)
            .bind(now)
            .bind(*id)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    tracing::info!(table = table.table, count = plan.len(), "Sibling orders reset");
    Ok(plan.len())
}

/// Delete a leaf node and compact its former sibling group.
///
/// Nodes with children are rejected; nothing is cascaded or reparented.
pub async fn delete<T: TreeRow>(pool: &SqlitePool, table: &TreeTable, id: i64) -> RepoResult<T> {
    let now = shared::util::now_millis();
    let mut tx = begin_write(pool).await?;

    let node: T = find_by_id(&mut tx, table, id)
        .await?
        .ok_or_else(|| table.not_found(id))?;

    let sql = format!("SELECT COUNT(*) FROM {} WHERE parent_id = ?", table.table);
    let children: i64 = sqlx::query_scalar(&sql).bind(id).fetch_one(&mut *tx).await?;
    if children > 0 {
        return Err(RepoError::Business(
            table.has_children,
            format!(
                "{} {} has {} child item(s); move or delete them first",
                table.entity, id, children
            ),
        ));
    }

    let sql = format!("DELETE FROM {} WHERE id = ?", table.table);
    sqlx::query(&sql).bind(id).execute(&mut *tx).await?;
    compact_group(&mut tx, table, node.parent_id(), now).await?;
    tx.commit().await?;

    Ok(node)
}
