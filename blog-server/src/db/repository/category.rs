//! Category Repository

use shared::error::ErrorCode;
use shared::models::{Category, CategoryCreate, CategoryUpdate};
use shared::util::{now_millis, slugify};
use sqlx::{SqliteConnection, SqlitePool};

use super::tree::{self, TreeTable};
use super::{RepoError, RepoResult, begin_write};

pub const CATEGORIES: TreeTable = TreeTable {
    table: "categories",
    entity: "Category",
    columns: "id, name, slug, description, parent_id, sort_order, is_active, created_at, updated_at",
    not_found: ErrorCode::CategoryNotFound,
    has_children: ErrorCode::CategoryHasChildren,
    parent_invalid: ErrorCode::CategoryParentInvalid,
};

async fn ensure_slug_free(conn: &mut SqliteConnection, slug: &str, except: Option<i64>) -> RepoResult<()> {
    let taken: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE slug = ? AND id IS NOT ?")
        .bind(slug)
        .bind(except)
        .fetch_one(conn)
        .await?;
    if taken > 0 {
        return Err(RepoError::Business(
            ErrorCode::CategorySlugExists,
            format!("Category slug '{slug}' already exists"),
        ));
    }
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Category>> {
    let mut conn = pool.acquire().await?;
    tree::find_by_id(&mut conn, &CATEGORIES, id).await
}

/// Create a category at the end of its sibling group
///
/// `slug` defaults to the slugified name.
pub async fn create(pool: &SqlitePool, data: CategoryCreate) -> RepoResult<Category> {
    let slug = data
        .slug
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| slugify(&data.name));
    if slug.is_empty() {
        return Err(RepoError::Validation(format!(
            "Cannot derive a slug from name '{}'",
            data.name
        )));
    }
    let now = now_millis();

    let mut tx = begin_write(pool).await?;
    ensure_slug_free(&mut tx, &slug, None).await?;
    tree::ensure_parent_exists(&mut tx, &CATEGORIES, data.parent_id).await?;
    let order = tree::next_order(&mut tx, &CATEGORIES, data.parent_id).await?;

    let category: Category = sqlx::query_as(
        "INSERT INTO categories (name, slug, description, parent_id, sort_order, is_active, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING id, name, slug, description, parent_id, sort_order, is_active, created_at, updated_at",
    )
    .bind(data.name.trim())
    .bind(&slug)
    .bind(data.description)
    .bind(data.parent_id)
    .bind(order)
    .bind(data.is_active.unwrap_or(true))
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok(category)
}

/// Update a category; a changed `parentId` moves it to the end of the new group
pub async fn update(pool: &SqlitePool, id: i64, data: CategoryUpdate) -> RepoResult<Category> {
    let now = now_millis();
    let mut tx = begin_write(pool).await?;

    let existing: Category = tree::find_by_id(&mut tx, &CATEGORIES, id)
        .await?
        .ok_or_else(|| CATEGORIES.not_found(id))?;

    if let Some(slug) = &data.slug
        && *slug != existing.slug
    {
        ensure_slug_free(&mut tx, slug, Some(id)).await?;
    }

    let name = data.name.map(|n| n.trim().to_string()).unwrap_or_else(|| existing.name.clone());
    let slug = data.slug.unwrap_or_else(|| existing.slug.clone());
    let description = data.description.unwrap_or_else(|| existing.description.clone());
    let is_active = data.is_active.unwrap_or(existing.is_active);

    sqlx::query(
        "UPDATE categories SET name = ?, slug = ?, description = ?, is_active = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&name)
    .bind(&slug)
    .bind(description)
    .bind(is_active)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if let Some(new_parent) = data.parent_id {
        tree::reparent(&mut tx, &CATEGORIES, &existing, new_parent, now).await?;
    }

    let updated: Category = tree::find_by_id(&mut tx, &CATEGORIES, id)
        .await?
        .ok_or_else(|| CATEGORIES.not_found(id))?;
    tx.commit().await?;

    Ok(updated)
}

/// Delete a category without children
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<Category> {
    tree::delete(pool, &CATEGORIES, id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    fn new_category(name: &str, parent_id: Option<i64>) -> CategoryCreate {
        CategoryCreate {
            name: name.to_string(),
            slug: None,
            description: None,
            parent_id,
            is_active: None,
        }
    }

    #[tokio::test]
    async fn test_create_appends_to_sibling_group() {
        let db = DbService::in_memory().await.unwrap();
        let pool = &db.pool;

        let a = create(pool, new_category("Rust Tips", None)).await.unwrap();
        let b = create(pool, new_category("Databases", None)).await.unwrap();
        let c = create(pool, new_category("Async", Some(a.id))).await.unwrap();

        assert_eq!(a.slug, "rust-tips");
        assert_eq!((a.sort_order, b.sort_order, c.sort_order), (0, 1, 0));
        assert_eq!(c.parent_id, Some(a.id));
        assert!(a.is_active);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_on_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("blog.db").display());
        let db = DbService::new(&url, 5).await.unwrap();

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let pool = db.pool.clone();
                tokio::spawn(async move { create(&pool, new_category(&format!("Topic {i}"), None)).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let mut orders: Vec<i32> = sqlx::query_scalar("SELECT sort_order FROM categories WHERE parent_id IS NULL")
            .fetch_all(&db.pool)
            .await
            .unwrap();
        orders.sort_unstable();
        assert_eq!(orders, (0..20).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_slug_and_missing_parent() {
        let db = DbService::in_memory().await.unwrap();
        let pool = &db.pool;
        create(pool, new_category("News", None)).await.unwrap();

        let err = create(pool, new_category("news", None)).await.unwrap_err();
        assert!(matches!(err, RepoError::Business(ErrorCode::CategorySlugExists, _)));

        let err = create(pool, new_category("Orphan", Some(99))).await.unwrap_err();
        assert!(matches!(err, RepoError::Business(ErrorCode::CategoryParentInvalid, _)));

        let err = create(pool, new_category("!!!", None)).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_fields_and_reparent() {
        let db = DbService::in_memory().await.unwrap();
        let pool = &db.pool;
        let a = create(pool, new_category("A", None)).await.unwrap();
        let b = create(pool, new_category("B", None)).await.unwrap();
        let c = create(pool, new_category("C", None)).await.unwrap();

        let moved = update(
            pool,
            a.id,
            CategoryUpdate {
                name: Some("Alpha".into()),
                description: Some(Some("first".into())),
                parent_id: Some(Some(b.id)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(moved.name, "Alpha");
        assert_eq!(moved.slug, "a");
        assert_eq!(moved.description.as_deref(), Some("first"));
        assert_eq!((moved.parent_id, moved.sort_order), (Some(b.id), 0));

        assert_eq!(find_by_id(pool, b.id).await.unwrap().unwrap().sort_order, 0);
        assert_eq!(find_by_id(pool, c.id).await.unwrap().unwrap().sort_order, 1);

        let back = update(
            pool,
            a.id,
            CategoryUpdate {
                parent_id: Some(None),
                description: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!((back.parent_id, back.sort_order), (None, 2));
        assert_eq!(back.description, None);

        let err = update(
            pool,
            b.id,
            CategoryUpdate {
                slug: Some("c".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Business(ErrorCode::CategorySlugExists, _)));
    }

    #[tokio::test]
    async fn test_failed_reparent_leaves_fields_untouched() {
        let db = DbService::in_memory().await.unwrap();
        let pool = &db.pool;
        let a = create(pool, new_category("A", None)).await.unwrap();
        let child = create(pool, new_category("Child", Some(a.id))).await.unwrap();

        let err = update(
            pool,
            a.id,
            CategoryUpdate {
                name: Some("Renamed".into()),
                parent_id: Some(Some(child.id)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Business(ErrorCode::CategoryParentInvalid, _)));
        assert_eq!(find_by_id(pool, a.id).await.unwrap().unwrap().name, "A");
    }
}
