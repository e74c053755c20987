//! Category Model

use serde::{Deserialize, Serialize};

use crate::tree::TreeNode;

/// Category entity (hierarchical, ordered within its sibling group)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    /// URL slug, unique across all categories
    pub slug: String,
    pub description: Option<String>,
    /// `None` = root category
    pub parent_id: Option<i64>,
    /// Position within the sibling group (`0..N-1`)
    #[serde(rename = "order")]
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl TreeNode for Category {
    fn id(&self) -> i64 {
        self.id
    }

    fn parent_id(&self) -> Option<i64> {
        self.parent_id
    }

    fn sort_order(&self) -> i32 {
        self.sort_order
    }

    fn created_at(&self) -> i64 {
        self.created_at
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}

/// Create category payload
///
/// `slug` defaults to a slugified `name`. The order is always assigned by the
/// server (appended to the end of the sibling group).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCreate {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<i64>,
    pub is_active: Option<bool>,
}

/// Update category payload
///
/// `parentId` distinguishes "absent" (keep parent) from `null` (move to root).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "crate::util::double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::util::double_option")]
    pub parent_id: Option<Option<i64>>,
    pub is_active: Option<bool>,
}
