//! Menu Models
//!
//! Header menu items form a tree (dropdowns); footer items are flat and grouped
//! by section.

use serde::{Deserialize, Serialize};

use crate::tree::TreeNode;

/// Header navigation item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct HeaderMenuItem {
    pub id: i64,
    pub label: String,
    pub href: String,
    pub parent_id: Option<i64>,
    #[serde(rename = "order")]
    pub sort_order: i32,
    pub is_active: bool,
    pub open_in_new_tab: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl TreeNode for HeaderMenuItem {
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

/// Create header menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderMenuItemCreate {
    pub label: String,
    pub href: String,
    pub parent_id: Option<i64>,
    pub is_active: Option<bool>,
    pub open_in_new_tab: Option<bool>,
}

/// Update header menu item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderMenuItemUpdate {
    pub label: Option<String>,
    pub href: Option<String>,
    #[serde(default, deserialize_with = "crate::util::double_option")]
    pub parent_id: Option<Option<i64>>,
    pub is_active: Option<bool>,
    pub open_in_new_tab: Option<bool>,
}

/// Footer link, ordered within its section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct FooterMenuItem {
    pub id: i64,
    pub section: String,
    pub label: String,
    pub href: String,
    #[serde(rename = "order")]
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: i64,
}

/// One entry of a full footer replacement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FooterMenuItemInput {
    pub section: String,
    pub label: String,
    pub href: String,
    pub is_active: Option<bool>,
}
