//! Sibling-order payloads shared by categories and menus

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult, ErrorCode};

/// Reorder request item as submitted by the dashboard
///
/// Both fields are optional on the wire so a missing one is reported as a
/// validation error naming the field rather than a generic parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderEntry {
    #[serde(alias = "categoryId", alias = "itemId")]
    pub id: Option<i64>,
    pub new_order: Option<i32>,
}

/// Body of `POST .../reorder`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    #[serde(default)]
    pub reorder_data: Option<Vec<ReorderEntry>>,
}

/// A validated reorder instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderItem {
    pub id: i64,
    pub new_order: i32,
}

impl ReorderRequest {
    /// Validate the submitted entries before anything touches the database.
    ///
    /// `id_field` is the wire name reported back when the id is missing
    /// (`categoryId`, `itemId`).
    pub fn into_items(self, id_field: &str) -> AppResult<Vec<ReorderItem>> {
        let entries = self
            .reorder_data
            .ok_or_else(|| AppError::required_field("reorderData"))?;
        if entries.is_empty() {
            return Err(AppError::validation("reorderData must not be empty"));
        }

        let mut seen = HashSet::with_capacity(entries.len());
        entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let id = entry
                    .id
                    .ok_or_else(|| AppError::required_field(id_field).with_detail("index", index))?;
                let new_order = entry.new_order.ok_or_else(|| {
                    AppError::required_field("newOrder").with_detail("index", index)
                })?;
                if new_order < 0 {
                    return Err(AppError::with_message(
                        ErrorCode::ValueOutOfRange,
                        format!("newOrder must not be negative (got {new_order})"),
                    )
                    .with_detail("index", index));
                }
                if !seen.insert(id) {
                    return Err(AppError::validation(format!("Duplicate {id_field} {id}"))
                        .with_detail("index", index));
                }
                Ok(ReorderItem { id, new_order })
            })
            .collect()
    }
}
