//! Request extractors and listing shapes shared by the handlers

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared::tree::{self, TreeItem};

use crate::utils::{AppError, AppResult};

/// JSON body extractor whose rejections use the API error envelope (400)
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::invalid(rejection.body_text())),
        }
    }
}

/// `?format=hierarchy|flat`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormatQuery {
    pub format: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeFormat {
    Hierarchy,
    Flat,
}

impl FormatQuery {
    /// Defaults to hierarchy
    pub fn parse(&self) -> AppResult<TreeFormat> {
        match self.format.as_deref().map(str::trim) {
            None | Some("") | Some("hierarchy") => Ok(TreeFormat::Hierarchy),
            Some("flat") => Ok(TreeFormat::Flat),
            Some(other) => Err(AppError::validation(format!(
                "Unknown format '{other}', expected 'hierarchy' or 'flat'"
            ))
            .with_detail("field", "format")),
        }
    }
}

/// Tree listing in the requested format
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum TreeListing<T> {
    Hierarchy(Vec<TreeItem<T>>),
    Flat(Vec<T>),
}

impl<T> TreeListing<T> {
    pub fn new(items: Vec<TreeItem<T>>, format: TreeFormat) -> Self {
        match format {
            TreeFormat::Hierarchy => Self::Hierarchy(items),
            TreeFormat::Flat => Self::Flat(tree::flatten(items)),
        }
    }
}

/// Number of rows rewritten by a reorder or reset
#[derive(Debug, Clone, Copy, Serialize)]
pub struct UpdatedCount {
    pub updated: usize,
}
