//! Shared types for the blog backend
//!
//! Common types used by the server and its clients: error codes and response
//! envelopes, domain models, and the pure tree-ordering helpers.

pub mod error;
pub mod models;
pub mod tree;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
