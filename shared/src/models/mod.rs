//! Data models
//!
//! Shared between blog-server and the dashboard frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY). Wire format is camelCase.

pub mod category;
pub mod menu;
pub mod ordering;
pub mod role;
pub mod user;

// Re-exports
pub use category::*;
pub use menu::*;
pub use ordering::*;
pub use role::*;
pub use user::*;
