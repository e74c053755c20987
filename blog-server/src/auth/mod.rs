//! 认证与授权
//!
//! - [`JwtService`] - 令牌签发与验证
//! - [`CurrentUser`] - 已认证用户上下文
//! - [`PermissionChecker`] - 角色 → 资源 → 操作 查询与路由访问判定
//! - [`require_auth`] - 认证中间件
//! - [`require_permission`] - 权限中间件

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod permissions;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_auth, require_permission};
pub use permissions::{NavItem, Permission, PermissionChecker, RolePermissions};
