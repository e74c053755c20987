//! 权限定义
//!
//! 静态 RBAC 表: 角色 → 资源 → 允许的操作。
//!
//! ## 规则
//! - 权限表是数据而不是分支代码，每次判定都是一次查表
//! - 缺失或未知的角色没有任何权限
//! - 每个管理后台路由对应一个 (resource, action)；不在
//!   [`ROUTE_PERMISSIONS`] 中的路由对所有角色放行 (fail-open)，
//!   新的受保护页面必须在这里登记

use serde::Serialize;
use shared::models::{Action, Role};

/// Allowed actions on one resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Permission {
    pub resource: &'static str,
    pub actions: &'static [Action],
}

/// Everything one role may do, plus its human-readable description
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RolePermissions {
    pub role: Role,
    pub description: &'static str,
    pub permissions: &'static [Permission],
}

const CRUD: &[Action] = &[Action::Create, Action::Read, Action::Update, Action::Delete];
const READ_UPDATE: &[Action] = &[Action::Read, Action::Update];

/// Resources that appear in the table
pub const RESOURCES: &[&str] = &[
    "posts",
    "categories",
    "tags",
    "media",
    "users",
    "settings",
    "menus",
    "profile",
];

const AUTHOR_PERMISSIONS: &[Permission] = &[
    Permission { resource: "posts", actions: CRUD },
    Permission { resource: "profile", actions: READ_UPDATE },
];

const EDITOR_PERMISSIONS: &[Permission] = &[
    Permission { resource: "posts", actions: CRUD },
    Permission { resource: "categories", actions: CRUD },
    Permission { resource: "tags", actions: CRUD },
    Permission { resource: "media", actions: CRUD },
    Permission { resource: "profile", actions: READ_UPDATE },
];

const ADMIN_PERMISSIONS: &[Permission] = &[
    Permission { resource: "posts", actions: CRUD },
    Permission { resource: "categories", actions: CRUD },
    Permission { resource: "tags", actions: CRUD },
    Permission { resource: "media", actions: CRUD },
    Permission { resource: "users", actions: CRUD },
    Permission { resource: "settings", actions: READ_UPDATE },
    Permission { resource: "menus", actions: CRUD },
    Permission { resource: "profile", actions: READ_UPDATE },
];

/// The role table
pub const ROLE_PERMISSIONS: &[RolePermissions] = &[
    RolePermissions {
        role: Role::Author,
        description: "Can create and manage own posts",
        permissions: AUTHOR_PERMISSIONS,
    },
    RolePermissions {
        role: Role::Editor,
        description: "Manages content: posts, categories, tags and media",
        permissions: EDITOR_PERMISSIONS,
    },
    RolePermissions {
        role: Role::Admin,
        description: "Full access, including users, menus and site settings",
        permissions: ADMIN_PERMISSIONS,
    },
];

/// Look up the table entry for a role
pub fn role_permissions(role: Role) -> Option<&'static RolePermissions> {
    ROLE_PERMISSIONS.iter().find(|entry| entry.role == role)
}

/// A dashboard route guarded by one (resource, action) pair.
///
/// `*` in a pattern matches exactly one path segment.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RouteRule {
    pub pattern: &'static str,
    pub resource: &'static str,
    pub action: Action,
}

/// Dashboard route table. `/dashboard` itself is deliberately absent.
pub const ROUTE_PERMISSIONS: &[RouteRule] = &[
    RouteRule { pattern: "/dashboard/posts", resource: "posts", action: Action::Read },
    RouteRule { pattern: "/dashboard/posts/new", resource: "posts", action: Action::Create },
    RouteRule { pattern: "/dashboard/posts/*/edit", resource: "posts", action: Action::Update },
    RouteRule { pattern: "/dashboard/categories", resource: "categories", action: Action::Read },
    RouteRule { pattern: "/dashboard/tags", resource: "tags", action: Action::Read },
    RouteRule { pattern: "/dashboard/media", resource: "media", action: Action::Read },
    RouteRule { pattern: "/dashboard/users", resource: "users", action: Action::Read },
    RouteRule { pattern: "/dashboard/users/new", resource: "users", action: Action::Create },
    RouteRule { pattern: "/dashboard/settings", resource: "settings", action: Action::Read },
    RouteRule { pattern: "/dashboard/menus", resource: "menus", action: Action::Read },
    RouteRule { pattern: "/dashboard/profile", resource: "profile", action: Action::Read },
];

/// 管理后台侧边栏条目
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub label: &'static str,
    pub href: &'static str,
}

/// 按显示顺序排列的侧边栏条目
pub const DASHBOARD_NAVIGATION: &[NavItem] = &[
    NavItem { label: "Overview", href: "/dashboard" },
    NavItem { label: "Posts", href: "/dashboard/posts" },
    NavItem { label: "Categories", href: "/dashboard/categories" },
    NavItem { label: "Tags", href: "/dashboard/tags" },
    NavItem { label: "Media", href: "/dashboard/media" },
    NavItem { label: "Menus", href: "/dashboard/menus" },
    NavItem { label: "Users", href: "/dashboard/users" },
    NavItem { label: "Settings", href: "/dashboard/settings" },
    NavItem { label: "Profile", href: "/dashboard/profile" },
];

/// Drop query string, fragment and trailing slashes.
fn normalize_route(route: &str) -> &str {
    let path = route.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

fn route_matches(pattern: &str, route: &str) -> bool {
    let mut pattern_segments = pattern.split('/');
    let mut route_segments = route.split('/');
    loop {
        match (pattern_segments.next(), route_segments.next()) {
            (None, None) => return true,
            (Some("*"), Some(segment)) if !segment.is_empty() => {}
            (Some(p), Some(r)) if p == r => {}
            _ => return false,
        }
    }
}

/// The rule guarding `route`, if any
pub fn route_rule(route: &str) -> Option<&'static RouteRule> {
    let route = normalize_route(route);
    ROUTE_PERMISSIONS
        .iter()
        .find(|rule| route_matches(rule.pattern, route))
}

/// 单个角色的权限查询
///
/// Cheap to build per request; holds no data beyond the role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionChecker {
    role: Option<Role>,
}

impl PermissionChecker {
    pub fn new(role: Option<Role>) -> Self {
        Self { role }
    }

    /// Build from the stored role string. Unknown strings yield a checker
    /// that allows nothing.
    pub fn from_role_str(role: &str) -> Self {
        Self::new(Role::parse(role))
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// Whether the role may perform `action` on `resource`
    pub fn has_permission(&self, resource: &str, action: &str) -> bool {
        Action::parse(action).is_some_and(|action| self.can(resource, action))
    }

    /// Typed form of [`has_permission`](Self::has_permission)
    pub fn can(&self, resource: &str, action: Action) -> bool {
        self.user_permissions()
            .iter()
            .find(|p| p.resource == resource)
            .is_some_and(|p| p.actions.contains(&action))
    }

    /// Whether the role may open a dashboard route. Unmapped routes are allowed.
    pub fn can_access_route(&self, route: &str) -> bool {
        match route_rule(route) {
            Some(rule) => self.can(rule.resource, rule.action),
            None => true,
        }
    }

    /// The full permission list of the role (empty for no role)
    pub fn user_permissions(&self) -> &'static [Permission] {
        self.role
            .and_then(role_permissions)
            .map(|entry| entry.permissions)
            .unwrap_or_default()
    }

    /// Human-readable role description (empty for no role)
    pub fn role_description(&self) -> &'static str {
        self.role
            .and_then(role_permissions)
            .map(|entry| entry.description)
            .unwrap_or_default()
    }

    /// Sidebar entries whose route the role can open
    pub fn visible_navigation(&self) -> Vec<&'static NavItem> {
        if self.role.is_none() {
            return Vec::new();
        }
        DASHBOARD_NAVIGATION
            .iter()
            .filter(|item| self.can_access_route(item.href))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ACTIONS: [Action; 5] = [
        Action::Create,
        Action::Read,
        Action::Update,
        Action::Delete,
        Action::Upload,
    ];

    fn checker(role: Role) -> PermissionChecker {
        PermissionChecker::new(Some(role))
    }

    #[test]
    fn test_table_has_one_entry_per_resource_and_no_empty_actions() {
        for entry in ROLE_PERMISSIONS {
            let mut seen = std::collections::HashSet::new();
            for p in entry.permissions {
                assert!(seen.insert(p.resource), "{} duplicated for {}", p.resource, entry.role);
                assert!(!p.actions.is_empty());
                assert!(RESOURCES.contains(&p.resource));
            }
        }
        assert_eq!(ROLE_PERMISSIONS.len(), Role::ALL.len());
    }

    #[test]
    fn test_pairs_outside_table_are_denied() {
        let mut resources: Vec<&str> = RESOURCES.to_vec();
        resources.extend(["comments", "", "POSTS"]);

        for role in Role::ALL {
            let table = role_permissions(role).unwrap().permissions;
            let checker = checker(role);
            for resource in &resources {
                for action in ALL_ACTIONS {
                    let in_table = table
                        .iter()
                        .any(|p| p.resource == *resource && p.actions.contains(&action));
                    assert_eq!(checker.can(resource, action), in_table, "{role} {resource}:{action}");
                    assert_eq!(checker.has_permission(resource, action.as_str()), in_table);
                }
                assert!(!checker.has_permission(resource, "publish"));
                assert!(!checker.has_permission(resource, "READ"));
            }
        }
    }

    #[test]
    fn test_categories_read_by_role() {
        assert!(!checker(Role::Author).has_permission("categories", "read"));
        assert!(checker(Role::Editor).has_permission("categories", "read"));
        assert!(checker(Role::Admin).has_permission("categories", "read"));
    }

    #[test]
    fn test_exact_policy() {
        let author = checker(Role::Author);
        assert!(author.has_permission("posts", "delete"));
        assert!(author.has_permission("profile", "update"));
        assert!(!author.has_permission("profile", "delete"));
        assert!(!author.has_permission("tags", "read"));

        let editor = checker(Role::Editor);
        assert!(editor.has_permission("media", "create"));
        assert!(!editor.has_permission("users", "read"));
        assert!(!editor.has_permission("menus", "read"));
        assert!(!editor.has_permission("settings", "read"));

        let admin = checker(Role::Admin);
        assert!(admin.has_permission("settings", "update"));
        assert!(!admin.has_permission("settings", "delete"));
        assert!(admin.has_permission("menus", "delete"));
        assert!(admin.has_permission("users", "create"));
        assert!(!admin.has_permission("media", "upload"));
    }

    #[test]
    fn test_settings_route_admin_only() {
        assert!(!checker(Role::Author).can_access_route("/dashboard/settings"));
        assert!(!checker(Role::Editor).can_access_route("/dashboard/settings"));
        assert!(checker(Role::Admin).can_access_route("/dashboard/settings"));
    }

    #[test]
    fn test_unmapped_route_is_allowed_for_every_role() {
        for role in Role::ALL {
            assert!(checker(role).can_access_route("/some/unmapped/route"));
            assert!(checker(role).can_access_route("/dashboard"));
        }
        assert!(PermissionChecker::new(None).can_access_route("/some/unmapped/route"));
    }

    #[test]
    fn test_route_matching() {
        let author = checker(Role::Author);
        assert!(author.can_access_route("/dashboard/posts/17/edit"));
        assert!(author.can_access_route("/dashboard/posts/new/"));
        assert!(!author.can_access_route("/dashboard/categories?page=2"));
        assert!(!author.can_access_route("/dashboard/users/"));

        assert_eq!(
            route_rule("/dashboard/posts/17/edit").map(|r| r.action),
            Some(Action::Update)
        );
        assert!(route_rule("/dashboard/posts//edit").is_none());
        assert!(route_rule("/dashboard/posts/17/edit/extra").is_none());
    }

    #[test]
    fn test_missing_role_is_denied_everything() {
        for checker in [
            PermissionChecker::new(None),
            PermissionChecker::from_role_str("SUPERUSER"),
            PermissionChecker::from_role_str(""),
        ] {
            assert!(checker.role().is_none());
            assert!(!checker.has_permission("posts", "read"));
            assert!(!checker.can_access_route("/dashboard/posts"));
            assert!(checker.user_permissions().is_empty());
            assert_eq!(checker.role_description(), "");
            assert!(checker.visible_navigation().is_empty());
        }
    }

    #[test]
    fn test_descriptions_and_permission_lists() {
        assert_eq!(
            checker(Role::Author).role_description(),
            "Can create and manage own posts"
        );
        assert!(!checker(Role::Editor).role_description().is_empty());
        assert_eq!(checker(Role::Author).user_permissions().len(), 2);
        assert_eq!(checker(Role::Editor).user_permissions().len(), 5);
        assert_eq!(checker(Role::Admin).user_permissions().len(), 8);
    }

    #[test]
    fn test_visible_navigation() {
        let labels = |role| -> Vec<&str> {
            checker(role)
                .visible_navigation()
                .into_iter()
                .map(|item| item.label)
                .collect()
        };
        assert_eq!(labels(Role::Author), vec!["Overview", "Posts", "Profile"]);
        assert_eq!(
            labels(Role::Editor),
            vec!["Overview", "Posts", "Categories", "Tags", "Media", "Profile"]
        );
        assert_eq!(labels(Role::Admin).len(), DASHBOARD_NAVIGATION.len());
    }

    #[test]
    fn test_role_parsing_is_lenient_on_case() {
        assert_eq!(PermissionChecker::from_role_str("editor").role(), Some(Role::Editor));
        assert_eq!(PermissionChecker::from_role_str(" ADMIN ").role(), Some(Role::Admin));
    }
}
