//! Permission-aware navigation menus.

use serde::{Deserialize, Serialize};

use crate::{AuthorizationSnapshot, RoutePermissionConfig};

/// One navigation entry, optionally with a submenu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    pub title: String,
    pub path: String,
    /// Icon name, resolved by the rendering layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    /// Entries without a config are always visible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<RoutePermissionConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavItem>,
}

impl NavItem {
    pub fn new(title: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
            icon: None,
            info: None,
            permissions: None,
            children: Vec::new(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_permissions(mut self, config: RoutePermissionConfig) -> Self {
        self.permissions = Some(config);
        self
    }

    pub fn with_children(mut self, children: Vec<NavItem>) -> Self {
        self.children = children;
        self
    }

    /// Whether this entry alone (ignoring children) is accessible.
    pub fn is_accessible(&self, snapshot: &AuthorizationSnapshot) -> bool {
        self.permissions
            .as_ref()
            .is_none_or(|config| snapshot.can_access_route(config))
    }
}

/// Menu entries the snapshot may see, with submenus pruned recursively.
///
/// An entry with a config and a submenu is shown only when it is itself
/// accessible and at least one child survives. Entries without a config are
/// always shown.
pub fn filter_nav_items(items: &[NavItem], snapshot: &AuthorizationSnapshot) -> Vec<NavItem> {
    items
        .iter()
        .filter_map(|item| {
            let children = filter_nav_items(&item.children, snapshot);

            let visible = match &item.permissions {
                None => true,
                Some(config) => {
                    let accessible = snapshot.can_access_route(config);
                    if item.children.is_empty() {
                        accessible
                    } else {
                        accessible && !children.is_empty()
                    }
                }
            };

            visible.then(|| NavItem {
                children,
                ..item.clone()
            })
        })
        .collect()
}

/// Whether the entry registered for `path` is accessible.
///
/// Submenus are searched depth-first. Unknown paths are not accessible.
pub fn can_access_path(path: &str, items: &[NavItem], snapshot: &AuthorizationSnapshot) -> bool {
    match find_by_path(items, path) {
        Some(item) => item.is_accessible(snapshot),
        None => false,
    }
}

fn find_by_path<'a>(items: &'a [NavItem], path: &str) -> Option<&'a NavItem> {
    items.iter().find_map(|item| {
        if item.path == path {
            Some(item)
        } else {
            find_by_path(&item.children, path)
        }
    })
}

/// Default dashboard menu.
pub fn dashboard_nav() -> Vec<NavItem> {
    vec![
        NavItem::new("Dashboard", "/").with_icon("ic-analytics"),
        NavItem::new("Gestión de Usuarios", "/user")
            .with_icon("ic-user")
            .with_permissions(
                RoutePermissionConfig::new()
                    .with_setting("user.mantenedor")
                    .with_permission("users.view"),
            ),
    ]
}

/// Entries shown regardless of authentication.
pub fn public_nav() -> Vec<NavItem> {
    vec![
        NavItem::new("Sign in", "/sign-in")
            .with_icon("ic-lock")
            .with_permissions(RoutePermissionConfig::public()),
    ]
}
