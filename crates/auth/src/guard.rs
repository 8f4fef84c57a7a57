//! Render-or-redirect decisions for protected routes.

use crate::{AuthorizationSnapshot, RoutePermissionConfig};

pub const SIGN_IN_PATH: &str = "/sign-in";
pub const NOT_FOUND_PATH: &str = "/404";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render the route.
    Allow,
    /// Session state is still being restored; render a placeholder.
    Loading,
    /// Replace the current location with this path.
    Redirect(&'static str),
}

impl RouteDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RouteDecision::Allow)
    }
}

/// Gate for routes that need any signed-in user.
pub fn guard_protected(loading: bool, authenticated: bool) -> RouteDecision {
    if loading {
        RouteDecision::Loading
    } else if !authenticated {
        RouteDecision::Redirect(SIGN_IN_PATH)
    } else {
        RouteDecision::Allow
    }
}

/// Gate for routes carrying a permission config. Routes without one are
/// always rendered; inaccessible ones redirect to the not-found page.
pub fn guard_permission(
    snapshot: &AuthorizationSnapshot,
    config: Option<&RoutePermissionConfig>,
) -> RouteDecision {
    match config {
        None => RouteDecision::Allow,
        Some(config) if snapshot.can_access_route(config) => RouteDecision::Allow,
        Some(_) => RouteDecision::Redirect(NOT_FOUND_PATH),
    }
}
