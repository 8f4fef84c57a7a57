//! Authorization snapshot: the roles, settings and permissions of the
//! signed-in user, and the primitive checks over them.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::route::{ClauseKind, RoutePermissionConfig};
use crate::{Permission, Permissions, Role, Setting};

/// Everything the evaluator knows about the current user.
///
/// The snapshot is passed explicitly to every check. It is replaced as a whole
/// on login and reset to [`AuthorizationSnapshot::empty`] on logout; callers
/// never patch individual categories in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationSnapshot {
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub settings: Vec<Setting>,
    #[serde(default)]
    pub permissions: Permissions,
}

impl AuthorizationSnapshot {
    pub fn new(roles: Vec<Role>, settings: Vec<Setting>, permissions: Permissions) -> Self {
        Self {
            roles,
            settings,
            permissions,
        }
    }

    /// Snapshot of an anonymous (or logged out) user. Every check fails.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty() && self.settings.is_empty() && self.permissions.is_empty()
    }

    // ── roles ───────────────────────────────────────────────────────────────

    pub fn has_role(&self, slug: &str) -> bool {
        self.roles.iter().any(|role| role.slug == slug)
    }

    /// False for an empty list.
    pub fn has_any_role<I, S>(&self, slugs: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        slugs.into_iter().any(|slug| self.has_role(slug.as_ref()))
    }

    /// True for an empty list.
    pub fn has_all_roles<I, S>(&self, slugs: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        slugs.into_iter().all(|slug| self.has_role(slug.as_ref()))
    }

    pub fn is_super_admin(&self) -> bool {
        self.roles.iter().any(Role::is_super_admin)
    }

    // ── settings ────────────────────────────────────────────────────────────

    /// The setting must be present *and* active.
    pub fn has_setting(&self, slug: &str) -> bool {
        self.settings
            .iter()
            .any(|setting| setting.slug == slug && setting.is_held())
    }

    pub fn has_any_setting<I, S>(&self, slugs: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        slugs.into_iter().any(|slug| self.has_setting(slug.as_ref()))
    }

    pub fn has_all_settings<I, S>(&self, slugs: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        slugs.into_iter().all(|slug| self.has_setting(slug.as_ref()))
    }

    // ── permissions ─────────────────────────────────────────────────────────

    /// True when `action` is listed under any setting's group.
    ///
    /// Super admins get no bypass here, and the owning setting's `active` flag
    /// is not consulted.
    pub fn has_permission(&self, action: &str) -> bool {
        self.permissions.contains(action)
    }

    pub fn has_any_permission<I, S>(&self, actions: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        actions
            .into_iter()
            .any(|action| self.has_permission(action.as_ref()))
    }

    pub fn has_all_permissions<I, S>(&self, actions: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        actions
            .into_iter()
            .all(|action| self.has_permission(action.as_ref()))
    }

    /// Permissions listed under one setting; empty when the group is absent.
    pub fn setting_permissions(&self, setting_slug: &str) -> &[Permission] {
        self.permissions
            .group(setting_slug)
            .map(|group| group.permissions.as_slice())
            .unwrap_or(&[])
    }

    // ── composite ───────────────────────────────────────────────────────────

    pub fn can_access_route(&self, config: &RoutePermissionConfig) -> bool {
        crate::authorize::can_access_route(self, config)
    }

    /// Primitive check for a single name of the given kind.
    pub(crate) fn holds(&self, kind: ClauseKind, name: &str) -> bool {
        match kind {
            ClauseKind::Setting => self.has_setting(name),
            ClauseKind::Permission => self.has_permission(name),
            ClauseKind::Role => self.has_role(name),
        }
    }

    // ── introspection ───────────────────────────────────────────────────────

    pub fn role_slugs(&self) -> Vec<String> {
        self.roles.iter().map(|role| role.slug.clone()).collect()
    }

    pub fn active_setting_slugs(&self) -> Vec<String> {
        self.settings
            .iter()
            .filter(|setting| setting.is_held())
            .map(|setting| setting.slug.clone())
            .collect()
    }

    /// Every held permission, deduplicated and sorted.
    pub fn effective_permissions(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self
            .permissions
            .groups()
            .flat_map(|(_, group)| group.permissions.iter().map(Permission::as_str))
            .collect();
        set.into_iter().map(str::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PermissionGroup;
    use proptest::prelude::*;

    fn admin_snapshot() -> AuthorizationSnapshot {
        AuthorizationSnapshot::new(
            vec![
                Role::new(1, "Administrador", "admin"),
                Role::new(2, "Auditor", "auditor"),
            ],
            vec![
                Setting::new(1, "Gestión de Usuarios", "user.mantenedor", true),
                Setting::new(2, "Reportes", "reports", false),
            ],
            Permissions::new()
                .with_group(
                    "user.mantenedor",
                    PermissionGroup::new("Gestión de Usuarios", ["users.view", "users.create"]),
                )
                .with_group("reports", PermissionGroup::new("Reportes", ["reports.export"])),
        )
    }

    #[test]
    fn has_role_matches_slug_only() {
        let snapshot = admin_snapshot();
        assert!(snapshot.has_role("admin"));
        assert!(!snapshot.has_role("Administrador"));
        assert!(!snapshot.has_role("super_admin"));
        assert!(!snapshot.is_super_admin());
    }

    #[test]
    fn super_admin_is_role_sugar() {
        let snapshot = AuthorizationSnapshot::new(
            vec![Role::new(1, "Super Administrador", "super_admin")],
            vec![],
            Permissions::new(),
        );
        assert!(snapshot.is_super_admin());
        assert!(snapshot.has_role("super_admin"));
    }

    #[test]
    fn quantifiers_over_empty_lists() {
        let snapshot = admin_snapshot();
        let none: [&str; 0] = [];
        assert!(!snapshot.has_any_role(none));
        assert!(snapshot.has_all_roles(none));
        assert!(!snapshot.has_any_setting(none));
        assert!(snapshot.has_all_settings(none));
        assert!(!snapshot.has_any_permission(none));
        assert!(snapshot.has_all_permissions(none));
    }

    #[test]
    fn inactive_setting_is_not_held() {
        let snapshot = admin_snapshot();
        assert!(snapshot.has_setting("user.mantenedor"));
        assert!(!snapshot.has_setting("reports"));
        assert!(!snapshot.has_all_settings(["user.mantenedor", "reports"]));
        assert!(snapshot.has_any_setting(["user.mantenedor", "reports"]));
    }

    #[test]
    fn permission_under_inactive_setting_is_still_held() {
        // "reports" is inactive, yet its permissions count. Pinned until the
        // product decides whether permissions should require an active setting.
        let snapshot = admin_snapshot();
        assert!(!snapshot.has_setting("reports"));
        assert!(snapshot.has_permission("reports.export"));
    }

    #[test]
    fn permission_lookup_is_not_namespaced() {
        let snapshot = admin_snapshot();
        assert!(snapshot.has_all_permissions(["users.view", "reports.export"]));
        assert!(!snapshot.has_permission("users.delete"));
        assert!(snapshot.has_any_permission(["users.delete", "users.create"]));
    }

    #[test]
    fn setting_permissions_returns_group_or_empty() {
        let snapshot = admin_snapshot();
        let perms: Vec<&str> = snapshot
            .setting_permissions("user.mantenedor")
            .iter()
            .map(Permission::as_str)
            .collect();
        assert_eq!(perms, vec!["users.view", "users.create"]);
        assert!(snapshot.setting_permissions("missing").is_empty());
    }

    #[test]
    fn empty_snapshot_holds_nothing() {
        let snapshot = AuthorizationSnapshot::empty();
        assert!(snapshot.is_empty());
        assert!(!snapshot.has_role("admin"));
        assert!(!snapshot.has_setting("user.mantenedor"));
        assert!(!snapshot.has_permission("users.view"));
        assert!(!snapshot.is_super_admin());
    }

    #[test]
    fn effective_permissions_are_sorted_and_unique() {
        let snapshot = AuthorizationSnapshot::new(
            vec![],
            vec![],
            Permissions::new()
                .with_group("b", PermissionGroup::new("B", ["x.write", "a.read"]))
                .with_group("a", PermissionGroup::new("A", ["a.read"])),
        );
        assert_eq!(snapshot.effective_permissions(), vec!["a.read", "x.write"]);
    }

    fn slug() -> impl Strategy<Value = String> {
        "[a-e]{1,2}"
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: has_any_role / has_all_roles are the existential and
        /// universal closures of has_role.
        #[test]
        fn role_quantifiers_follow_has_role(
            held in prop::collection::vec(slug(), 0..5),
            asked in prop::collection::vec(slug(), 0..5),
        ) {
            let roles = held
                .iter()
                .enumerate()
                .map(|(i, s)| Role::new(i as i64, s.clone(), s.clone()))
                .collect();
            let snapshot = AuthorizationSnapshot::new(roles, vec![], Permissions::new());

            for s in &held {
                prop_assert!(snapshot.has_role(s));
            }
            prop_assert_eq!(
                snapshot.has_any_role(&asked),
                asked.iter().any(|s| held.contains(s))
            );
            prop_assert_eq!(
                snapshot.has_all_roles(&asked),
                asked.iter().all(|s| held.contains(s))
            );
        }

        /// Property: a setting is held iff some entry with its slug is active.
        #[test]
        fn setting_held_iff_active(
            entries in prop::collection::vec((slug(), any::<bool>()), 0..5),
            asked in slug(),
        ) {
            let settings = entries
                .iter()
                .enumerate()
                .map(|(i, (s, active))| Setting::new(i as i64, s.clone(), s.clone(), *active))
                .collect();
            let snapshot = AuthorizationSnapshot::new(vec![], settings, Permissions::new());

            let expected = entries.iter().any(|(s, active)| *s == asked && *active);
            prop_assert_eq!(snapshot.has_setting(&asked), expected);
        }
    }
}
