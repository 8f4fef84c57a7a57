use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Fine-grained action identifier (e.g. "users.create").
///
/// Permissions are opaque strings; there is no wildcard. Holding a permission
/// means it appears in some group of the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Permission {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Permission {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Actions available under one setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGroup {
    pub setting_name: String,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl PermissionGroup {
    pub fn new<I, P>(setting_name: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        Self {
            setting_name: setting_name.into(),
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, action: &str) -> bool {
        self.permissions.iter().any(|p| p.as_str() == action)
    }
}

/// Permission groups keyed by setting slug.
///
/// Serialized as a plain JSON object (`{"user.mantenedor": {...}}`), matching
/// the login response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permissions(BTreeMap<String, PermissionGroup>);

impl Permissions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(mut self, setting_slug: impl Into<String>, group: PermissionGroup) -> Self {
        self.insert(setting_slug, group);
        self
    }

    pub fn insert(&mut self, setting_slug: impl Into<String>, group: PermissionGroup) {
        self.0.insert(setting_slug.into(), group);
    }

    pub fn group(&self, setting_slug: &str) -> Option<&PermissionGroup> {
        self.0.get(setting_slug)
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &PermissionGroup)> {
        self.0.iter().map(|(slug, group)| (slug.as_str(), group))
    }

    /// True when `action` appears in any group.
    ///
    /// Lookup is not namespaced by setting and does not consult whether the
    /// owning setting is active.
    pub fn contains(&self, action: &str) -> bool {
        self.0.values().any(|group| group.contains(action))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<(String, PermissionGroup)> for Permissions {
    fn from_iter<T: IntoIterator<Item = (String, PermissionGroup)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_login_response_shape() {
        let json = r#"{
            "user.mantenedor": {
                "setting_name": "Gestión de Usuarios",
                "permissions": ["users.view", "users.create"]
            }
        }"#;

        let perms: Permissions = serde_json::from_str(json).unwrap();
        let group = perms.group("user.mantenedor").unwrap();
        assert_eq!(group.setting_name, "Gestión de Usuarios");
        assert!(group.contains("users.create"));
        assert!(perms.contains("users.view"));
        assert!(!perms.contains("users.delete"));
    }

    #[test]
    fn lookup_spans_every_group() {
        let perms = Permissions::new()
            .with_group("a", PermissionGroup::new("A", ["a.read"]))
            .with_group("b", PermissionGroup::new("B", ["b.write"]));

        assert!(perms.contains("a.read"));
        assert!(perms.contains("b.write"));
        assert_eq!(perms.len(), 2);
    }
}
