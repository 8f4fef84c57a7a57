//! Declarative route requirements.

use serde::{Deserialize, Serialize};

/// Category a requirement clause checks against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClauseKind {
    Setting,
    Permission,
    Role,
}

/// How the names in a clause are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantifier {
    /// Exactly one name, which must be held.
    One,
    /// At least one of the names must be held (false for an empty list).
    Any,
    /// Every name must be held (true for an empty list).
    All,
}

/// One specified requirement of a [`RoutePermissionConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clause<'a> {
    pub kind: ClauseKind,
    pub quantifier: Quantifier,
    pub required: &'a [String],
}

impl Clause<'_> {
    /// Evaluate this clause with `holds` as the per-name check.
    pub fn evaluate(&self, mut holds: impl FnMut(&str) -> bool) -> bool {
        match self.quantifier {
            Quantifier::One | Quantifier::All => self.required.iter().all(|name| holds(name)),
            Quantifier::Any => self.required.iter().any(|name| holds(name)),
        }
    }
}

/// Access requirement attached to a route or navigation entry.
///
/// Every field is optional; an all-default config places no requirement.
/// The JSON shape uses camelCase keys (`requireRole`, `requireAnySetting`,
/// `isPublic`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoutePermissionConfig {
    /// Reachable without authentication; short-circuits every other clause.
    #[serde(skip_serializing_if = "is_false", deserialize_with = "crate::de::null_as_default")]
    pub is_public: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_any_role: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_all_roles: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_setting: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_any_setting: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_all_settings: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_permission: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_any_permission: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_all_permissions: Option<Vec<String>>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn to_strings<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}

impl RoutePermissionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn public() -> Self {
        Self {
            is_public: true,
            ..Self::default()
        }
    }

    pub fn with_role(mut self, slug: impl Into<String>) -> Self {
        self.require_role = Some(slug.into());
        self
    }

    pub fn with_any_role<I, S>(mut self, slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.require_any_role = Some(to_strings(slugs));
        self
    }

    pub fn with_all_roles<I, S>(mut self, slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.require_all_roles = Some(to_strings(slugs));
        self
    }

    pub fn with_setting(mut self, slug: impl Into<String>) -> Self {
        self.require_setting = Some(slug.into());
        self
    }

    pub fn with_any_setting<I, S>(mut self, slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.require_any_setting = Some(to_strings(slugs));
        self
    }

    pub fn with_all_settings<I, S>(mut self, slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.require_all_settings = Some(to_strings(slugs));
        self
    }

    pub fn with_permission(mut self, action: impl Into<String>) -> Self {
        self.require_permission = Some(action.into());
        self
    }

    pub fn with_any_permission<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.require_any_permission = Some(to_strings(actions));
        self
    }

    pub fn with_all_permissions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.require_all_permissions = Some(to_strings(actions));
        self
    }

    /// True when no requirement is specified (public or not).
    pub fn is_unrestricted(&self) -> bool {
        [ClauseKind::Setting, ClauseKind::Permission, ClauseKind::Role]
            .into_iter()
            .all(|kind| self.clauses(kind).next().is_none())
    }

    /// Specified clauses of one kind, in single → any → all order.
    ///
    /// An empty single-name requirement counts as unspecified; empty lists
    /// are still clauses.
    pub fn clauses(&self, kind: ClauseKind) -> impl Iterator<Item = Clause<'_>> + '_ {
        let (one, any, all) = match kind {
            ClauseKind::Setting => (
                &self.require_setting,
                &self.require_any_setting,
                &self.require_all_settings,
            ),
            ClauseKind::Permission => (
                &self.require_permission,
                &self.require_any_permission,
                &self.require_all_permissions,
            ),
            ClauseKind::Role => (
                &self.require_role,
                &self.require_any_role,
                &self.require_all_roles,
            ),
        };

        let one = one.as_ref().filter(|name| !name.is_empty()).map(|name| Clause {
            kind,
            quantifier: Quantifier::One,
            required: std::slice::from_ref(name),
        });
        let any = any.as_deref().map(|names| Clause {
            kind,
            quantifier: Quantifier::Any,
            required: names,
        });
        let all = all.as_deref().map(|names| Clause {
            kind,
            quantifier: Quantifier::All,
            required: names,
        });

        one.into_iter().chain(any).chain(all)
    }
}
