use serde::{Deserialize, Serialize};

use leydeudo_core::RoleId;

/// Slug of the role whose holders are forgiven failed role requirements.
pub const SUPER_ADMIN: &str = "super_admin";

/// Role granted to a user by the backend.
///
/// The `slug` is the stable comparison key; `name` is display text and may be
/// localised or renamed without affecting authorization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub slug: String,
}

impl Role {
    pub fn new(id: i64, name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: RoleId::new(id),
            name: name.into(),
            slug: slug.into(),
        }
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn is_super_admin(&self) -> bool {
        self.slug == SUPER_ADMIN
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.slug)
    }
}
