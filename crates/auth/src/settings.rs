use serde::{Deserialize, Serialize};

use leydeudo_core::SettingId;

/// A named feature/module toggle the user's access is scoped to.
///
/// Only active settings count as held; an inactive entry is carried in the
/// snapshot but never satisfies a requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    pub id: SettingId,
    pub name: String,
    pub slug: String,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub description: String,
    pub active: bool,
}

impl Setting {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        slug: impl Into<String>,
        active: bool,
    ) -> Self {
        Self {
            id: SettingId::new(id),
            name: name.into(),
            slug: slug.into(),
            description: String::new(),
            active,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Whether this entry grants the setting it names.
    pub fn is_held(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_description_reads_as_empty() {
        let setting: Setting = serde_json::from_str(
            r#"{"id": 2, "name": "Reportes", "slug": "reports", "description": null, "active": true}"#,
        )
        .unwrap();
        assert_eq!(setting.description, "");
        assert!(setting.is_held());

        let setting: Setting =
            serde_json::from_str(r#"{"id": 2, "name": "Reportes", "slug": "reports", "active": false}"#)
                .unwrap();
        assert_eq!(setting.description, "");
    }
}
