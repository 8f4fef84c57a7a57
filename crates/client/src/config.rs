//! Client configuration (environment-driven, with development defaults).

use std::time::Duration;

use leydeudo_auth::{KeyValueStore, SnapshotStore};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_API_TIMEOUT: Duration = Duration::from_millis(30_000);
pub const DEFAULT_STORAGE_PREFIX: &str = "leydeudo_";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub app_name: String,
    pub app_version: String,
    pub api_base_url: String,
    pub api_timeout: Duration,
    /// Prefix applied to every persisted session key.
    pub storage_prefix: String,
    pub env: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            app_name: "LeyDeudo".to_string(),
            app_version: "1.0.0".to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_timeout: DEFAULT_API_TIMEOUT,
            storage_prefix: DEFAULT_STORAGE_PREFIX.to_string(),
            env: "development".to_string(),
        }
    }
}

impl ClientConfig {
    /// Read `LEYDEUDO_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source. Unset or empty
    /// variables keep their default; an unparsable timeout is logged and
    /// ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = var("LEYDEUDO_APP_NAME") {
            config.app_name = value;
        }
        if let Some(value) = var("LEYDEUDO_APP_VERSION") {
            config.app_version = value;
        }
        if let Some(value) = var("LEYDEUDO_API_BASE_URL") {
            config.api_base_url = value;
        }
        if let Some(value) = var("LEYDEUDO_API_TIMEOUT_MS") {
            match value.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => config.api_timeout = Duration::from_millis(ms),
                _ => tracing::warn!(
                    value = %value,
                    "LEYDEUDO_API_TIMEOUT_MS is not a positive integer; using default"
                ),
            }
        }
        if let Some(value) = lookup("LEYDEUDO_STORAGE_PREFIX") {
            config.storage_prefix = value;
        }
        if let Some(value) = var("LEYDEUDO_ENV") {
            config.env = value;
        }

        config
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.api_timeout = timeout;
        self
    }

    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }

    /// Snapshot store over `store`, namespaced with the configured prefix.
    pub fn snapshot_store<S: KeyValueStore>(&self, store: S) -> SnapshotStore<S> {
        SnapshotStore::new(store).with_prefix(&self.storage_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = ClientConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.api_timeout, Duration::from_secs(30));
        assert!(!config.is_production());
    }

    #[test]
    fn reads_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("LEYDEUDO_API_BASE_URL", "https://api.example.com"),
            ("LEYDEUDO_API_TIMEOUT_MS", "1500"),
            ("LEYDEUDO_STORAGE_PREFIX", ""),
            ("LEYDEUDO_ENV", "production"),
        ]));
        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.api_timeout, Duration::from_millis(1500));
        assert_eq!(config.storage_prefix, "");
        assert!(config.is_production());
    }

    #[test]
    fn bad_timeout_keeps_default() {
        let config = ClientConfig::from_lookup(lookup(&[("LEYDEUDO_API_TIMEOUT_MS", "soon")]));
        assert_eq!(config.api_timeout, DEFAULT_API_TIMEOUT);

        let config = ClientConfig::from_lookup(lookup(&[("LEYDEUDO_API_TIMEOUT_MS", "0")]));
        assert_eq!(config.api_timeout, DEFAULT_API_TIMEOUT);
    }

    #[test]
    fn snapshot_store_uses_prefix() {
        let config = ClientConfig::default();
        let store = config.snapshot_store(leydeudo_auth::MemoryStore::new());
        assert_eq!(store.key("auth_roles"), "leydeudo_auth_roles");
    }
}
