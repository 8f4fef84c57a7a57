//! Persistence of the authorization snapshot in a key-value surface.
//!
//! The snapshot is kept as three independently keyed JSON blobs. Writes and
//! removals always touch all three keys; reads degrade to empty defaults on
//! missing or malformed data and never fail.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::{AuthorizationSnapshot, Permissions, Role, Setting};

pub const KEY_ROLES: &str = "auth_roles";
pub const KEY_SETTINGS: &str = "auth_settings";
pub const KEY_PERMISSIONS: &str = "auth_permissions";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage quota exceeded for key '{0}'")]
    QuotaExceeded(String),

    #[error("failed to encode value for key '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Synchronous string key-value surface (browser local storage, a file,
/// an in-memory map).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-process key-value store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Reads and writes the snapshot under a fixed set of keys.
#[derive(Debug, Clone)]
pub struct SnapshotStore<S> {
    store: S,
    prefix: String,
}

impl<S: KeyValueStore> SnapshotStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            prefix: String::new(),
        }
    }

    /// Namespace every key (e.g. `leydeudo_auth_roles`).
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn key(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    pub fn load_roles(&self) -> Vec<Role> {
        self.read_or_default(KEY_ROLES)
    }

    pub fn load_settings(&self) -> Vec<Setting> {
        self.read_or_default(KEY_SETTINGS)
    }

    pub fn load_permissions(&self) -> Permissions {
        self.read_or_default(KEY_PERMISSIONS)
    }

    /// Load the whole snapshot; each category degrades independently.
    pub fn load(&self) -> AuthorizationSnapshot {
        AuthorizationSnapshot::new(
            self.load_roles(),
            self.load_settings(),
            self.load_permissions(),
        )
    }

    /// Write all three categories.
    ///
    /// Every value is encoded before anything is written, so an encoding
    /// failure leaves the store untouched.
    pub fn save(&mut self, snapshot: &AuthorizationSnapshot) -> Result<(), StoreError> {
        let roles = encode(KEY_ROLES, &snapshot.roles)?;
        let settings = encode(KEY_SETTINGS, &snapshot.settings)?;
        let permissions = encode(KEY_PERMISSIONS, &snapshot.permissions)?;

        self.write(KEY_ROLES, roles)?;
        self.write(KEY_SETTINGS, settings)?;
        self.write(KEY_PERMISSIONS, permissions)?;
        Ok(())
    }

    /// Remove all three categories. Every key is attempted; the first error
    /// is returned.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        let mut first_err = None;
        for name in [KEY_ROLES, KEY_SETTINGS, KEY_PERMISSIONS] {
            let key = self.key(name);
            if let Err(err) = self.store.remove(&key) {
                tracing::error!(key = %key, error = %err, "failed to remove authorization entry");
                first_err.get_or_insert(err);
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Raw access for session-level keys that live beside the snapshot.
    pub(crate) fn read_raw(&self, name: &str) -> Result<Option<String>, StoreError> {
        self.store.get(&self.key(name))
    }

    pub(crate) fn write(&mut self, name: &str, value: String) -> Result<(), StoreError> {
        let key = self.key(name);
        self.store.set(&key, value)
    }

    pub(crate) fn remove(&mut self, name: &str) -> Result<(), StoreError> {
        let key = self.key(name);
        self.store.remove(&key)
    }

    fn read_or_default<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let key = self.key(name);
        let raw = match self.store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "failed to read authorization entry");
                return T::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "malformed authorization entry; using default");
                T::default()
            }
        }
    }
}

pub(crate) fn encode<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })
}
