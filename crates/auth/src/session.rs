//! Session lifecycle: who is signed in and what they may do.
//!
//! The session owns the user, the bearer token and the authorization
//! snapshot. Login swaps all three in one step; logout clears all three.
//! Nothing here performs network IO; the login response is obtained by the
//! caller (see `leydeudo-client`) and handed over once it has resolved.

use serde::{Deserialize, Serialize};

use leydeudo_core::UserId;

use crate::store::{KeyValueStore, SnapshotStore, StoreError, encode};
use crate::{AuthorizationSnapshot, Permissions, Role, Setting};

pub const KEY_USER: &str = "auth_user";
pub const KEY_TOKEN: &str = "auth_token";

/// Profile of the signed-in user as returned by `POST /login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub id: UserId,
    pub email: String,
    pub nombre: String,
    pub apellidos: String,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub rut: String,
}

impl UserData {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.nombre, self.apellidos).trim().to_string()
    }
}

/// Body of a successful `POST /login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: String,
    pub token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user: UserData,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub roles: Vec<Role>,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub settings: Vec<Setting>,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub permissions: Permissions,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl LoginResponse {
    pub fn snapshot(&self) -> AuthorizationSnapshot {
        AuthorizationSnapshot::new(
            self.roles.clone(),
            self.settings.clone(),
            self.permissions.clone(),
        )
    }
}

/// Signed-in state plus its persistence.
#[derive(Debug)]
pub struct Session<S> {
    store: SnapshotStore<S>,
    user: Option<UserData>,
    token: Option<String>,
    snapshot: AuthorizationSnapshot,
}

impl<S: KeyValueStore> Session<S> {
    /// Anonymous session over `store`, without reading it.
    pub fn anonymous(store: SnapshotStore<S>) -> Self {
        Self {
            store,
            user: None,
            token: None,
            snapshot: AuthorizationSnapshot::empty(),
        }
    }

    /// Rebuild the session from persisted state.
    ///
    /// A session is restored only when both user and token are stored. A
    /// corrupt user entry wipes every session key and yields an anonymous
    /// session.
    pub fn restore(store: SnapshotStore<S>) -> Self {
        let mut session = Self::anonymous(store);

        let stored = session
            .store
            .read_raw(KEY_USER)
            .and_then(|user| Ok((user, session.store.read_raw(KEY_TOKEN)?)));

        match stored {
            Ok((Some(user), Some(token))) => match serde_json::from_str::<UserData>(&user) {
                Ok(user) => {
                    session.snapshot = session.store.load();
                    tracing::debug!(user_id = %user.id, "session restored");
                    session.user = Some(user);
                    session.token = Some(token);
                }
                Err(err) => {
                    tracing::warn!(error = %err, "corrupt stored user; clearing session");
                    session.clear_persisted();
                }
            },
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(error = %err, "failed to read stored session; clearing session");
                session.clear_persisted();
            }
        }

        session
    }

    /// Install a successful login.
    ///
    /// In-memory state is replaced in one step before anything is written, so
    /// checks made afterwards see the new snapshot even if persistence fails.
    /// Persistence failures are logged, not returned, and leave nothing
    /// restorable behind.
    pub fn apply_login(&mut self, response: LoginResponse) {
        let snapshot = response.snapshot();
        let LoginResponse { token, user, .. } = response;

        self.snapshot = snapshot;
        self.user = Some(user);
        self.token = Some(token);

        if let Err(err) = self.persist() {
            tracing::error!(error = %err, "failed to persist session; clearing stored session");
            self.clear_persisted();
        }

        if let Some(user) = &self.user {
            tracing::info!(
                user_id = %user.id,
                email = %user.email,
                roles = ?self.snapshot.role_slugs(),
                "login succeeded"
            );
        }
    }

    /// Drop the signed-in user and every persisted key.
    pub fn logout(&mut self) {
        self.user = None;
        self.token = None;
        self.snapshot = AuthorizationSnapshot::empty();
        self.clear_persisted();
        tracing::info!("logout succeeded");
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }

    pub fn user(&self) -> Option<&UserData> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Snapshot to pass to the evaluator.
    pub fn snapshot(&self) -> &AuthorizationSnapshot {
        &self.snapshot
    }

    pub fn store(&self) -> &SnapshotStore<S> {
        &self.store
    }

    /// The stored user and token are dropped before the snapshot is rewritten
    /// and written back last, so a failure part-way never pairs the new user
    /// with a previous user's snapshot.
    fn persist(&mut self) -> Result<(), StoreError> {
        let user = self.user.as_ref().map(|user| encode(KEY_USER, user)).transpose()?;

        self.store.remove(KEY_TOKEN)?;
        self.store.remove(KEY_USER)?;
        self.store.save(&self.snapshot)?;

        if let Some(user) = user {
            self.store.write(KEY_USER, user)?;
        }
        if let Some(token) = &self.token {
            let token = token.clone();
            self.store.write(KEY_TOKEN, token)?;
        }
        Ok(())
    }

    fn clear_persisted(&mut self) {
        for key in [KEY_USER, KEY_TOKEN] {
            if let Err(err) = self.store.remove(key) {
                tracing::error!(key, error = %err, "failed to remove session entry");
            }
        }
        // `clear` logs each failed key itself.
        let _ = self.store.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::{PermissionGroup, RoutePermissionConfig};

    fn login_response() -> LoginResponse {
        serde_json::from_str(
            r#"{
                "message": "Login exitoso",
                "token": "header.payload.signature",
                "token_type": "Bearer",
                "user": {
                    "id": 1,
                    "email": "ana@example.com",
                    "nombre": "Ana",
                    "apellidos": "Demo",
                    "rut": "123456789"
                },
                "roles": [{"id": 1, "name": "Super Administrador", "slug": "super_admin"}],
                "settings": [{
                    "id": 1,
                    "name": "Gestión de Usuarios",
                    "slug": "user.mantenedor",
                    "description": "Configuraciones relacionadas con el mantenedor de usuarios",
                    "active": true
                }],
                "permissions": {
                    "user.mantenedor": {
                        "setting_name": "Gestión de Usuarios",
                        "permissions": ["users.view", "users.create", "users.edit", "users.delete"]
                    }
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn login_swaps_snapshot_and_persists() {
        let mut session = Session::anonymous(SnapshotStore::new(MemoryStore::new()));
        assert!(!session.is_authenticated());
        assert!(!session.snapshot().is_super_admin());

        session.apply_login(login_response());

        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some("header.payload.signature"));
        assert_eq!(session.user().unwrap().full_name(), "Ana Demo");
        assert!(session.snapshot().is_super_admin());
        assert!(session.snapshot().has_permission("users.delete"));

        let inner = session.store().inner();
        for key in ["auth_user", "auth_token", "auth_roles", "auth_settings", "auth_permissions"] {
            assert!(inner.contains_key(key), "missing {key}");
        }
    }

    #[test]
    fn restore_round_trips_login() {
        let mut session = Session::anonymous(SnapshotStore::new(MemoryStore::new()));
        let response = login_response();
        session.apply_login(response.clone());

        let store = SnapshotStore::new(session.store().inner().clone());
        let restored = Session::restore(store);

        assert!(restored.is_authenticated());
        assert_eq!(restored.user(), Some(&response.user));
        assert_eq!(restored.snapshot(), &response.snapshot());
    }

    #[test]
    fn logout_clears_everything() {
        let mut session = Session::anonymous(SnapshotStore::new(MemoryStore::new()));
        session.apply_login(login_response());
        session.logout();

        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
        assert!(session.token().is_none());
        assert!(session.store().inner().is_empty());

        let snapshot = session.snapshot();
        assert!(!snapshot.has_role("super_admin"));
        assert!(!snapshot.has_setting("user.mantenedor"));
        assert!(!snapshot.has_permission("users.view"));
        assert!(!snapshot.can_access_route(&RoutePermissionConfig::new().with_role("admin")));
    }

    #[test]
    fn restore_without_token_is_anonymous() {
        let mut memory = MemoryStore::new();
        memory
            .set("auth_user", serde_json::to_string(&login_response().user).unwrap())
            .unwrap();
        let session = Session::restore(SnapshotStore::new(memory));
        assert!(!session.is_authenticated());
        assert!(session.snapshot().is_empty());
    }

    #[test]
    fn corrupt_user_wipes_stored_session() {
        let mut session = Session::anonymous(SnapshotStore::new(MemoryStore::new()));
        session.apply_login(login_response());
        let mut memory = session.store().inner().clone();
        memory.set("auth_user", "{broken".to_string()).unwrap();

        let restored = Session::restore(SnapshotStore::new(memory));
        assert!(!restored.is_authenticated());
        assert!(restored.snapshot().is_empty());
        assert!(restored.store().inner().is_empty());
    }

    #[test]
    fn login_response_defaults_missing_categories() {
        let response: LoginResponse = serde_json::from_str(
            r#"{"token": "t", "user": {"id": 2, "email": "b@example.com", "nombre": "B", "apellidos": ""}}"#,
        )
        .unwrap();
        assert_eq!(response.token_type, "Bearer");
        assert!(response.snapshot().is_empty());
        assert_eq!(response.user.full_name(), "B");
    }

    /// Memory store whose writes to one key fail.
    #[derive(Debug, Clone, Default)]
    struct FailingKeyStore {
        inner: MemoryStore,
        fail_on: Option<&'static str>,
    }

    impl KeyValueStore for FailingKeyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
            if self.fail_on == Some(key) {
                return Err(StoreError::QuotaExceeded(key.to_string()));
            }
            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), StoreError> {
            self.inner.remove(key)
        }
    }

    fn operator_login() -> LoginResponse {
        let mut response = login_response();
        response.token = "operator-token".to_string();
        response.user.id = UserId::new(2);
        response.user.email = "op@example.com".to_string();
        response.roles = vec![Role::new(5, "Operador", "operator")];
        response.settings = vec![];
        response.permissions = Permissions::new();
        response
    }

    #[test]
    fn failed_write_never_leaves_a_mixed_session() {
        for failing in ["auth_roles", "auth_settings", "auth_permissions", "auth_user", "auth_token"] {
            let mut session = Session::anonymous(SnapshotStore::new(FailingKeyStore::default()));
            session.apply_login(login_response());

            session.store.inner_mut().fail_on = Some(failing);
            session.apply_login(operator_login());

            // In-memory state still reflects the latest login.
            assert_eq!(session.user().map(|u| u.id), Some(UserId::new(2)));
            assert!(!session.snapshot().has_setting("user.mantenedor"));

            let stored = session.store().inner().inner.clone();
            assert!(stored.is_empty(), "keys left behind when {failing} fails");

            let restored = Session::restore(SnapshotStore::new(stored));
            assert!(!restored.is_authenticated(), "restorable session when {failing} fails");
            assert!(!restored.snapshot().has_permission("users.delete"));
        }
    }

    #[test]
    fn null_categories_in_login_response_read_as_empty() {
        let response: LoginResponse = serde_json::from_str(
            r#"{"token": "t", "roles": null, "settings": null, "permissions": null,
                "user": {"id": 2, "email": "b@example.com", "nombre": "B", "apellidos": "", "rut": null}}"#,
        )
        .unwrap();
        assert!(response.snapshot().is_empty());
        assert_eq!(response.user.rut, "");
    }

    #[test]
    fn relogin_replaces_snapshot_wholesale() {
        let mut session = Session::anonymous(SnapshotStore::new(MemoryStore::new()));
        session.apply_login(login_response());

        let mut second = login_response();
        second.roles = vec![Role::new(5, "Operador", "operator")];
        second.permissions = Permissions::new()
            .with_group("reports", PermissionGroup::new("Reportes", ["reports.view"]));
        session.apply_login(second);

        assert!(!session.snapshot().is_super_admin());
        assert!(!session.snapshot().has_permission("users.view"));
        assert!(session.snapshot().has_permission("reports.view"));
    }
}
