//! Request/response bodies of the backend REST API.

use serde::{Deserialize, Serialize};

use leydeudo_auth::Role;
use leydeudo_core::{DomainError, DomainResult, UserId};

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// User account as listed by `GET /users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub apellidos: Option<String>,
    #[serde(default)]
    pub rut: Option<String>,
    #[serde(default)]
    pub direccion: Option<String>,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub celular: Option<String>,
    /// Account status label as reported by the backend.
    #[serde(default)]
    pub estado: Option<String>,
    #[serde(default, rename = "avatarUrl")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl UserRecord {
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.nombre.as_deref().unwrap_or_default(),
            self.apellidos.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string()
    }

    pub fn primary_role(&self) -> Option<&Role> {
        self.roles.first()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UserList {
    #[serde(default)]
    pub users: Vec<UserRecord>,
}

/// `GET /users/{id}` answers either with the bare record or wrapped in
/// `{"user": ...}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum UserEnvelope {
    Wrapped { user: UserRecord },
    Bare(UserRecord),
}

impl UserEnvelope {
    pub fn into_record(self) -> UserRecord {
        match self {
            UserEnvelope::Wrapped { user } | UserEnvelope::Bare(user) => user,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RoleList {
    #[serde(default)]
    pub data: Vec<Role>,
}

/// Body of `POST /users`.
///
/// No password is sent: the backend issues a reset token so the new user
/// sets their own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateUser {
    pub email: String,
    pub nombre: String,
    pub apellidos: String,
    pub rut: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub celular: Option<String>,
    pub role_slug: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreateUserResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<UserRecord>,
    /// Token for the initial password-setting link.
    #[serde(default)]
    pub reset_token: Option<String>,
    #[serde(default)]
    pub reset_url: Option<String>,
}

/// Body of `PUT /users/{id}`; unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apellidos: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rut: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub celular: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_slug: Option<String>,
}

impl UpdateUser {
    /// An empty password means "keep the current one" and is not sent.
    pub fn normalized(mut self) -> Self {
        if self.password.as_deref().is_some_and(str::is_empty) {
            self.password = None;
        }
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct TokenRequest<'a> {
    pub token: &'a str,
}

/// Answer of `POST /password/validate-token`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenValidation {
    #[serde(default)]
    pub message: Option<String>,
    /// Account the token belongs to.
    #[serde(default)]
    pub user: Option<serde_json::Value>,
}

/// Body of `POST /password/reset`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResetPassword {
    pub token: String,
    pub password: String,
    pub password_confirmation: String,
}

impl ResetPassword {
    pub fn new(
        token: impl Into<String>,
        password: impl Into<String>,
        password_confirmation: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            password: password.into(),
            password_confirmation: password_confirmation.into(),
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.token.trim().is_empty() {
            return Err(DomainError::MissingResetToken);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        if self.password != self.password_confirmation {
            return Err(DomainError::PasswordMismatch);
        }
        Ok(())
    }
}
