//! HTTP client for the LeyDeudo backend.

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};

use leydeudo_auth::{KeyValueStore, LoginResponse, Role, Session};
use leydeudo_core::UserId;

use crate::config::ClientConfig;
use crate::dto::{
    CreateUser, CreateUserResponse, LoginRequest, ResetPassword, RoleList, TokenRequest,
    TokenValidation, UpdateUser, UserEnvelope, UserList, UserRecord,
};
use crate::error::ApiError;

/// JSON client with bearer authentication and a per-request timeout.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let base_url = config.api_base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::InvalidConfig(format!(
                "api base url must be http(s): '{}'",
                config.api_base_url
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(config.api_timeout)
            .user_agent(format!("{}/{}", config.app_name, config.app_version))
            .build()
            .map_err(|e| ApiError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_base_url(&mut self, url: impl Into<String>) {
        self.base_url = url.into().trim_end_matches('/').to_string();
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    // ── auth ────────────────────────────────────────────────────────────────

    /// `POST /login`. Does not touch any session; see [`ApiClient::sign_in`].
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        self.send(
            Method::POST,
            "/login",
            Some(&LoginRequest { email, password }),
        )
        .await
    }

    /// Log in and, once the call has resolved, install the result in
    /// `session` and adopt its token.
    ///
    /// On failure the session is left untouched.
    pub async fn sign_in<S: KeyValueStore>(
        &mut self,
        session: &mut Session<S>,
        email: &str,
        password: &str,
    ) -> Result<(), ApiError> {
        let response = self.login(email, password).await.inspect_err(|err| {
            tracing::warn!(email, error = %err, "login failed");
        })?;
        self.token = Some(response.token.clone());
        session.apply_login(response);
        Ok(())
    }

    /// `POST /password/validate-token`.
    pub async fn validate_reset_token(&self, token: &str) -> Result<TokenValidation, ApiError> {
        if token.trim().is_empty() {
            return Err(leydeudo_core::DomainError::MissingResetToken.into());
        }
        self.send(
            Method::POST,
            "/password/validate-token",
            Some(&TokenRequest { token }),
        )
        .await
    }

    /// `POST /password/reset`. Validated locally first.
    pub async fn reset_password(&self, request: &ResetPassword) -> Result<(), ApiError> {
        request.validate()?;
        self.send::<_, IgnoredAny>(Method::POST, "/password/reset", Some(request))
            .await?;
        Ok(())
    }

    // ── users ───────────────────────────────────────────────────────────────

    /// `GET /users`.
    pub async fn list_users(&self) -> Result<Vec<UserRecord>, ApiError> {
        let list: UserList = self.send_empty(Method::GET, "/users").await?;
        Ok(list.users)
    }

    /// `GET /users/{id}`.
    pub async fn get_user(&self, id: UserId) -> Result<UserRecord, ApiError> {
        let envelope: UserEnvelope = self.send_empty(Method::GET, &format!("/users/{id}")).await?;
        Ok(envelope.into_record())
    }

    /// `POST /users`.
    pub async fn create_user(&self, user: &CreateUser) -> Result<CreateUserResponse, ApiError> {
        self.send(Method::POST, "/users", Some(user)).await
    }

    /// `PUT /users/{id}`. An empty password is not sent.
    pub async fn update_user(&self, id: UserId, update: UpdateUser) -> Result<(), ApiError> {
        let update = update.normalized();
        self.send::<_, IgnoredAny>(Method::PUT, &format!("/users/{id}"), Some(&update))
            .await?;
        Ok(())
    }

    /// `PUT /users/{id}/activate`.
    pub async fn activate_user(&self, id: UserId) -> Result<(), ApiError> {
        self.send_empty::<IgnoredAny>(Method::PUT, &format!("/users/{id}/activate"))
            .await?;
        Ok(())
    }

    /// `PUT /users/{id}/disable`.
    pub async fn disable_user(&self, id: UserId) -> Result<(), ApiError> {
        self.send_empty::<IgnoredAny>(Method::PUT, &format!("/users/{id}/disable"))
            .await?;
        Ok(())
    }

    // ── roles ───────────────────────────────────────────────────────────────

    /// `GET /roles`.
    pub async fn list_roles(&self) -> Result<Vec<Role>, ApiError> {
        let list: RoleList = self.send_empty(Method::GET, "/roles").await?;
        Ok(list.data)
    }

    // ── plumbing ────────────────────────────────────────────────────────────

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(endpoint));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<B, T>(&self, method: Method, endpoint: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut builder = self.request(method.clone(), endpoint);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.execute(method, endpoint, builder).await
    }

    async fn send_empty<T: DeserializeOwned>(&self, method: Method, endpoint: &str) -> Result<T, ApiError> {
        let builder = self.request(method.clone(), endpoint);
        self.execute(method, endpoint, builder).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        tracing::debug!(%method, endpoint, "api request");

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let err = ApiError::from_response(status, &text);
            tracing::warn!(%method, endpoint, status = status.as_u16(), error = %err, "api request failed");
            return Err(err);
        }

        let text = if status == StatusCode::NO_CONTENT || text.trim().is_empty() {
            "null"
        } else {
            text.as_str()
        };

        serde_json::from_str(text).map_err(|e| ApiError::Decode(format!("{method} {endpoint}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_http_base_url() {
        let config = ClientConfig::default().with_base_url("localhost:8000");
        assert!(matches!(ApiClient::new(&config), Err(ApiError::InvalidConfig(_))));
    }

    #[test]
    fn joins_endpoints_without_double_slash() {
        let client = ApiClient::new(&ClientConfig::default().with_base_url("http://h/api/")).unwrap();
        assert_eq!(client.url("/users/7/activate"), "http://h/api/users/7/activate");
        assert_eq!(client.token(), None);

        let client = client.with_token("abc");
        assert_eq!(client.token(), Some("abc"));
    }

    #[tokio::test]
    async fn reset_password_is_validated_before_sending() {
        // Port 9 (discard) is never contacted: validation fails first.
        let client = ApiClient::new(&ClientConfig::default().with_base_url("http://127.0.0.1:9")).unwrap();
        let err = client
            .reset_password(&ResetPassword::new("tok", "short", "short"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Domain(_)));
    }
}
