//! Account endpoints: registration, login, profile.
//!
//! Successful login/registration stores the returned bearer token in the
//! shared [`Session`]; logout only clears local state (the backend keeps
//! no server-side session).

use std::sync::Arc;

use rootline_core::error::CoreError;
use rootline_core::family::User;
use rootline_core::validation::{is_valid_email, is_valid_password, is_valid_username};
use serde::{Deserialize, Serialize};

use crate::http::{to_core_error, ApiClient};

/// Payload for creating a new account.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub password: String,
}

/// Partial profile update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
    user: User,
}

/// REST adapter for the `/api/auth/` resource.
pub struct AuthApi {
    api: Arc<ApiClient>,
}

impl AuthApi {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Register a new account and start a session with its token.
    pub async fn register(&self, registration: &Registration) -> Result<User, CoreError> {
        if !is_valid_username(&registration.username) {
            return Err(CoreError::Validation(
                "Username must be 3-30 letters, digits, or underscores".to_string(),
            ));
        }
        if !is_valid_email(&registration.email) {
            return Err(CoreError::Validation("Invalid email address".to_string()));
        }
        if !is_valid_password(&registration.password) {
            return Err(CoreError::Validation(
                "Password needs at least 8 characters including a letter and a digit".to_string(),
            ));
        }

        let resp: AuthResponse = self
            .api
            .post_json("/api/auth/register/", registration)
            .await
            .map_err(|e| to_core_error(e, "user", &registration.username))?;

        self.api.session().set_token(resp.token);
        tracing::info!(username = %resp.user.username, "Registered and logged in");
        Ok(resp.user)
    }

    /// Log in with email and password; stores the bearer token on success.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, CoreError> {
        if !is_valid_email(email) {
            return Err(CoreError::Validation("Invalid email address".to_string()));
        }

        let body = serde_json::json!({ "email": email, "password": password });
        let resp: AuthResponse = self
            .api
            .post_json("/api/auth/login/", &body)
            .await
            .map_err(|e| to_core_error(e, "user", email))?;

        self.api.session().set_token(resp.token);
        tracing::info!(username = %resp.user.username, "Logged in");
        Ok(resp.user)
    }

    /// Fetch the account behind the current session token.
    pub async fn me(&self) -> Result<User, CoreError> {
        self.api
            .get_json("/api/auth/me/")
            .await
            .map_err(|e| to_core_error(e, "user", "me"))
    }

    /// Update the current account's profile fields.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, CoreError> {
        if let Some(username) = &update.username {
            if !is_valid_username(username) {
                return Err(CoreError::Validation(
                    "Username must be 3-30 letters, digits, or underscores".to_string(),
                ));
            }
        }
        if let Some(email) = &update.email {
            if !is_valid_email(email) {
                return Err(CoreError::Validation("Invalid email address".to_string()));
            }
        }

        self.api
            .patch_json("/api/auth/me/", update)
            .await
            .map_err(|e| to_core_error(e, "user", "me"))
    }

    /// Discard the local session token.
    pub fn logout(&self) {
        self.api.session().clear();
        tracing::info!("Logged out");
    }
}
