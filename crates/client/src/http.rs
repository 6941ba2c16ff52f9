//! Low-level authorized HTTP wrapper around [`reqwest`].
//!
//! Every request goes through [`ApiClient`]: it attaches the bearer
//! token when a session token is present, applies the configured request
//! timeout, and turns non-2xx responses into [`ApiError`]s. A 401 from
//! any endpoint is handled globally: the session is cleared and a
//! `session.expired` event is published so the UI can redirect to the
//! authentication entry point.

use std::sync::Arc;
use std::time::Duration;

use reqwest::multipart::Form;
use reqwest::{RequestBuilder, Response, StatusCode};
use rootline_core::error::CoreError;
use rootline_events::bus::{event_types, AppEvent, EventBus};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::session::Session;

/// Errors from the HTTP transport layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (timeout, DNS, connectivity).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Backend-provided detail, or the raw body when none exists.
        message: String,
    },

    /// The backend returned 401; the session has been cleared.
    #[error("Session expired")]
    SessionExpired,
}

/// Map a transport error to the domain taxonomy for a specific entity.
///
/// `entity` and `id` name what the failed call was about, so a 404 can
/// become a useful [`CoreError::NotFound`].
pub(crate) fn to_core_error(err: ApiError, entity: &str, id: &str) -> CoreError {
    match err {
        ApiError::Request(e) => CoreError::Network(e.to_string()),
        ApiError::SessionExpired => CoreError::Unauthorized("Session expired".to_string()),
        ApiError::Api { status: 404, .. } => CoreError::not_found(entity, id),
        ApiError::Api {
            status: 400 | 422,
            message,
        } => CoreError::Validation(message),
        ApiError::Api {
            status: 409,
            message,
        } => CoreError::Conflict(message),
        ApiError::Api {
            status: 401 | 403,
            message,
        } => CoreError::Unauthorized(message),
        ApiError::Api { status, message } => {
            CoreError::Internal(format!("API error ({status}): {message}"))
        }
    }
}

/// Authorized HTTP client for the backend resource API.
///
/// Cheap to clone via `Arc`; one instance is shared by all API surfaces
/// so they agree on the session and timeout.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<Session>,
    events: Arc<EventBus>,
}

impl ApiClient {
    /// Build a client from config, a shared session, and the event bus.
    pub fn new(
        config: &ClientConfig,
        session: Arc<Session>,
        events: Arc<EventBus>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            session,
            events,
        })
    }

    /// The shared session this client authenticates with.
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// `GET path` returning deserialized JSON.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.authorize(self.http.get(self.url(path))).send().await?;
        self.parse(resp).await
    }

    /// `GET path?query...` returning deserialized JSON.
    pub async fn get_json_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let resp = self
            .authorize(self.http.get(self.url(path)).query(query))
            .send()
            .await?;
        self.parse(resp).await
    }

    /// `POST path` with a JSON body, returning deserialized JSON.
    pub async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let resp = self
            .authorize(self.http.post(self.url(path)).json(body))
            .send()
            .await?;
        self.parse(resp).await
    }

    /// `PATCH path` with a JSON body, returning deserialized JSON.
    pub async fn patch_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let resp = self
            .authorize(self.http.patch(self.url(path)).json(body))
            .send()
            .await?;
        self.parse(resp).await
    }

    /// `PATCH path` encoded as multipart form data.
    ///
    /// Used when a request carries a binary file; the backend tells the
    /// two encodings apart purely by `Content-Type`.
    pub async fn patch_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        let resp = self
            .authorize(self.http.patch(self.url(path)).multipart(form))
            .send()
            .await?;
        self.parse(resp).await
    }

    /// `POST path` encoded as multipart form data.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        let resp = self
            .authorize(self.http.post(self.url(path)).multipart(form))
            .send()
            .await?;
        self.parse(resp).await
    }

    /// `DELETE path`, discarding any response body.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let resp = self
            .authorize(self.http.delete(self.url(path)))
            .send()
            .await?;
        self.guard(resp).await?;
        Ok(())
    }

    /// `DELETE path` with a JSON body (used by `delete_media`).
    pub async fn delete_json<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let resp = self
            .authorize(self.http.delete(self.url(path)).json(body))
            .send()
            .await?;
        self.guard(resp).await?;
        Ok(())
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the bearer token when a session token is present.
    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Check the response status, handling 401 globally.
    async fn guard(&self, resp: Response) -> Result<Response, ApiError> {
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("Backend returned 401, clearing session");
            self.session.clear();
            self.events.publish(AppEvent::new(event_types::SESSION_EXPIRED));
            return Err(ApiError::SessionExpired);
        }

        if !status.is_success() {
            let message = error_message(resp).await;
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse<T: DeserializeOwned>(&self, resp: Response) -> Result<T, ApiError> {
        let resp = self.guard(resp).await?;
        Ok(resp.json::<T>().await?)
    }
}

/// Build a multipart file part from an uploaded photo or video.
pub(crate) fn file_part(
    file_name: String,
    content_type: &str,
    bytes: Vec<u8>,
) -> Result<reqwest::multipart::Part, ApiError> {
    Ok(reqwest::multipart::Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(content_type)?)
}

/// Extract a human-readable message from an error response body.
///
/// Backends answer with `{"detail": "..."}` for most errors and with
/// `{"field": ["msg", ...]}` maps for form validation; fall back to the
/// raw body when neither shape matches.
async fn error_message(resp: Response) -> String {
    let body = match resp.text().await {
        Ok(body) => body,
        Err(_) => return "<unreadable body>".to_string(),
    };

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(&body) {
        if let Some(detail) = value.get("detail").and_then(|d| d.as_str()) {
            return detail.to_string();
        }
        if let Some(obj) = value.as_object() {
            for field_errors in obj.values() {
                if let Some(msg) = field_errors
                    .as_array()
                    .and_then(|a| a.first())
                    .and_then(|m| m.as_str())
                {
                    return msg.to_string();
                }
            }
        }
    }

    body
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    // -- Error mapping -------------------------------------------------------

    #[test]
    fn not_found_maps_to_domain_not_found() {
        let err = to_core_error(
            ApiError::Api {
                status: 404,
                message: "gone".to_string(),
            },
            "node",
            "n1",
        );
        assert_matches!(err, CoreError::NotFound { entity, id } if entity == "node" && id == "n1");
    }

    #[test]
    fn bad_request_maps_to_validation() {
        let err = to_core_error(
            ApiError::Api {
                status: 400,
                message: "name required".to_string(),
            },
            "node",
            "n1",
        );
        assert_matches!(err, CoreError::Validation(msg) if msg == "name required");
    }

    #[test]
    fn conflict_maps_to_conflict() {
        let err = to_core_error(
            ApiError::Api {
                status: 409,
                message: "duplicate".to_string(),
            },
            "edge",
            "a-b",
        );
        assert_matches!(err, CoreError::Conflict(_));
    }

    #[test]
    fn session_expiry_maps_to_unauthorized() {
        let err = to_core_error(ApiError::SessionExpired, "node", "n1");
        assert_matches!(err, CoreError::Unauthorized(_));
    }

    #[test]
    fn unknown_status_maps_to_internal() {
        let err = to_core_error(
            ApiError::Api {
                status: 502,
                message: "bad gateway".to_string(),
            },
            "node",
            "n1",
        );
        assert_matches!(err, CoreError::Internal(_));
    }
}
