//! Client configuration loaded from environment variables.

/// Connection settings for the backend API.
///
/// All fields have defaults suitable for local development; override via
/// environment variables in production.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL without a trailing slash (default:
    /// `http://localhost:8000`).
    pub base_url: String,
    /// Per-request timeout in seconds applied to every call, including
    /// node and edge mutations (default: `30`).
    pub request_timeout_secs: u64,
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `API_BASE_URL`         | `http://localhost:8000` |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                    |
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".into());

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self::new(base_url, request_timeout_secs)
    }

    /// Build a config for a specific backend URL; trailing slashes are
    /// stripped so paths can always start with `/`.
    pub fn new(base_url: impl Into<String>, request_timeout_secs: u64) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            request_timeout_secs,
        }
    }
}
