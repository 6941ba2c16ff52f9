//! Shared session token holder.
//!
//! One [`Session`] lives per application, shared as `Arc<Session>`
//! between the API surfaces. It only stores the bearer token; durable
//! persistence (keychain, browser storage) is the embedding front end's
//! concern.

use std::sync::RwLock;

/// Holds the bearer token for the current session, if any.
#[derive(Debug, Default)]
pub struct Session {
    token: RwLock<Option<String>>,
}

impl Session {
    /// Create an unauthenticated session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the bearer token after a successful login.
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().expect("session lock poisoned") = Some(token.into());
    }

    /// Current bearer token, if one is set.
    pub fn token(&self) -> Option<String> {
        self.token.read().expect("session lock poisoned").clone()
    }

    /// Drop the stored token (logout or session expiry).
    pub fn clear(&self) {
        *self.token.write().expect("session lock poisoned") = None;
    }

    /// Whether a token is currently stored.
    pub fn is_authenticated(&self) -> bool {
        self.token.read().expect("session lock poisoned").is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unauthenticated() {
        let session = Session::new();
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
    }

    #[test]
    fn set_and_clear_token() {
        let session = Session::new();
        session.set_token("abc123");
        assert!(session.is_authenticated());
        assert_eq!(session.token().as_deref(), Some("abc123"));

        session.clear();
        assert!(!session.is_authenticated());
    }
}
