//! Domain-level error type shared across all Rootline crates.

/// Errors produced by domain logic and surfaced through every layer.
///
/// The taxonomy mirrors how failures are shown to the user:
/// validation and conflict errors are rejected synchronously before any
/// network call, network errors are retryable, and unauthorized errors
/// end the session globally.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Input rejected before any remote call (self-loop, empty name, ...).
    #[error("Validation error: {0}")]
    Validation(String),

    /// The operation collides with existing state (duplicate edge, ...).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A referenced entity does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// Entity kind, e.g. `"node"` or `"family"`.
        entity: String,
        /// The id that failed to resolve.
        id: String,
    },

    /// The session is missing, expired, or lacks permission.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Transport-level failure (timeout, connectivity loss). Retryable.
    #[error("Network error: {0}")]
    Network(String),

    /// Anything unexpected. Never shown verbatim to the user.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for [`CoreError::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}
