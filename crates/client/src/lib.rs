//! REST client for the Rootline backend.
//!
//! The single point of contact with the backend resource API: session
//! management, the low-level authorized HTTP wrapper, and one typed API
//! surface per resource (auth, families, memories, tree). [`TreeApi`]
//! implements the [`rootline_core::backend::TreeBackend`] port consumed
//! by the tree editor engine.

pub mod auth;
pub mod config;
pub mod families;
pub mod http;
pub mod memories;
pub mod session;
pub mod tree;

pub use auth::AuthApi;
pub use config::ClientConfig;
pub use families::FamilyApi;
pub use http::{ApiClient, ApiError};
pub use memories::MemoryApi;
pub use session::Session;
pub use tree::TreeApi;
