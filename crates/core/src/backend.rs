//! Backend port for the tree editor.
//!
//! [`TreeBackend`] is the seam between the editor engine and the REST
//! transport: `rootline-client` implements it over HTTP, and tests
//! implement it in memory. All methods are read/write operations against
//! the nodes and edges of a single family.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::person::{NewPerson, PersonNode, PersonUpdate};
use crate::relation::RelationEdge;
use crate::types::Position;

/// A photo file accompanying a person update.
///
/// Presence of a photo forces the transport to encode the update as
/// multipart form data instead of a JSON body.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Remote persistence operations for one family's tree.
#[async_trait]
pub trait TreeBackend: Send + Sync {
    /// Fetch all person nodes of a family.
    async fn fetch_nodes(&self, family: &str) -> Result<Vec<PersonNode>, CoreError>;

    /// Fetch all relation edges of a family, already normalized.
    async fn fetch_edges(&self, family: &str) -> Result<Vec<RelationEdge>, CoreError>;

    /// Create a person node; returns the record with its server id.
    async fn create_node(&self, family: &str, attrs: &NewPerson)
        -> Result<PersonNode, CoreError>;

    /// Update a person node. A photo switches the encoding to multipart.
    async fn update_node(
        &self,
        node: &str,
        attrs: &PersonUpdate,
        photo: Option<PhotoUpload>,
    ) -> Result<PersonNode, CoreError>;

    /// Delete a person node. The backend cascades edge deletion.
    async fn delete_node(&self, node: &str) -> Result<(), CoreError>;

    /// Create a directed relation edge between two nodes of a family.
    async fn create_edge(
        &self,
        family: &str,
        source: &str,
        target: &str,
    ) -> Result<RelationEdge, CoreError>;

    /// Delete a relation edge by its backend id.
    async fn delete_edge(&self, edge: &str) -> Result<(), CoreError>;

    /// Persist one node's canvas position. Idempotent; last write wins.
    async fn update_position(&self, node: &str, position: Position) -> Result<(), CoreError>;
}

/// Convenience alias for trait objects shared across an editor session.
pub type SharedTreeBackend = std::sync::Arc<dyn TreeBackend>;
