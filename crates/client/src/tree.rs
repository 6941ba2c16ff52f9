//! Tree resource adapter: nodes, edges, and position persistence.
//!
//! [`TreeApi`] implements the [`TreeBackend`] port over the backend's
//! `/api/nodes/` and `/api/edges/` resources. Edge payloads are
//! normalized here, at the adapter boundary, so the editor engine only
//! ever sees canonical [`RelationEdge`]s.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart::Form;
use rootline_core::backend::{PhotoUpload, TreeBackend};
use rootline_core::error::CoreError;
use rootline_core::person::{NewPerson, PersonNode, PersonUpdate};
use rootline_core::relation::{RawEdge, RelationEdge};
use rootline_core::types::Position;
use serde_json::json;

use crate::http::{file_part, to_core_error, ApiClient};

/// REST adapter for one backend's tree resources.
pub struct TreeApi {
    api: Arc<ApiClient>,
}

impl TreeApi {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Build the multipart form for a person update carrying a photo.
    ///
    /// Every scalar field travels as a text part next to the file part,
    /// mirroring the JSON body of the plain update.
    fn update_form(attrs: &PersonUpdate, photo: PhotoUpload) -> Result<Form, CoreError> {
        let part = file_part(photo.file_name, &photo.content_type, photo.bytes)
            .map_err(|e| CoreError::Validation(format!("Invalid photo upload: {e}")))?;

        let mut form = Form::new()
            .part("photo", part)
            .text("name", attrs.name.clone())
            .text("bio", attrs.bio.clone());
        if let Some(date) = attrs.birth_date {
            form = form.text("birth_date", date.to_string());
        }
        if let Some(date) = attrs.death_date {
            form = form.text("death_date", date.to_string());
        }
        Ok(form)
    }
}

#[async_trait]
impl TreeBackend for TreeApi {
    async fn fetch_nodes(&self, family: &str) -> Result<Vec<PersonNode>, CoreError> {
        self.api
            .get_json_query("/api/nodes/", &[("family", family)])
            .await
            .map_err(|e| to_core_error(e, "family", family))
    }

    async fn fetch_edges(&self, family: &str) -> Result<Vec<RelationEdge>, CoreError> {
        let raw: Vec<RawEdge> = self
            .api
            .get_json_query("/api/edges/", &[("family", family)])
            .await
            .map_err(|e| to_core_error(e, "family", family))?;

        // Edges with no resolvable endpoints are skipped rather than
        // failing the whole fetch; they cannot be rendered anyway.
        let edges = raw
            .into_iter()
            .filter_map(|edge| match edge.normalize() {
                Ok(edge) => Some(edge),
                Err(e) => {
                    tracing::warn!(family, error = %e, "Skipping malformed edge record");
                    None
                }
            })
            .collect();
        Ok(edges)
    }

    async fn create_node(
        &self,
        family: &str,
        attrs: &NewPerson,
    ) -> Result<PersonNode, CoreError> {
        let body = json!({
            "name": attrs.name,
            "birth_date": attrs.birth_date,
            "family": family,
            "x": attrs.x,
            "y": attrs.y,
        });
        self.api
            .post_json("/api/nodes/", &body)
            .await
            .map_err(|e| to_core_error(e, "family", family))
    }

    async fn update_node(
        &self,
        node: &str,
        attrs: &PersonUpdate,
        photo: Option<PhotoUpload>,
    ) -> Result<PersonNode, CoreError> {
        let path = format!("/api/nodes/{node}/");

        // Hard contract: a photo forces multipart, otherwise plain JSON.
        let result = match photo {
            Some(photo) => {
                let form = Self::update_form(attrs, photo)?;
                self.api.patch_multipart(&path, form).await
            }
            None => self.api.patch_json(&path, attrs).await,
        };
        result.map_err(|e| to_core_error(e, "node", node))
    }

    async fn delete_node(&self, node: &str) -> Result<(), CoreError> {
        self.api
            .delete(&format!("/api/nodes/{node}/"))
            .await
            .map_err(|e| to_core_error(e, "node", node))
    }

    async fn create_edge(
        &self,
        family: &str,
        source: &str,
        target: &str,
    ) -> Result<RelationEdge, CoreError> {
        let body = json!({
            "source": source,
            "target": target,
            "family": family,
        });
        let raw: RawEdge = self
            .api
            .post_json("/api/edges/", &body)
            .await
            .map_err(|e| to_core_error(e, "family", family))?;
        raw.normalize()
    }

    async fn delete_edge(&self, edge: &str) -> Result<(), CoreError> {
        self.api
            .delete(&format!("/api/edges/{edge}/"))
            .await
            .map_err(|e| to_core_error(e, "edge", edge))
    }

    async fn update_position(&self, node: &str, position: Position) -> Result<(), CoreError> {
        let body = json!({ "x": position.x, "y": position.y });
        let _: serde_json::Value = self
            .api
            .patch_json(&format!("/api/nodes/{node}/"), &body)
            .await
            .map_err(|e| to_core_error(e, "node", node))?;
        Ok(())
    }
}
