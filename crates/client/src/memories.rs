//! Memory endpoints: stories attached to a family, plus media upload.

use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::multipart::Form;
use rootline_core::error::CoreError;
use rootline_core::memory::{validate_memory_title, MediaFile, MediaType, Memory};
use rootline_core::types::EntityId;
use serde::Serialize;

use crate::http::{file_part, to_core_error, ApiClient};

/// Payload for creating a memory within a family.
#[derive(Debug, Clone, Serialize)]
pub struct NewMemory {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Person nodes this memory is about.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub node_ids: Vec<EntityId>,
}

/// Partial memory update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MemoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_ids: Option<Vec<EntityId>>,
}

/// A media file to attach to a memory.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// REST adapter for the `/api/memories/` resource.
pub struct MemoryApi {
    api: Arc<ApiClient>,
}

impl MemoryApi {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// List all memories of a family.
    pub async fn list(&self, family: &str) -> Result<Vec<Memory>, CoreError> {
        self.api
            .get_json_query("/api/memories/", &[("family", family)])
            .await
            .map_err(|e| to_core_error(e, "family", family))
    }

    /// Create a memory within a family.
    pub async fn create(&self, family: &str, memory: &NewMemory) -> Result<Memory, CoreError> {
        validate_memory_title(&memory.title)?;

        let mut body = serde_json::to_value(memory)
            .map_err(|e| CoreError::Internal(format!("Failed to encode memory: {e}")))?;
        body["family"] = serde_json::Value::String(family.to_string());

        self.api
            .post_json("/api/memories/", &body)
            .await
            .map_err(|e| to_core_error(e, "family", family))
    }

    /// Fetch one memory with its participants, nodes, and media.
    pub async fn get(&self, memory: &str) -> Result<Memory, CoreError> {
        self.api
            .get_json(&format!("/api/memories/{memory}/"))
            .await
            .map_err(|e| to_core_error(e, "memory", memory))
    }

    /// Update a memory's attributes.
    pub async fn update(&self, memory: &str, update: &MemoryUpdate) -> Result<Memory, CoreError> {
        if let Some(title) = &update.title {
            validate_memory_title(title)?;
        }
        self.api
            .patch_json(&format!("/api/memories/{memory}/"), update)
            .await
            .map_err(|e| to_core_error(e, "memory", memory))
    }

    /// Delete a memory and the media it owns.
    pub async fn delete(&self, memory: &str) -> Result<(), CoreError> {
        self.api
            .delete(&format!("/api/memories/{memory}/"))
            .await
            .map_err(|e| to_core_error(e, "memory", memory))
    }

    /// Upload a photo or video and attach it to a memory.
    ///
    /// The media kind is derived from the upload's content type; files
    /// that are neither image nor video are rejected before upload.
    pub async fn upload_media(
        &self,
        memory: &str,
        upload: MediaUpload,
    ) -> Result<MediaFile, CoreError> {
        let media_type = MediaType::from_content_type(&upload.content_type).ok_or_else(|| {
            CoreError::Validation(format!(
                "Unsupported media content type: {}",
                upload.content_type
            ))
        })?;

        let part = file_part(upload.file_name, &upload.content_type, upload.bytes)
            .map_err(|e| CoreError::Validation(format!("Invalid media upload: {e}")))?;
        let form = Form::new()
            .part("file", part)
            .text("type", media_type.as_str());

        self.api
            .post_multipart(&format!("/api/memories/{memory}/upload_media/"), form)
            .await
            .map_err(|e| to_core_error(e, "memory", memory))
    }

    /// Detach and delete one media file from a memory.
    pub async fn delete_media(&self, memory: &str, media_id: &str) -> Result<(), CoreError> {
        let body = serde_json::json!({ "media_id": media_id });
        self.api
            .delete_json(&format!("/api/memories/{memory}/delete_media/"), &body)
            .await
            .map_err(|e| to_core_error(e, "media", media_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_memory_serializes_node_ids_when_present() {
        let memory = NewMemory {
            title: "Wedding".to_string(),
            description: None,
            date: Some("1998-07-04".parse().unwrap()),
            node_ids: vec!["n1".to_string(), "n2".to_string()],
        };
        let json = serde_json::to_value(&memory).unwrap();
        assert_eq!(json["title"], "Wedding");
        assert_eq!(json["date"], "1998-07-04");
        assert_eq!(json["node_ids"], serde_json::json!(["n1", "n2"]));
        assert!(json.get("description").is_none());
    }
}
