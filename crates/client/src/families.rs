//! Family group endpoints: CRUD, membership, and user search.

use std::sync::Arc;

use reqwest::multipart::Form;
use rootline_core::backend::PhotoUpload;
use rootline_core::error::CoreError;
use rootline_core::family::{Family, User};
use serde::Serialize;

use crate::http::{file_part, to_core_error, ApiClient};

/// Payload for creating a family group.
#[derive(Debug, Clone, Serialize)]
pub struct NewFamily {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Partial family update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FamilyUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// REST adapter for the `/api/families/` resource.
pub struct FamilyApi {
    api: Arc<ApiClient>,
}

impl FamilyApi {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// List the families the current user belongs to.
    pub async fn list(&self) -> Result<Vec<Family>, CoreError> {
        self.api
            .get_json("/api/families/")
            .await
            .map_err(|e| to_core_error(e, "family", "list"))
    }

    /// Create a family; the current user becomes its owner.
    pub async fn create(&self, family: &NewFamily) -> Result<Family, CoreError> {
        if family.name.trim().is_empty() {
            return Err(CoreError::Validation(
                "Family name must not be empty".to_string(),
            ));
        }
        self.api
            .post_json("/api/families/", family)
            .await
            .map_err(|e| to_core_error(e, "family", &family.name))
    }

    /// Fetch one family with its members and media.
    pub async fn get(&self, family: &str) -> Result<Family, CoreError> {
        self.api
            .get_json(&format!("/api/families/{family}/"))
            .await
            .map_err(|e| to_core_error(e, "family", family))
    }

    /// Update family attributes; a photo switches to multipart encoding.
    pub async fn update(
        &self,
        family: &str,
        update: &FamilyUpdate,
        photo: Option<PhotoUpload>,
    ) -> Result<Family, CoreError> {
        let path = format!("/api/families/{family}/");

        let result = match photo {
            Some(photo) => {
                let part = file_part(photo.file_name, &photo.content_type, photo.bytes)
                    .map_err(|e| CoreError::Validation(format!("Invalid photo upload: {e}")))?;
                let mut form = Form::new().part("photo", part);
                if let Some(name) = &update.name {
                    form = form.text("name", name.clone());
                }
                if let Some(description) = &update.description {
                    form = form.text("description", description.clone());
                }
                self.api.patch_multipart(&path, form).await
            }
            None => self.api.patch_json(&path, update).await,
        };
        result.map_err(|e| to_core_error(e, "family", family))
    }

    /// Delete a family. The backend cascades to nodes, edges, memories.
    pub async fn delete(&self, family: &str) -> Result<(), CoreError> {
        self.api
            .delete(&format!("/api/families/{family}/"))
            .await
            .map_err(|e| to_core_error(e, "family", family))
    }

    /// Add a registered user to the family's member set.
    pub async fn add_member(&self, family: &str, user_id: &str) -> Result<(), CoreError> {
        let body = serde_json::json!({ "user_id": user_id });
        let _: serde_json::Value = self
            .api
            .post_json(&format!("/api/families/{family}/add_member/"), &body)
            .await
            .map_err(|e| to_core_error(e, "family", family))?;
        Ok(())
    }

    /// Remove a user from the family's member set. Only the owner may
    /// remove members; the backend enforces this.
    pub async fn remove_member(&self, family: &str, user_id: &str) -> Result<(), CoreError> {
        let body = serde_json::json!({ "user_id": user_id });
        let _: serde_json::Value = self
            .api
            .post_json(&format!("/api/families/{family}/remove_member/"), &body)
            .await
            .map_err(|e| to_core_error(e, "family", family))?;
        Ok(())
    }

    /// Search registered users by name or username, for invitations.
    pub async fn search_users(&self, query: &str) -> Result<Vec<User>, CoreError> {
        self.api
            .get_json_query("/api/users/search/", &[("q", query)])
            .await
            .map_err(|e| to_core_error(e, "user", query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_family_serializes_without_empty_description() {
        let family = NewFamily {
            name: "Petrov".to_string(),
            description: None,
        };
        let json = serde_json::to_value(&family).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "Petrov" }));
    }
}
