//! Memories and their attached media files.
//!
//! A memory is a dated story attached to a family: it can reference
//! person nodes and family members as participants and own any number of
//! uploaded photos and videos.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::family::User;
use crate::person::PersonNode;
use crate::types::{EntityId, Timestamp};

/// Maximum accepted length for a memory title.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Kind of an uploaded media file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Photo,
    Video,
}

impl MediaType {
    /// Lowercase wire representation, as the backend stores it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Video => "video",
        }
    }

    /// Guess the media type from a MIME content type.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        if content_type.starts_with("image/") {
            Some(Self::Photo)
        } else if content_type.starts_with("video/") {
            Some(Self::Video)
        } else {
            None
        }
    }
}

/// An uploaded photo or video.
///
/// Every media file is owned by exactly one family, memory, or person
/// node; the owning context is implied by the endpoint it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFile {
    pub id: EntityId,
    pub url: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    #[serde(default)]
    pub uploaded_at: Option<Timestamp>,
}

/// A dated story attached to a family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub participants: Vec<User>,
    #[serde(default)]
    pub nodes: Vec<PersonNode>,
    #[serde(default)]
    pub media: Vec<MediaFile>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

/// Validate a memory title: non-empty after trimming, within length.
pub fn validate_memory_title(title: &str) -> Result<(), CoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Memory title must not be empty".to_string(),
        ));
    }
    if trimmed.len() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Memory title exceeds {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_from_content_type() {
        assert_eq!(MediaType::from_content_type("image/png"), Some(MediaType::Photo));
        assert_eq!(MediaType::from_content_type("video/mp4"), Some(MediaType::Video));
        assert_eq!(MediaType::from_content_type("application/pdf"), None);
    }

    #[test]
    fn media_type_serializes_lowercase() {
        let json = serde_json::to_string(&MediaType::Photo).unwrap();
        assert_eq!(json, "\"photo\"");
    }

    #[test]
    fn media_file_round_trips_type_field() {
        let json = r#"{"id":"m1","url":"https://cdn/x.mp4","type":"video"}"#;
        let media: MediaFile = serde_json::from_str(json).unwrap();
        assert_eq!(media.media_type, MediaType::Video);
    }

    #[test]
    fn empty_title_rejected() {
        assert!(validate_memory_title(" ").is_err());
        assert!(validate_memory_title("Summer 1998").is_ok());
    }
}
