//! Person node records and person-related validation.
//!
//! A [`PersonNode`] is one individual in a family tree, as returned by
//! the backend `/nodes/` resource. Coordinates are optional on the wire;
//! the tree store applies [`DEFAULT_NODE_POSITION`] when they are absent.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{EntityId, Position, DEFAULT_NODE_POSITION};

/// Maximum accepted length for a person's display name.
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum accepted length for a person's biography.
pub const MAX_BIO_LENGTH: usize = 2000;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One individual in a family tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonNode {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub death_date: Option<NaiveDate>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
}

impl PersonNode {
    /// Canvas position, falling back to [`DEFAULT_NODE_POSITION`] when the
    /// backend did not store coordinates for this person.
    pub fn position_or_default(&self) -> Position {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Position::new(x, y),
            _ => DEFAULT_NODE_POSITION,
        }
    }

    /// Age in completed years on `on`, when a birth date is known.
    ///
    /// For deceased persons the age stops at the death date.
    pub fn age_on(&self, on: NaiveDate) -> Option<u32> {
        let birth = self.birth_date?;
        let end = match self.death_date {
            Some(death) if death < on => death,
            _ => on,
        };
        // `years_since` returns None when `end` precedes the birth date.
        end.years_since(birth)
    }
}

/// Attributes for creating a new person node.
#[derive(Debug, Clone, Serialize)]
pub struct NewPerson {
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub x: f64,
    pub y: f64,
}

/// Attributes for updating an existing person node.
///
/// All fields are sent on every update; `None` dates and an empty bio
/// clear the stored values server-side.
#[derive(Debug, Clone, Serialize)]
pub struct PersonUpdate {
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub death_date: Option<NaiveDate>,
    pub bio: String,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a person display name: non-empty after trimming, within length.
pub fn validate_person_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Name must not be empty".to_string()));
    }
    if trimmed.len() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Name exceeds {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate that a death date does not precede the birth date.
pub fn validate_lifespan(
    birth: Option<NaiveDate>,
    death: Option<NaiveDate>,
) -> Result<(), CoreError> {
    if let (Some(b), Some(d)) = (birth, death) {
        if d < b {
            return Err(CoreError::Validation(
                "Death date precedes birth date".to_string(),
            ));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
