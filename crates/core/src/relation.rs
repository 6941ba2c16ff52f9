//! Relation edges between person nodes.
//!
//! Backends are inconsistent about edge field names (`source` vs
//! `source_id`) and occasionally omit the edge id entirely. [`RawEdge`]
//! captures the loose wire shape; [`RawEdge::normalize`] produces the one
//! canonical [`RelationEdge`] the rest of the system works with, so the
//! ambiguity never leaks past the adapter boundary.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::EntityId;

// ---------------------------------------------------------------------------
// Wire shape
// ---------------------------------------------------------------------------

/// Edge record exactly as the backend returns it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEdge {
    #[serde(default)]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub source: Option<EntityId>,
    #[serde(default)]
    pub target: Option<EntityId>,
    #[serde(default)]
    pub source_id: Option<EntityId>,
    #[serde(default)]
    pub target_id: Option<EntityId>,
    #[serde(default)]
    pub family: Option<EntityId>,
}

impl RawEdge {
    /// Resolve the loose wire fields into a canonical [`RelationEdge`].
    ///
    /// `source_id`/`target_id` win over `source`/`target` when both are
    /// present. A missing id is replaced with the deterministic
    /// [`synthetic_edge_id`]. Edges with no resolvable endpoint are
    /// rejected rather than guessed at.
    pub fn normalize(self) -> Result<RelationEdge, CoreError> {
        let source = self
            .source_id
            .or(self.source)
            .ok_or_else(|| CoreError::Validation("Edge is missing a source node".to_string()))?;
        let target = self
            .target_id
            .or(self.target)
            .ok_or_else(|| CoreError::Validation("Edge is missing a target node".to_string()))?;
        let id = match self.id {
            Some(id) if !id.is_empty() => id,
            _ => synthetic_edge_id(&source, &target),
        };
        Ok(RelationEdge { id, source, target })
    }
}

// ---------------------------------------------------------------------------
// Canonical shape
// ---------------------------------------------------------------------------

/// A directed relation between two person nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationEdge {
    pub id: EntityId,
    pub source: EntityId,
    pub target: EntityId,
}

impl RelationEdge {
    /// Whether this edge starts or ends at the given node.
    pub fn touches(&self, node: &str) -> bool {
        self.source == node || self.target == node
    }

    /// Whether this edge connects the given ordered (source, target) pair.
    pub fn connects(&self, source: &str, target: &str) -> bool {
        self.source == source && self.target == target
    }
}

/// Deterministic edge id derived from the endpoints.
///
/// Used for locally created edges and for backend edges that arrive
/// without an id. Direction-sensitive: `a-b` and `b-a` are distinct.
pub fn synthetic_edge_id(source: &str, target: &str) -> EntityId {
    format!("{source}-{target}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_prefers_suffixed_fields() {
        let raw = RawEdge {
            id: Some("e1".to_string()),
            source: Some("wrong".to_string()),
            target: Some("wrong".to_string()),
            source_id: Some("a".to_string()),
            target_id: Some("b".to_string()),
            family: None,
        };
        let edge = raw.normalize().unwrap();
        assert_eq!(edge.source, "a");
        assert_eq!(edge.target, "b");
        assert_eq!(edge.id, "e1");
    }

    #[test]
    fn normalize_accepts_plain_fields() {
        let raw = RawEdge {
            source: Some("a".to_string()),
            target: Some("b".to_string()),
            ..Default::default()
        };
        let edge = raw.normalize().unwrap();
        assert_eq!(edge.source, "a");
        assert_eq!(edge.target, "b");
    }

    #[test]
    fn missing_id_becomes_synthetic() {
        let raw = RawEdge {
            source: Some("a".to_string()),
            target: Some("b".to_string()),
            ..Default::default()
        };
        assert_eq!(raw.normalize().unwrap().id, "a-b");
    }

    #[test]
    fn missing_endpoint_rejected() {
        let raw = RawEdge {
            source: Some("a".to_string()),
            ..Default::default()
        };
        assert!(raw.normalize().is_err());
    }

    #[test]
    fn synthetic_id_is_direction_sensitive() {
        assert_ne!(synthetic_edge_id("a", "b"), synthetic_edge_id("b", "a"));
    }

    #[test]
    fn touches_matches_either_endpoint() {
        let edge = RelationEdge {
            id: "a-b".to_string(),
            source: "a".to_string(),
            target: "b".to_string(),
        };
        assert!(edge.touches("a"));
        assert!(edge.touches("b"));
        assert!(!edge.touches("c"));
    }
}
