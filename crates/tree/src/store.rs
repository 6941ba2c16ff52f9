//! In-memory graph store for the currently open family tree.
//!
//! Holds the canonical local collections of visual nodes and edges,
//! translated from backend records into a render-ready shape. The store
//! never talks to the network; persistence is the controller's job.

use std::collections::HashSet;

use rootline_core::error::CoreError;
use rootline_core::person::PersonNode;
use rootline_core::relation::{synthetic_edge_id, RelationEdge};
use rootline_core::types::{EntityId, Position};
use serde::Serialize;

/// A person node in render-ready form.
#[derive(Debug, Clone, Serialize)]
pub struct VisualNode {
    pub id: EntityId,
    /// Display label, the person's name.
    pub label: String,
    pub position: Position,
    /// The full backing record, for viewers and editors.
    pub person: PersonNode,
}

/// A relation edge in render-ready form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisualEdge {
    pub id: EntityId,
    pub source: EntityId,
    pub target: EntityId,
}

/// Local node/edge collections for one open family tree.
///
/// One store exists per editor session: created when the tree view
/// mounts, discarded on navigation. Never shared across views.
#[derive(Debug, Default)]
pub struct GraphStore {
    nodes: Vec<VisualNode>,
    edges: Vec<VisualEdge>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace both collections wholesale from backend records.
    ///
    /// Idempotent: loading the same input twice yields the same visual
    /// graph. Nodes without stored coordinates get the default position.
    pub fn load(&mut self, nodes: &[PersonNode], edges: &[RelationEdge]) {
        self.nodes = nodes
            .iter()
            .map(|person| VisualNode {
                id: person.id.clone(),
                label: person.name.clone(),
                position: person.position_or_default(),
                person: person.clone(),
            })
            .collect();
        self.edges = edges
            .iter()
            .map(|edge| VisualEdge {
                id: edge.id.clone(),
                source: edge.source.clone(),
                target: edge.target.clone(),
            })
            .collect();
    }

    /// All visual nodes, in load/insertion order.
    pub fn nodes(&self) -> &[VisualNode] {
        &self.nodes
    }

    /// All visual edges, in load/insertion order.
    pub fn edges(&self) -> &[VisualEdge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&VisualNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&VisualEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Ids of all currently loaded nodes.
    pub fn node_ids(&self) -> HashSet<EntityId> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }

    /// Move one node locally. Returns `false` when the node is unknown.
    ///
    /// Affects no other node and persists nothing.
    pub fn apply_position_change(&mut self, id: &str, position: Position) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Add a directed edge between two existing nodes.
    ///
    /// Rejects self-loops and duplicate ordered (source, target) pairs;
    /// the reverse direction is a distinct edge. Returns the locally
    /// generated edge id.
    pub fn add_edge(&mut self, source: &str, target: &str) -> Result<EntityId, CoreError> {
        if source == target {
            return Err(CoreError::Validation(
                "Cannot connect a node to itself".to_string(),
            ));
        }
        if !self.contains_node(source) {
            return Err(CoreError::not_found("node", source));
        }
        if !self.contains_node(target) {
            return Err(CoreError::not_found("node", target));
        }
        if self
            .edges
            .iter()
            .any(|e| e.source == source && e.target == target)
        {
            return Err(CoreError::Conflict("Relation already exists".to_string()));
        }

        let id = synthetic_edge_id(source, target);
        self.edges.push(VisualEdge {
            id: id.clone(),
            source: source.to_string(),
            target: target.to_string(),
        });
        Ok(id)
    }

    /// Insert a node from a backend record, or refresh it in place.
    ///
    /// An existing node always keeps its current canvas position, so a
    /// metadata update cannot snap back an unsaved drag. Only the next
    /// wholesale [`load`](Self::load) moves nodes to stored coordinates.
    pub fn upsert_node(&mut self, person: &PersonNode) {
        match self.nodes.iter_mut().find(|n| n.id == person.id) {
            Some(node) => {
                node.label = person.name.clone();
                node.person = person.clone();
            }
            None => self.nodes.push(VisualNode {
                id: person.id.clone(),
                label: person.name.clone(),
                position: person.position_or_default(),
                person: person.clone(),
            }),
        }
    }

    /// Remove one node. Edges touching it are left for the caller to
    /// remove explicitly (see [`edges_touching`](Self::edges_touching)).
    pub fn remove_node(&mut self, id: &str) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.id != id);
        self.nodes.len() != before
    }

    pub fn remove_edge(&mut self, id: &str) -> bool {
        let before = self.edges.len();
        self.edges.retain(|e| e.id != id);
        self.edges.len() != before
    }

    /// Ids of every edge whose source or target is the given node.
    pub fn edges_touching(&self, node: &str) -> Vec<EntityId> {
        self.edges
            .iter()
            .filter(|e| e.source == node || e.target == node)
            .map(|e| e.id.clone())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rootline_core::types::DEFAULT_NODE_POSITION;

    fn person(id: &str, name: &str, x: Option<f64>, y: Option<f64>) -> PersonNode {
        PersonNode {
            id: id.to_string(),
            name: name.to_string(),
            birth_date: None,
            death_date: None,
            bio: None,
            photo_url: None,
            x,
            y,
        }
    }

    fn edge(id: &str, source: &str, target: &str) -> RelationEdge {
        RelationEdge {
            id: id.to_string(),
            source: source.to_string(),
            target: target.to_string(),
        }
    }

    fn loaded_store() -> GraphStore {
        let mut store = GraphStore::new();
        store.load(
            &[
                person("a", "Anna", Some(10.0), Some(20.0)),
                person("b", "Boris", None, None),
            ],
            &[edge("a-b", "a", "b")],
        );
        store
    }

    // -- Load ----------------------------------------------------------------

    #[test]
    fn load_maps_records_to_visual_shapes() {
        let store = loaded_store();
        assert_eq!(store.nodes().len(), 2);
        assert_eq!(store.edges().len(), 1);
        assert_eq!(store.node("a").unwrap().label, "Anna");
        assert_eq!(store.node("a").unwrap().position, Position::new(10.0, 20.0));
    }

    #[test]
    fn load_applies_default_position_when_coordinates_absent() {
        let store = loaded_store();
        assert_eq!(store.node("b").unwrap().position, DEFAULT_NODE_POSITION);
    }

    #[test]
    fn load_is_idempotent() {
        let nodes = [
            person("a", "Anna", Some(10.0), Some(20.0)),
            person("b", "Boris", None, None),
        ];
        let edges = [edge("a-b", "a", "b")];

        let mut store = GraphStore::new();
        store.load(&nodes, &edges);
        let first_nodes: Vec<_> = store
            .nodes()
            .iter()
            .map(|n| (n.id.clone(), n.label.clone(), n.position))
            .collect();
        let first_edges = store.edges().to_vec();

        store.load(&nodes, &edges);
        let second_nodes: Vec<_> = store
            .nodes()
            .iter()
            .map(|n| (n.id.clone(), n.label.clone(), n.position))
            .collect();

        assert_eq!(first_nodes, second_nodes);
        assert_eq!(first_edges, store.edges().to_vec());
    }

    #[test]
    fn load_replaces_previous_contents_wholesale() {
        let mut store = loaded_store();
        store.load(&[person("c", "Clara", None, None)], &[]);
        assert_eq!(store.nodes().len(), 1);
        assert!(store.edges().is_empty());
        assert!(!store.contains_node("a"));
    }

    // -- Position changes ----------------------------------------------------

    #[test]
    fn position_change_is_local_and_isolated() {
        let mut store = loaded_store();
        assert!(store.apply_position_change("a", Position::new(99.0, 1.0)));
        assert_eq!(store.node("a").unwrap().position, Position::new(99.0, 1.0));
        // Other node untouched.
        assert_eq!(store.node("b").unwrap().position, DEFAULT_NODE_POSITION);
    }

    #[test]
    fn position_change_for_unknown_node_is_rejected() {
        let mut store = loaded_store();
        assert!(!store.apply_position_change("ghost", Position::new(0.0, 0.0)));
    }

    // -- add_edge ------------------------------------------------------------

    #[test]
    fn self_loop_rejected() {
        let mut store = loaded_store();
        assert_matches!(store.add_edge("a", "a"), Err(CoreError::Validation(_)));
        assert_eq!(store.edges().len(), 1);
    }

    #[test]
    fn duplicate_directed_edge_rejected() {
        let mut store = loaded_store();
        assert_matches!(store.add_edge("a", "b"), Err(CoreError::Conflict(_)));
    }

    #[test]
    fn reverse_direction_is_a_distinct_edge() {
        let mut store = loaded_store();
        let id = store.add_edge("b", "a").unwrap();
        assert_eq!(id, "b-a");
        assert_eq!(store.edges().len(), 2);
    }

    #[test]
    fn edge_to_unknown_node_rejected() {
        let mut store = loaded_store();
        assert_matches!(store.add_edge("a", "ghost"), Err(CoreError::NotFound { .. }));
    }

    // -- Removal -------------------------------------------------------------

    #[test]
    fn remove_node_leaves_edges_for_the_caller() {
        let mut store = loaded_store();
        assert!(store.remove_node("a"));
        // The store itself does not cascade; the controller prunes.
        assert_eq!(store.edges().len(), 1);
        assert_eq!(store.edges_touching("a"), vec!["a-b".to_string()]);
    }

    #[test]
    fn edges_touching_matches_both_directions() {
        let mut store = loaded_store();
        store.add_edge("b", "a").unwrap();
        let touching = store.edges_touching("a");
        assert_eq!(touching.len(), 2);
    }

    // -- upsert --------------------------------------------------------------

    #[test]
    fn upsert_keeps_local_position_of_an_existing_node() {
        let mut store = loaded_store();
        store.apply_position_change("a", Position::new(5.0, 5.0));
        // Stored coordinates on the record do not override the canvas.
        store.upsert_node(&person("a", "Anna Renamed", Some(1.0), Some(2.0)));
        let node = store.node("a").unwrap();
        assert_eq!(node.label, "Anna Renamed");
        assert_eq!(node.position, Position::new(5.0, 5.0));
    }

    #[test]
    fn upsert_inserts_unknown_node() {
        let mut store = loaded_store();
        store.upsert_node(&person("c", "Clara", Some(1.0), Some(2.0)));
        assert_eq!(store.node("c").unwrap().position, Position::new(1.0, 2.0));
    }
}
