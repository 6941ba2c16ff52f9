//! Tentative mutation helper for optimistic updates.
//!
//! The editor applies local changes before the backend confirms them.
//! A [`Tentative`] guard remembers the exact inverse of one optimistic
//! store mutation: `commit` it when the remote call succeeds, or
//! `rollback` it to undo precisely that change and nothing else.

use rootline_core::types::{EntityId, Position};

use crate::store::GraphStore;

/// The inverse of one optimistic store mutation.
#[derive(Debug, Clone)]
enum Inverse {
    RemoveEdge(EntityId),
    RemoveNode(EntityId),
    RestorePosition(EntityId, Position),
}

/// Guard over one optimistic mutation awaiting remote confirmation.
#[must_use = "commit or roll back the tentative mutation"]
#[derive(Debug)]
pub struct Tentative {
    inverse: Inverse,
}

impl Tentative {
    /// An edge with this id was optimistically added.
    pub fn edge_added(id: impl Into<EntityId>) -> Self {
        Self {
            inverse: Inverse::RemoveEdge(id.into()),
        }
    }

    /// A node with this id was optimistically added.
    pub fn node_added(id: impl Into<EntityId>) -> Self {
        Self {
            inverse: Inverse::RemoveNode(id.into()),
        }
    }

    /// A node was optimistically moved away from `previous`.
    pub fn moved(id: impl Into<EntityId>, previous: Position) -> Self {
        Self {
            inverse: Inverse::RestorePosition(id.into(), previous),
        }
    }

    /// The remote call succeeded; the local change stands.
    pub fn commit(self) {}

    /// The remote call failed; undo exactly the recorded change.
    pub fn rollback(self, store: &mut GraphStore) {
        match self.inverse {
            Inverse::RemoveEdge(id) => {
                store.remove_edge(&id);
            }
            Inverse::RemoveNode(id) => {
                store.remove_node(&id);
            }
            Inverse::RestorePosition(id, previous) => {
                store.apply_position_change(&id, previous);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rootline_core::person::PersonNode;

    fn person(id: &str) -> PersonNode {
        PersonNode {
            id: id.to_string(),
            name: id.to_string(),
            birth_date: None,
            death_date: None,
            bio: None,
            photo_url: None,
            x: Some(0.0),
            y: Some(0.0),
        }
    }

    fn store_with_nodes() -> GraphStore {
        let mut store = GraphStore::new();
        store.load(&[person("a"), person("b")], &[]);
        store
    }

    #[test]
    fn rollback_removes_only_the_tentative_edge() {
        let mut store = GraphStore::new();
        store.load(&[person("a"), person("b"), person("c")], &[]);
        let kept = store.add_edge("a", "c").unwrap();
        let id = store.add_edge("a", "b").unwrap();

        Tentative::edge_added(id.clone()).rollback(&mut store);

        assert!(store.edge(&id).is_none());
        assert!(store.edge(&kept).is_some());
    }

    #[test]
    fn commit_keeps_the_change() {
        let mut store = store_with_nodes();
        let id = store.add_edge("a", "b").unwrap();
        Tentative::edge_added(id.clone()).commit();
        assert!(store.edge(&id).is_some());
    }

    #[test]
    fn rollback_restores_a_previous_position() {
        let mut store = store_with_nodes();
        let previous = store.node("a").unwrap().position;
        store.apply_position_change("a", Position::new(500.0, 500.0));

        Tentative::moved("a", previous).rollback(&mut store);

        assert_eq!(store.node("a").unwrap().position, previous);
    }

    #[test]
    fn rollback_removes_a_tentative_node() {
        let mut store = store_with_nodes();
        store.upsert_node(&person("tmp"));
        Tentative::node_added("tmp").rollback(&mut store);
        assert!(!store.contains_node("tmp"));
    }
}
