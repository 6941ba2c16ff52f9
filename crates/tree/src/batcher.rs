//! Pending-position batcher.
//!
//! Node drags are local-only; each drag-stop records the node's final
//! position here, and an explicit "save positions" action flushes the
//! whole batch in one go. This avoids a network call per pixel of
//! movement and collapses repeated drags of the same node to its latest
//! position.

use std::collections::{HashMap, HashSet};

use rootline_core::types::{EntityId, Position};

/// Accumulated position changes awaiting an explicit flush.
///
/// State machine: empty → dirty(n) as drags stop → empty again on a
/// successful flush. A failed flush leaves the batch untouched so the
/// user can retry.
#[derive(Debug, Default)]
pub struct PendingPositions {
    entries: HashMap<EntityId, Position>,
}

impl PendingPositions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a node's latest position. Last write wins per node id.
    pub fn record(&mut self, node: impl Into<EntityId>, position: Position) {
        self.entries.insert(node.into(), position);
    }

    /// Number of distinct nodes moved since the last flush.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there is anything to save. Drives the visibility of the
    /// "save positions" affordance.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, node: &str) -> Option<Position> {
        self.entries.get(node).copied()
    }

    /// Drop entries for nodes that no longer exist.
    ///
    /// Nodes deleted after being dragged are silently excluded from the
    /// flush rather than failing it.
    pub fn retain_existing(&mut self, live: &HashSet<EntityId>) {
        self.entries.retain(|id, _| live.contains(id));
    }

    /// Current batch contents, for issuing the flush requests.
    pub fn snapshot(&self) -> Vec<(EntityId, Position)> {
        self.entries
            .iter()
            .map(|(id, pos)| (id.clone(), *pos))
            .collect()
    }

    /// Forget everything (successful flush or explicit discard).
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_drags_collapse_to_latest_position() {
        let mut pending = PendingPositions::new();
        pending.record("x", Position::new(1.0, 1.0));
        pending.record("x", Position::new(30.0, 40.0));
        pending.record("x", Position::new(50.0, 80.0));

        assert_eq!(pending.len(), 1);
        assert_eq!(pending.get("x"), Some(Position::new(50.0, 80.0)));
    }

    #[test]
    fn distinct_nodes_keep_distinct_entries() {
        let mut pending = PendingPositions::new();
        pending.record("x", Position::new(1.0, 1.0));
        pending.record("y", Position::new(2.0, 2.0));
        assert_eq!(pending.len(), 2);
    }

    #[test]
    fn retain_existing_drops_stale_ids() {
        let mut pending = PendingPositions::new();
        pending.record("live", Position::new(1.0, 1.0));
        pending.record("deleted", Position::new(2.0, 2.0));

        let live: HashSet<EntityId> = ["live".to_string()].into_iter().collect();
        pending.retain_existing(&live);

        assert_eq!(pending.len(), 1);
        assert!(pending.get("deleted").is_none());
    }

    #[test]
    fn clear_empties_the_batch() {
        let mut pending = PendingPositions::new();
        pending.record("x", Position::new(1.0, 1.0));
        pending.clear();
        assert!(pending.is_empty());
    }
}
