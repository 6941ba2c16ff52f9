//! Interaction controller for the tree editor.
//!
//! Turns user gestures (connect, drag, click, delete, save) into graph
//! store mutations plus matching backend calls, with optimistic updates
//! rolled back exactly on failure. One controller exists per open family
//! tree and is discarded on navigation.

use std::sync::Arc;

use chrono::NaiveDate;
use rootline_core::backend::{PhotoUpload, TreeBackend};
use rootline_core::error::CoreError;
use rootline_core::person::{
    validate_lifespan, validate_person_name, NewPerson, PersonNode, PersonUpdate,
};
use rootline_core::relation::RelationEdge;
use rootline_core::types::{EntityId, Position, NEW_NODE_POSITION};
use rootline_events::bus::{event_types, AppEvent, EventBus};

use crate::batcher::PendingPositions;
use crate::store::{GraphStore, VisualEdge, VisualNode};
use crate::tentative::Tentative;

/// Person editor form contents.
///
/// One form serves both creation and update; which operation runs is
/// decided solely by whether a node is currently selected.
#[derive(Debug, Clone, Default)]
pub struct PersonForm {
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub death_date: Option<NaiveDate>,
    pub bio: String,
    pub photo: Option<PhotoUpload>,
}

/// Editor session for one family's tree.
pub struct TreeController<B: TreeBackend> {
    family_id: EntityId,
    backend: B,
    events: Arc<EventBus>,
    store: GraphStore,
    pending: PendingPositions,
    /// Edge records as last fetched, used to map visual edges back to
    /// backend ids when deleting.
    remote_edges: Vec<RelationEdge>,
    selected_node: Option<EntityId>,
    selected_edge: Option<EntityId>,
}

impl<B: TreeBackend> TreeController<B> {
    /// Create a controller for one family. Call [`refresh`](Self::refresh)
    /// to populate it.
    pub fn new(family_id: impl Into<EntityId>, backend: B, events: Arc<EventBus>) -> Self {
        Self {
            family_id: family_id.into(),
            backend,
            events,
            store: GraphStore::new(),
            pending: PendingPositions::new(),
            remote_edges: Vec::new(),
            selected_node: None,
            selected_edge: None,
        }
    }

    /// The local visual graph, for rendering.
    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    /// Number of nodes with unsaved position changes.
    pub fn pending_position_count(&self) -> usize {
        self.pending.len()
    }

    /// Whether the "save positions" affordance should be shown.
    pub fn can_save_positions(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn selected_node(&self) -> Option<&VisualNode> {
        self.selected_node.as_deref().and_then(|id| self.store.node(id))
    }

    pub fn selected_edge(&self) -> Option<&VisualEdge> {
        self.selected_edge.as_deref().and_then(|id| self.store.edge(id))
    }

    /// Fetch the authoritative node/edge lists and replace local state.
    pub async fn refresh(&mut self) -> Result<(), CoreError> {
        let nodes = self
            .backend
            .fetch_nodes(&self.family_id)
            .await
            .map_err(|e| self.fail(e))?;
        let edges = self
            .backend
            .fetch_edges(&self.family_id)
            .await
            .map_err(|e| self.fail(e))?;

        self.store.load(&nodes, &edges);
        self.remote_edges = edges;

        tracing::debug!(
            family = %self.family_id,
            nodes = self.store.nodes().len(),
            edges = self.store.edges().len(),
            "Tree loaded",
        );
        self.events.publish(
            AppEvent::new(event_types::TREE_LOADED).with_entity("family", self.family_id.clone()),
        );
        Ok(())
    }

    /// The user drew an edge from `source` to `target`.
    ///
    /// Self-loops and duplicate directed edges are rejected before any
    /// network call. The visual edge is added optimistically and removed
    /// again, by id, if the backend rejects the creation.
    pub async fn connect(&mut self, source: &str, target: &str) -> Result<EntityId, CoreError> {
        let edge_id = self.store.add_edge(source, target).map_err(|e| self.fail(e))?;
        let guard = Tentative::edge_added(edge_id.clone());

        let created = self
            .backend
            .create_edge(&self.family_id, source, target)
            .await;
        match created {
            Ok(edge) => {
                guard.commit();
                // The server id is reconciled on the next refresh; keep
                // the record so deletion can resolve it meanwhile.
                self.remote_edges.push(edge);
                self.events.publish(
                    AppEvent::new(event_types::EDGE_CREATED)
                        .with_entity("edge", edge_id.clone()),
                );
                Ok(edge_id)
            }
            Err(e) => {
                guard.rollback(&mut self.store);
                Err(self.fail(e))
            }
        }
    }

    /// The user finished dragging a node.
    ///
    /// Local-only: the new position is applied to the store and queued in
    /// the batcher; nothing is persisted until
    /// [`save_positions`](Self::save_positions).
    pub fn drag_stop(&mut self, node: &str, position: Position) {
        if self.store.apply_position_change(node, position) {
            self.pending.record(node.to_string(), position);
        }
    }

    /// Flush all pending position changes as one batch.
    ///
    /// Entries for since-deleted nodes are dropped silently. An empty
    /// filtered batch is a successful no-op. The per-node updates run
    /// concurrently; if any fails the whole batch is reported failed and
    /// kept for retry (already-applied remote writes are not compensated).
    pub async fn save_positions(&mut self) -> Result<usize, CoreError> {
        self.pending.retain_existing(&self.store.node_ids());

        if self.pending.is_empty() {
            self.pending.clear();
            self.events
                .publish(AppEvent::new(event_types::TREE_POSITIONS_SAVED));
            return Ok(0);
        }

        let batch = self.pending.snapshot();
        let updates = batch
            .iter()
            .map(|(id, position)| self.backend.update_position(id, *position));

        if let Err(e) = futures::future::try_join_all(updates).await {
            // Pending entries stay untouched so the user can retry.
            return Err(self.fail(e));
        }

        let saved = batch.len();
        self.pending.clear();
        tracing::debug!(family = %self.family_id, saved, "Positions saved");
        self.events.publish(
            AppEvent::new(event_types::TREE_POSITIONS_SAVED)
                .with_message(format!("Saved {saved} positions")),
        );
        Ok(saved)
    }

    /// Select a node for viewing. Returns the node, if it exists.
    pub fn click_node(&mut self, id: &str) -> Option<&VisualNode> {
        if self.store.contains_node(id) {
            self.selected_node = Some(id.to_string());
        }
        self.selected_node()
    }

    /// Select an edge, typically to offer deletion.
    pub fn click_edge(&mut self, id: &str) -> Option<&VisualEdge> {
        if self.store.edge(id).is_some() {
            self.selected_edge = Some(id.to_string());
        }
        self.selected_edge()
    }

    /// Clear both selections (dialog dismissed, "add person" pressed).
    pub fn clear_selection(&mut self) {
        self.selected_node = None;
        self.selected_edge = None;
    }

    /// Delete the selected node remotely, then prune it and every edge
    /// touching it from the local graph.
    ///
    /// Not optimistic: a failed delete leaves local state untouched.
    pub async fn delete_selected_node(&mut self) -> Result<(), CoreError> {
        let node_id = self
            .selected_node
            .clone()
            .ok_or_else(|| CoreError::Validation("No person selected".to_string()))?;

        self.backend
            .delete_node(&node_id)
            .await
            .map_err(|e| self.fail(e))?;

        // The backend cascades edge deletion, but prune locally too so no
        // stale edge renders before the next fetch.
        for edge_id in self.store.edges_touching(&node_id) {
            self.store.remove_edge(&edge_id);
        }
        self.remote_edges.retain(|e| !e.touches(&node_id));
        self.store.remove_node(&node_id);
        self.selected_node = None;

        self.events
            .publish(AppEvent::new(event_types::NODE_DELETED).with_entity("node", node_id));
        Ok(())
    }

    /// Delete the selected edge remotely, then locally.
    ///
    /// The selected visual edge may carry a locally generated id; it is
    /// matched back to its backend record by id, then by endpoints, and
    /// finally the visual id is used as-is.
    pub async fn delete_selected_edge(&mut self) -> Result<(), CoreError> {
        let visual = self
            .selected_edge()
            .cloned()
            .ok_or_else(|| CoreError::Validation("No relation selected".to_string()))?;

        let backend_id = self
            .remote_edges
            .iter()
            .find(|e| e.id == visual.id || e.connects(&visual.source, &visual.target))
            .map(|e| e.id.clone())
            .unwrap_or_else(|| visual.id.clone());

        self.backend
            .delete_edge(&backend_id)
            .await
            .map_err(|e| self.fail(e))?;

        self.store.remove_edge(&visual.id);
        self.remote_edges.retain(|e| e.id != backend_id);
        self.selected_edge = None;

        self.events
            .publish(AppEvent::new(event_types::EDGE_DELETED).with_entity("edge", visual.id));
        Ok(())
    }

    /// Create or update a person from the editor form.
    ///
    /// Updates the selected node when one is set, creates a new person
    /// otherwise; there is no explicit mode flag. The selection is
    /// cleared after a successful save.
    pub async fn save_person(&mut self, form: PersonForm) -> Result<PersonNode, CoreError> {
        validate_person_name(&form.name).map_err(|e| self.fail(e))?;
        validate_lifespan(form.birth_date, form.death_date).map_err(|e| self.fail(e))?;

        let saved = match self.selected_node.clone() {
            Some(node_id) => {
                let update = PersonUpdate {
                    name: form.name,
                    birth_date: form.birth_date,
                    death_date: form.death_date,
                    bio: form.bio,
                };
                let person = self
                    .backend
                    .update_node(&node_id, &update, form.photo)
                    .await
                    .map_err(|e| self.fail(e))?;
                self.events.publish(
                    AppEvent::new(event_types::NODE_UPDATED)
                        .with_entity("node", person.id.clone()),
                );
                person
            }
            None => {
                let attrs = NewPerson {
                    name: form.name,
                    birth_date: form.birth_date,
                    x: NEW_NODE_POSITION.x,
                    y: NEW_NODE_POSITION.y,
                };
                let person = self
                    .backend
                    .create_node(&self.family_id, &attrs)
                    .await
                    .map_err(|e| self.fail(e))?;
                self.events.publish(
                    AppEvent::new(event_types::NODE_CREATED)
                        .with_entity("node", person.id.clone()),
                );
                person
            }
        };

        self.store.upsert_node(&saved);
        self.clear_selection();
        Ok(saved)
    }

    // ---- private helpers ----

    /// Surface a failure on the event bus and hand the error back.
    fn fail(&self, err: CoreError) -> CoreError {
        tracing::warn!(family = %self.family_id, error = %err, "Tree operation failed");
        self.events.publish(
            AppEvent::new(event_types::TREE_ERROR).with_message(err.to_string()),
        );
        err
    }
}
