//! Tree editor engine: local graph state, gesture handling, and
//! conflict-safe persistence of edits.
//!
//! The engine is transport-agnostic; it drives any
//! [`rootline_core::backend::TreeBackend`] implementation and publishes
//! UI notifications on a [`rootline_events::EventBus`].

pub mod batcher;
pub mod controller;
pub mod store;
pub mod tentative;

pub use batcher::PendingPositions;
pub use controller::{PersonForm, TreeController};
pub use store::{GraphStore, VisualEdge, VisualNode};
