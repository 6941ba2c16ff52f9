//! Shared primitive types and canvas defaults.

use serde::{Deserialize, Serialize};

/// Entity identifier as issued by the backend.
///
/// Backends emit either UUIDs or stringified numeric ids; both travel
/// through the client unchanged, so ids are plain strings.
pub type EntityId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// A node position on the tree canvas, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Fallback position for nodes the backend returns without coordinates.
pub const DEFAULT_NODE_POSITION: Position = Position { x: 250.0, y: 100.0 };

/// Position assigned to a freshly created person before the user moves it.
pub const NEW_NODE_POSITION: Position = Position { x: 300.0, y: 300.0 };
