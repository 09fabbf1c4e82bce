//! Serializable views of a filter graph, for logging and tooling.

use crate::graph::id::{ConnectionId, FilterId};
use crate::graph::port::{PortDirection, PortState};
use serde::Serialize;

/// Snapshot of a single port.
#[derive(Debug, Clone, Serialize)]
pub struct PortSnapshot {
    pub name: String,
    pub direction: PortDirection,
    pub state: PortState,
    pub has_frame: bool,
}

/// Snapshot of a single filter.
#[derive(Debug, Clone, Serialize)]
pub struct FilterSnapshot {
    pub id: FilterId,
    pub name: String,
    pub ports: Vec<PortSnapshot>,
}

/// Snapshot of a single connection.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionSnapshot {
    pub id: ConnectionId,
    pub from_filter: FilterId,
    pub output: String,
    pub to_filter: FilterId,
    pub input: String,
}

/// Complete topology snapshot of a filter graph.
#[derive(Debug, Clone, Serialize)]
pub struct GraphSnapshot {
    pub filters: Vec<FilterSnapshot>,
    pub connections: Vec<ConnectionSnapshot>,
}

impl GraphSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
