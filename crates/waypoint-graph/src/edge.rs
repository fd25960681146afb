//! Edge records for building graphs.
//!
//! Graphs in Waypoint are undirected and unweighted, so an edge is just
//! an unordered pair of node ids. The `u`/`v` field names are the wire
//! format clients send when creating a graph.

use serde::{Deserialize, Serialize};

/// Identifier of a node within a single graph.
///
/// Any integer is a valid node id; nodes come into existence the first
/// time an edge mentions them.
pub type NodeId = i64;

/// An undirected edge between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub u: NodeId,
    pub v: NodeId,
}

impl Edge {
    /// Creates a new edge.
    pub fn new(u: NodeId, v: NodeId) -> Self {
        Self { u, v }
    }

    /// Returns true if this edge joins `a` and `b` in either orientation.
    pub fn connects(&self, a: NodeId, b: NodeId) -> bool {
        (self.u == a && self.v == b) || (self.u == b && self.v == a)
    }
}

impl From<(NodeId, NodeId)> for Edge {
    fn from((u, v): (NodeId, NodeId)) -> Self {
        Self { u, v }
    }
}
