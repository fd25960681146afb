//! The graph registry.
//!
//! Maps opaque string ids to live graphs. Ids come from a counter that
//! only moves forward, so an id is never handed out twice in the life of
//! a registry, even after its graph is deleted.

use crate::edge::{Edge, NodeId};
use crate::error::QueryError;
use crate::graph::Graph;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Identifier assigned to a graph on creation.
///
/// Displays as the decimal string used as the registry key and
/// serializes as a plain JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GraphId(u64);

impl GraphId {
    /// Returns the raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for GraphId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registry-wide counters for the status endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryStats {
    /// Number of live graphs.
    pub graphs: usize,
    /// Most recently assigned id, 0 if none yet.
    pub last_id: u64,
}

#[derive(Debug, Default)]
struct Inner {
    graphs: HashMap<String, Arc<Graph>>,
    last_id: u64,
}

/// Concurrency-safe store of graphs keyed by id.
///
/// A single mutex guards the map and the counter. It is only held for
/// map bookkeeping; graph construction and traversal happen outside it.
#[derive(Debug, Default)]
pub struct Registry {
    inner: Mutex<Inner>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from `edges` and registers it under a fresh id.
    pub fn create<I>(&self, edges: I) -> GraphId
    where
        I: IntoIterator<Item = Edge>,
    {
        let graph = Arc::new(Graph::from_edges(edges));
        let stats = graph.stats();

        let id = {
            let mut inner = self.inner.lock();
            inner.last_id += 1;
            let id = GraphId(inner.last_id);
            inner.graphs.insert(id.to_string(), graph);
            id
        };

        debug!(
            "Created graph {} ({} nodes, {} edges)",
            id, stats.node_count, stats.edge_count
        );
        id
    }

    /// Returns a shared handle to the graph registered under `id`.
    ///
    /// The handle stays valid after the entry is deleted.
    pub fn lookup(&self, id: &str) -> Option<Arc<Graph>> {
        self.inner.lock().graphs.get(id).cloned()
    }

    /// Removes the graph registered under `id`.
    ///
    /// Returns false if there was no such entry.
    pub fn delete(&self, id: &str) -> bool {
        let removed = self.inner.lock().graphs.remove(id).is_some();
        if removed {
            debug!("Deleted graph {}", id);
        }
        removed
    }

    /// Looks up `id` and runs a shortest-path query against it.
    ///
    /// The registry lock is released before the traversal starts.
    pub fn shortest_path(
        &self,
        id: &str,
        start: NodeId,
        end: NodeId,
    ) -> Result<Vec<NodeId>, QueryError> {
        let graph = self
            .lookup(id)
            .ok_or_else(|| QueryError::GraphNotFound(id.to_string()))?;

        let path = graph
            .shortest_path(start, end)
            .ok_or(QueryError::NoPath { start, end })?;

        debug!("Graph {}: path {} -> {} has {} hops", id, start, end, path.len() - 1);
        Ok(path)
    }

    /// Returns the number of live graphs.
    pub fn len(&self) -> usize {
        self.inner.lock().graphs.len()
    }

    /// Returns true if no graphs are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the ids of all live graphs in creation order.
    pub fn ids(&self) -> Vec<GraphId> {
        let mut ids: Vec<GraphId> = self
            .inner
            .lock()
            .graphs
            .keys()
            .filter_map(|key| key.parse().ok().map(GraphId))
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Returns live graph count and the last assigned id.
    pub fn stats(&self) -> RegistryStats {
        let inner = self.inner.lock();
        RegistryStats {
            graphs: inner.graphs.len(),
            last_id: inner.last_id,
        }
    }
}
