//! Core graph data structure.
//!
//! A `Graph` is an undirected adjacency list keyed by node id. The
//! adjacency sits behind a read/write lock so many shortest-path queries
//! can run at once while edge insertion gets exclusive access.

use crate::edge::{Edge, NodeId};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// Adjacency lists plus the number of edges that built them.
#[derive(Debug, Default)]
struct Adjacency {
    neighbors: HashMap<NodeId, Vec<NodeId>>,
    edge_count: usize,
}

/// An undirected, unweighted graph.
///
/// Neighbor lists keep insertion order and are never deduplicated: adding
/// the same edge twice leaves two entries on each side. Traversal order
/// follows insertion order, which is what breaks ties between equally
/// short paths.
#[derive(Debug, Default)]
pub struct Graph {
    adjacency: RwLock<Adjacency>,
}

/// Graph statistics for the info endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
}

impl Graph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph by adding every edge in order.
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = Edge>,
    {
        let graph = Self::new();
        {
            // One write guard for the whole load instead of one per edge.
            let mut adj = graph.adjacency.write();
            for edge in edges {
                insert_edge(&mut adj, edge.u, edge.v);
            }
        }
        graph
    }

    /// Adds an undirected edge between `u` and `v`.
    ///
    /// `u == v` is allowed; the node then lists itself twice.
    pub fn add_edge(&self, u: NodeId, v: NodeId) {
        let mut adj = self.adjacency.write();
        insert_edge(&mut adj, u, v);
    }

    /// Finds a shortest path from `start` to `end` by edge count.
    ///
    /// Returns the nodes along the path, both endpoints included, or `None`
    /// when `end` is unreachable. A query from a node to itself always
    /// yields `[start]`, even if the node is not in the graph.
    pub fn shortest_path(&self, start: NodeId, end: NodeId) -> Option<Vec<NodeId>> {
        if start == end {
            return Some(vec![start]);
        }

        let adj = self.adjacency.read();

        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut predecessors: HashMap<NodeId, NodeId> = HashMap::new();
        let mut frontier: VecDeque<NodeId> = VecDeque::new();

        visited.insert(start);
        frontier.push_back(start);

        while let Some(node) = frontier.pop_front() {
            if node == end {
                return Some(reconstruct_path(&predecessors, start, end));
            }

            let Some(neighbors) = adj.neighbors.get(&node) else {
                continue;
            };

            for &neighbor in neighbors {
                // Mark on discovery so each node is queued once, at its
                // minimum distance.
                if visited.insert(neighbor) {
                    predecessors.insert(neighbor, node);
                    frontier.push_back(neighbor);
                }
            }
        }

        None
    }

    /// Returns a copy of a node's neighbor list, in insertion order.
    #[cfg(test)]
    pub(crate) fn neighbors(&self, node: NodeId) -> Vec<NodeId> {
        self.adjacency
            .read()
            .neighbors
            .get(&node)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns true if any edge mentions `node`.
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.adjacency.read().neighbors.contains_key(&node)
    }

    /// Returns the number of distinct nodes.
    pub fn node_count(&self) -> usize {
        self.adjacency.read().neighbors.len()
    }

    /// Returns the number of edges added, duplicates included.
    pub fn edge_count(&self) -> usize {
        self.adjacency.read().edge_count
    }

    /// Returns node and edge counts from a single read.
    pub fn stats(&self) -> GraphStats {
        let adj = self.adjacency.read();
        GraphStats {
            node_count: adj.neighbors.len(),
            edge_count: adj.edge_count,
        }
    }
}

fn insert_edge(adj: &mut Adjacency, u: NodeId, v: NodeId) {
    adj.neighbors.entry(u).or_default().push(v);
    adj.neighbors.entry(v).or_default().push(u);
    adj.edge_count += 1;
}

/// Walks predecessor links from `end` back to `start`, then reverses.
///
/// Every node on the chain other than `start` was recorded on discovery,
/// so the walk terminates at `start`.
fn reconstruct_path(
    predecessors: &HashMap<NodeId, NodeId>,
    start: NodeId,
    end: NodeId,
) -> Vec<NodeId> {
    let mut path = vec![end];
    let mut current = end;

    while current != start {
        match predecessors.get(&current) {
            Some(&prev) => {
                path.push(prev);
                current = prev;
            }
            None => break,
        }
    }

    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn build(pairs: &[(NodeId, NodeId)]) -> Graph {
        Graph::from_edges(pairs.iter().copied().map(Edge::from))
    }

    fn chain() -> Graph {
        build(&[(1, 2), (2, 3), (3, 4)])
    }

    #[test]
    fn test_linear_chain() {
        let graph = chain();
        assert_eq!(graph.shortest_path(1, 4), Some(vec![1, 2, 3, 4]));
        assert_eq!(graph.shortest_path(4, 1), Some(vec![4, 3, 2, 1]));
    }

    #[test]
    fn test_unreachable_node() {
        let graph = chain();
        assert_eq!(graph.shortest_path(1, 5), None);
    }

    #[test]
    fn test_unknown_start() {
        let graph = chain();
        assert_eq!(graph.shortest_path(99, 1), None);
    }

    #[test]
    fn test_same_endpoints_short_circuit() {
        let graph = Graph::new();
        assert_eq!(graph.shortest_path(7, 7), Some(vec![7]));

        let graph = chain();
        assert_eq!(graph.shortest_path(3, 3), Some(vec![3]));
    }

    #[test]
    fn test_disconnected_components() {
        let graph = build(&[(1, 2), (3, 4)]);
        assert_eq!(graph.shortest_path(1, 2), Some(vec![1, 2]));
        assert_eq!(graph.shortest_path(1, 4), None);
    }

    #[test]
    fn test_prefers_fewer_hops() {
        // 1-2-3-4-5 plus a shortcut 1-5
        let graph = build(&[(1, 2), (2, 3), (3, 4), (4, 5), (1, 5)]);
        assert_eq!(graph.shortest_path(1, 5), Some(vec![1, 5]));
        assert_eq!(graph.shortest_path(2, 5), Some(vec![2, 1, 5]));
    }

    #[test]
    fn test_ties_follow_insertion_order() {
        // Diamond: 1-2-4 and 1-3-4 are both two hops.
        let graph = build(&[(1, 2), (1, 3), (2, 4), (3, 4)]);
        assert_eq!(graph.shortest_path(1, 4), Some(vec![1, 2, 4]));

        let graph = build(&[(1, 3), (1, 2), (3, 4), (2, 4)]);
        assert_eq!(graph.shortest_path(1, 4), Some(vec![1, 3, 4]));
    }

    #[test]
    fn test_adjacency_is_symmetric() {
        let graph = Graph::new();
        graph.add_edge(10, 20);
        assert_eq!(graph.neighbors(10), vec![20]);
        assert_eq!(graph.neighbors(20), vec![10]);
        assert!(graph.neighbors(30).is_empty());
    }

    #[test]
    fn test_duplicate_edges_are_kept() {
        let graph = build(&[(1, 2), (1, 2)]);
        assert_eq!(graph.neighbors(1), vec![2, 2]);
        assert_eq!(graph.neighbors(2), vec![1, 1]);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.shortest_path(1, 2), Some(vec![1, 2]));
    }

    #[test]
    fn test_self_loop() {
        let graph = build(&[(5, 5), (5, 6)]);
        assert_eq!(graph.neighbors(5), vec![5, 5, 6]);
        assert_eq!(graph.shortest_path(5, 6), Some(vec![5, 6]));
    }

    #[test]
    fn test_negative_ids() {
        let graph = build(&[(-1, 0), (0, i64::MAX)]);
        assert_eq!(graph.shortest_path(-1, i64::MAX), Some(vec![-1, 0, i64::MAX]));
    }

    #[test]
    fn test_stats() {
        let graph = chain();
        assert_eq!(
            graph.stats(),
            GraphStats {
                node_count: 4,
                edge_count: 3
            }
        );
        assert!(graph.contains_node(4));
        assert!(!graph.contains_node(5));
    }

    #[test]
    fn test_long_path_does_not_recurse() {
        let graph = Graph::from_edges((0..100_000).map(|i: NodeId| Edge::new(i, i + 1)));
        let path = graph.shortest_path(0, 100_000).unwrap();
        assert_eq!(path.len(), 100_001);
        assert_eq!(path.first(), Some(&0));
        assert_eq!(path.last(), Some(&100_000));
    }

    #[test]
    fn test_concurrent_queries() {
        let graph = Arc::new(build(&[(1, 2), (2, 3), (3, 4), (4, 5)]));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let graph = Arc::clone(&graph);
                thread::spawn(move || {
                    for _ in 0..200 {
                        assert_eq!(graph.shortest_path(1, 5), Some(vec![1, 2, 3, 4, 5]));
                        assert_eq!(graph.shortest_path(1, 9), None);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    fn test_writes_interleaved_with_reads() {
        let graph = Arc::new(build(&[(0, 1)]));

        let writer = {
            let graph = Arc::clone(&graph);
            thread::spawn(move || {
                for i in 1..500 {
                    graph.add_edge(i, i + 1);
                }
            })
        };

        let reader = {
            let graph = Arc::clone(&graph);
            thread::spawn(move || {
                for _ in 0..500 {
                    // Whatever prefix of the chain is visible, any path
                    // found must start at 0 and be contiguous.
                    if let Some(path) = graph.shortest_path(0, 250) {
                        assert_eq!(path, (0..=250).collect::<Vec<_>>());
                    }
                }
            })
        };

        writer.join().unwrap();
        reader.join().unwrap();
        assert_eq!(graph.edge_count(), 500);
        assert_eq!(graph.shortest_path(0, 500).map(|p| p.len()), Some(501));
    }
}
