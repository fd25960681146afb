//! Waypoint Graph - in-memory undirected graphs and their registry
//!
//! This crate holds the core of Waypoint: an undirected adjacency-list
//! graph with breadth-first shortest paths, and a registry that hands
//! out ids for graphs and shares them safely between concurrent callers.
//!
//! # Architecture
//!
//! - `Graph` guards its adjacency with a read/write lock, so queries run
//!   concurrently while edge insertion is exclusive.
//! - `Registry` guards its id map and counter with one mutex and hands
//!   out `Arc<Graph>` handles, so a delete never pulls a graph out from
//!   under a running query.
//!
//! # Example
//!
//! ```
//! use waypoint_graph::{Edge, Registry};
//!
//! let registry = Registry::new();
//! let id = registry.create(vec![Edge::new(1, 2), Edge::new(2, 3), Edge::new(3, 4)]);
//!
//! let path = registry.shortest_path(&id.to_string(), 1, 4).unwrap();
//! assert_eq!(path, vec![1, 2, 3, 4]);
//!
//! assert!(registry.delete(&id.to_string()));
//! ```

mod edge;
mod error;
mod graph;
mod registry;

pub use edge::{Edge, NodeId};
pub use error::QueryError;
pub use graph::{Graph, GraphStats};
pub use registry::{GraphId, Registry, RegistryStats};
