use crate::edge::NodeId;
use thiserror::Error;

/// Reasons a registry shortest-path query can come back empty.
///
/// The two cases stay distinct so transports can report them separately
/// even when they share a status code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Graph not found: {0}")]
    GraphNotFound(String),
    #[error("Path not found from {start} to {end}")]
    NoPath { start: NodeId, end: NodeId },
}
