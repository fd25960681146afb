//! Request handlers for the JSON-RPC methods.
//!
//! Each handler implements one method and maps registry outcomes onto
//! protocol responses.

use crate::protocol::{
    CreateParams, DeleteParams, Response, ShortestPathParams, GRAPH_NOT_FOUND, PATH_NOT_FOUND,
};
use crate::SharedRegistry;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use waypoint_graph::{GraphId, QueryError};

/// Handles the graph.info method.
pub fn handle_info(registry: &SharedRegistry, id: Option<Value>) -> Response {
    let stats = registry.stats();

    #[derive(Serialize)]
    struct InfoResult {
        #[serde(rename = "graphCount")]
        graph_count: usize,
        #[serde(rename = "lastId")]
        last_id: u64,
        ids: Vec<GraphId>,
        version: &'static str,
    }

    Response::success(
        id,
        InfoResult {
            graph_count: stats.graphs,
            last_id: stats.last_id,
            ids: registry.ids(),
            version: env!("CARGO_PKG_VERSION"),
        },
    )
}

/// Handles the graph.create method.
pub fn handle_create(registry: &SharedRegistry, id: Option<Value>, params: CreateParams) -> Response {
    debug!("Create request with {} edges", params.edges.len());

    let graph_id = registry.create(params.edges);

    Response::success(id, serde_json::json!({ "id": graph_id }))
}

/// Handles the graph.shortestPath method.
pub fn handle_shortest_path(
    registry: &SharedRegistry,
    id: Option<Value>,
    params: ShortestPathParams,
) -> Response {
    match registry.shortest_path(&params.id, params.start, params.end) {
        Ok(path) => {
            let hops = path.len() - 1;
            Response::success(id, serde_json::json!({ "path": path, "hops": hops }))
        }
        Err(e @ QueryError::GraphNotFound(_)) => Response::error(id, GRAPH_NOT_FOUND, e.to_string()),
        Err(e @ QueryError::NoPath { .. }) => Response::error(id, PATH_NOT_FOUND, e.to_string()),
    }
}

/// Handles the graph.delete method.
pub fn handle_delete(registry: &SharedRegistry, id: Option<Value>, params: DeleteParams) -> Response {
    if registry.delete(&params.id) {
        Response::success(id, serde_json::json!({ "deleted": true }))
    } else {
        Response::error(
            id,
            GRAPH_NOT_FOUND,
            QueryError::GraphNotFound(params.id).to_string(),
        )
    }
}
