//! Waypoint Server - network transports for the graph registry
//!
//! This crate exposes a `waypoint_graph::Registry` over the network.
//!
//! The server supports:
//! - HTTP REST (`POST /graph`, `GET /graph/{id}/shortest_path`,
//!   `DELETE /graph/{id}`, `GET /status`)
//! - JSON-RPC 2.0 over WebSocket (`graph.create`, `graph.shortestPath`,
//!   `graph.delete`, `graph.info`)
//!
//! Both transports share one registry, so a graph created over one is
//! visible to the other.

use std::sync::Arc;
use waypoint_graph::Registry;

/// Registry shared across connections and transports.
pub type SharedRegistry = Arc<Registry>;

mod config;
mod handlers;
mod http;
mod protocol;
mod server;

pub use config::{ServerConfig, DEFAULT_HTTP_PORT};
pub use http::{
    router, router_with_body_limit, ApiError, CreateResponse, ErrorResponse, HttpServer,
    PathResponse,
};
pub use protocol::{Request, Response, RpcError, GRAPH_NOT_FOUND, PATH_NOT_FOUND};
pub use server::RpcServer;

/// Runs every transport enabled in `config` until one of them fails.
pub async fn serve(
    config: ServerConfig,
    registry: SharedRegistry,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let http =
        HttpServer::new(registry.clone(), config.http_addr).with_body_limit(config.max_body_bytes);

    match config.rpc_addr {
        Some(rpc_addr) => {
            let rpc = RpcServer::new(registry, rpc_addr);
            tokio::try_join!(http.run(), rpc.run())?;
        }
        None => http.run().await?,
    }

    Ok(())
}
