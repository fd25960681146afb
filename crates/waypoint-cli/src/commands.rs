//! CLI command implementations.

use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use waypoint_graph::{Edge, Graph, NodeId, Registry};
use waypoint_server::{serve as serve_all, ServerConfig};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid edge list in {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("no path from {start} to {end}")]
    NoPath { start: NodeId, end: NodeId },
}

/// Start the Waypoint server.
pub async fn serve(
    port: u16,
    rpc_port: Option<u16>,
    headless: bool,
    max_body_bytes: Option<usize>,
) -> Result<()> {
    let config =
        ServerConfig::from_ports(port, rpc_port, headless).with_max_body_bytes(max_body_bytes);

    if headless {
        println!("{}", "Starting Waypoint server in headless mode...".cyan());
    } else {
        println!("{}", "Starting Waypoint server...".cyan());
    }

    println!("{} REST API on http://{}", "✓".green(), config.http_addr);
    if let Some(rpc_addr) = config.rpc_addr {
        println!("{} JSON-RPC on ws://{}", "✓".green(), rpc_addr);
    }
    if headless {
        println!("  Headless mode: accepting connections from any host");
    }
    if let Some(limit) = config.max_body_bytes {
        println!("  Request bodies capped at {} bytes", limit);
    }
    println!("  Press {} to stop", "Ctrl+C".cyan());

    let registry = Arc::new(Registry::new());
    info!("Registry initialized");

    serve_all(config, registry).await
}

/// Reads an edge list in the `POST /graph` body format.
pub fn load_edges(file: &Path) -> std::result::Result<Vec<Edge>, CommandError> {
    let path = file.display().to_string();
    let text = fs::read_to_string(file).map_err(|source| CommandError::Read {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CommandError::Parse { path, source })
}

#[derive(Serialize)]
struct PathOutput {
    path: Vec<NodeId>,
}

/// Find a shortest path in an edge-list file.
pub fn path(file: &Path, start: NodeId, end: NodeId, json: bool) -> Result<()> {
    let edges = load_edges(file)?;
    let graph = Graph::from_edges(edges);
    let stats = graph.stats();

    info!(
        "Loaded {} nodes and {} edges from {}",
        stats.node_count,
        stats.edge_count,
        file.display()
    );
    for node in [start, end] {
        if !graph.contains_node(node) {
            warn!("Node {} does not appear in {}", node, file.display());
        }
    }

    let path = graph
        .shortest_path(start, end)
        .ok_or(CommandError::NoPath { start, end })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&PathOutput { path })?);
        return Ok(());
    }

    let hops = path.len() - 1;
    let rendered: Vec<String> = path.iter().map(|n| n.to_string()).collect();

    println!(
        "{} {} hop{} from {} to {}",
        "✓".green(),
        hops.to_string().cyan(),
        if hops == 1 { "" } else { "s" },
        start,
        end
    );
    let arrow = " → ".dimmed().to_string();
    println!("  {}", rendered.join(arrow.as_str()));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn edge_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_edges() {
        let file = edge_file(r#"[{"u":1,"v":2},{"u":2,"v":3}]"#);
        let edges = load_edges(file.path()).unwrap();
        assert_eq!(edges, vec![Edge::new(1, 2), Edge::new(2, 3)]);
    }

    #[test]
    fn test_load_edges_rejects_bad_json() {
        let file = edge_file(r#"[{"u":1}]"#);
        assert!(matches!(
            load_edges(file.path()),
            Err(CommandError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_edges_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            load_edges(&missing),
            Err(CommandError::Read { .. })
        ));
    }

    #[test]
    fn test_path_command() {
        let file = edge_file(r#"[{"u":1,"v":2},{"u":2,"v":3},{"u":3,"v":4}]"#);
        assert!(path(file.path(), 1, 4, false).is_ok());
        assert!(path(file.path(), 1, 4, true).is_ok());

        let err = path(file.path(), 1, 5, false).unwrap_err();
        assert_eq!(err.to_string(), "no path from 1 to 5");
    }
}
