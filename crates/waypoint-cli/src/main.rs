//! Waypoint CLI - Command-line interface for Waypoint
//!
//! Runs the graph registry server, or answers a one-off shortest-path
//! query against an edge-list file.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use waypoint_graph::NodeId;
use waypoint_server::DEFAULT_HTTP_PORT;

mod commands;

#[derive(Parser)]
#[command(name = "waypoint")]
#[command(author = "Waypoint Contributors")]
#[command(version)]
#[command(about = "In-memory graph registry with shortest-path queries", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Waypoint server
    Serve {
        /// Port for the HTTP REST API
        #[arg(short, long, env = "WAYPOINT_PORT", default_value_t = DEFAULT_HTTP_PORT)]
        port: u16,

        /// Port for the WebSocket JSON-RPC API (disabled when omitted)
        #[arg(long, env = "WAYPOINT_RPC_PORT")]
        rpc_port: Option<u16>,

        /// Headless mode: bind to 0.0.0.0 for remote access (WSL/Docker/Server)
        #[arg(long)]
        headless: bool,

        /// Reject REST request bodies larger than this many bytes (unlimited when omitted)
        #[arg(long, env = "WAYPOINT_MAX_BODY_BYTES")]
        max_body_bytes: Option<usize>,
    },

    /// Find the shortest path in an edge-list JSON file
    Path {
        /// File holding `[{"u": 1, "v": 2}, ...]`
        file: PathBuf,

        /// Start node
        #[arg(short, long, allow_negative_numbers = true)]
        start: NodeId,

        /// End node
        #[arg(short, long, allow_negative_numbers = true)]
        end: NodeId,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let result = match cli.command {
        Commands::Serve {
            port,
            rpc_port,
            headless,
            max_body_bytes,
        } => commands::serve(port, rpc_port, headless, max_body_bytes).await,
        Commands::Path {
            file,
            start,
            end,
            json,
        } => commands::path(&file, start, end, json),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
