//! WebSocket server implementation.
//!
//! Handles client connections and routes JSON-RPC messages to handlers.

use crate::handlers::{handle_create, handle_delete, handle_info, handle_shortest_path};
use crate::protocol::{CreateParams, DeleteParams, Request, Response, ShortestPathParams};
use crate::SharedRegistry;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{accept_async, tungstenite, tungstenite::Message};
use tracing::{debug, error, info, warn};

/// The JSON-RPC over WebSocket server.
pub struct RpcServer {
    addr: SocketAddr,
    registry: SharedRegistry,
}

impl RpcServer {
    /// Creates a new server over a shared registry.
    pub fn new(registry: SharedRegistry, addr: SocketAddr) -> Self {
        Self { addr, registry }
    }

    /// Runs the server, accepting connections forever.
    ///
    /// Each connection gets its own task holding a handle to the registry.
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let listener = TcpListener::bind(&self.addr).await?;
        info!("JSON-RPC server listening on ws://{}", self.addr);

        loop {
            let (stream, peer) = match listener.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    error!("Accept error: {}", e);
                    continue;
                }
            };

            debug!("New connection from {}", peer);
            tokio::spawn(serve_session(stream, peer, Arc::clone(&self.registry)));
        }
    }
}

/// Drives one connection to completion and logs how it ended.
async fn serve_session(stream: TcpStream, peer: SocketAddr, registry: SharedRegistry) {
    match session(stream, peer, &registry).await {
        Ok(()) => info!("Connection closed: {}", peer),
        Err(e) => error!("Connection error from {}: {}", peer, e),
    }
}

async fn session(
    stream: TcpStream,
    peer: SocketAddr,
    registry: &SharedRegistry,
) -> Result<(), tungstenite::Error> {
    let ws_stream = accept_async(stream).await?;
    info!("WebSocket connection established with {}", peer);

    let (mut outgoing, mut incoming) = ws_stream.split();

    while let Some(frame) = incoming.next().await {
        match reply_to(frame?, registry) {
            Reply::Frame(out) => outgoing.send(out).await?,
            Reply::Skip => {}
            Reply::Hangup => {
                debug!("Client {} disconnected", peer);
                break;
            }
        }
    }

    Ok(())
}

/// What a connection does after receiving one frame.
#[derive(Debug)]
enum Reply {
    Frame(Message),
    Skip,
    Hangup,
}

/// Answers pings and text requests; binary frames are ignored.
fn reply_to(frame: Message, registry: &SharedRegistry) -> Reply {
    match frame {
        Message::Text(text) => {
            let response = process_message(&text, registry);
            match serde_json::to_string(&response) {
                Ok(json) => Reply::Frame(Message::Text(json)),
                Err(e) => {
                    warn!("Dropping response that failed to serialize: {}", e);
                    Reply::Skip
                }
            }
        }
        Message::Ping(payload) => Reply::Frame(Message::Pong(payload)),
        Message::Close(_) => Reply::Hangup,
        Message::Binary(_) | Message::Pong(_) | Message::Frame(_) => Reply::Skip,
    }
}

/// Processes a JSON-RPC message and returns a response.
pub(crate) fn process_message(text: &str, registry: &SharedRegistry) -> Response {
    let request: Request = match serde_json::from_str(text) {
        Ok(r) => r,
        Err(_) => return Response::parse_error(),
    };

    let id = request.id.clone();
    let method = request.method.as_str();

    debug!("Processing method: {}", method);

    match method {
        "graph.info" => handle_info(registry, id),

        "graph.create" => match serde_json::from_value::<CreateParams>(request.params) {
            Ok(params) => handle_create(registry, id, params),
            Err(e) => Response::invalid_params(id, e.to_string()),
        },

        "graph.shortestPath" => match serde_json::from_value::<ShortestPathParams>(request.params) {
            Ok(params) => handle_shortest_path(registry, id, params),
            Err(e) => Response::invalid_params(id, e.to_string()),
        },

        "graph.delete" => match serde_json::from_value::<DeleteParams>(request.params) {
            Ok(params) => handle_delete(registry, id, params),
            Err(e) => Response::invalid_params(id, e.to_string()),
        },

        _ => Response::method_not_found(id, method),
    }
}
