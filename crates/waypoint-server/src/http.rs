//! HTTP REST transport.
//!
//! Routes:
//! - `POST   /graph`                    create a graph from an edge list
//! - `GET    /graph/{id}/shortest_path` shortest path between two nodes
//! - `DELETE /graph/{id}`               delete a graph
//! - `GET    /status`                   registry counters

use crate::SharedRegistry;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{debug, info};
use waypoint_graph::{Edge, GraphId, NodeId, QueryError};

/// Errors returned by the REST handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
}

/// JSON body of an error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BadRequest"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound"),
        };

        let body = Json(ErrorResponse {
            error: kind.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::GraphNotFound(_) => ApiError::NotFound("Graph not found".to_string()),
            QueryError::NoPath { .. } => ApiError::NotFound("Path not found".to_string()),
        }
    }
}

/// Body of `GET /graph/{id}/shortest_path`.
///
/// Absent endpoints read as node 0.
#[derive(Debug, Default, Deserialize)]
pub struct PathRequest {
    #[serde(default)]
    pub start: NodeId,
    #[serde(default)]
    pub end: NodeId,
}

/// One element of the `POST /graph` body.
///
/// Absent endpoints read as node 0, and a `null` element as the edge 0-0.
#[derive(Debug, Default, Deserialize)]
struct EdgeRecord {
    #[serde(default)]
    u: NodeId,
    #[serde(default)]
    v: NodeId,
}

impl From<EdgeRecord> for Edge {
    fn from(record: EdgeRecord) -> Self {
        Edge::new(record.u, record.v)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateResponse {
    pub id: GraphId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PathResponse {
    pub path: Vec<NodeId>,
}

/// Decodes the first JSON value of a body regardless of content type.
///
/// Anything after that value is ignored. An empty body is a bad request.
fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    let mut values = serde_json::Deserializer::from_slice(body).into_iter::<T>();
    match values.next() {
        Some(Ok(value)) => Ok(value),
        Some(Err(e)) => Err(ApiError::BadRequest(e.to_string())),
        None => Err(ApiError::BadRequest("EOF".to_string())),
    }
}

async fn create_graph(
    State(registry): State<SharedRegistry>,
    body: Bytes,
) -> Result<Json<CreateResponse>, ApiError> {
    let records: Option<Vec<Option<EdgeRecord>>> = decode(&body)?;
    let edges = records
        .unwrap_or_default()
        .into_iter()
        .map(|record| Edge::from(record.unwrap_or_default()));
    let id = registry.create(edges);
    Ok(Json(CreateResponse { id }))
}

async fn shortest_path(
    State(registry): State<SharedRegistry>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<PathResponse>, ApiError> {
    let request = decode::<Option<PathRequest>>(&body)?.unwrap_or_default();
    let path = registry.shortest_path(&id, request.start, request.end)?;
    Ok(Json(PathResponse { path }))
}

async fn delete_graph(
    State(registry): State<SharedRegistry>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if registry.delete(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(QueryError::GraphNotFound(id).into())
    }
}

async fn status(State(registry): State<SharedRegistry>) -> impl IntoResponse {
    let stats = registry.stats();
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "graphs": stats.graphs,
        "lastId": stats.last_id,
        "ids": registry.ids(),
    }))
}

/// Builds the REST router over a shared registry, with no cap on body size.
pub fn router(registry: SharedRegistry) -> Router {
    router_with_body_limit(registry, None)
}

/// Builds the REST router, answering 413 for bodies over `body_limit` bytes.
///
/// `None` accepts bodies of any size.
pub fn router_with_body_limit(registry: SharedRegistry, body_limit: Option<usize>) -> Router {
    let mut app = Router::new()
        .route("/graph", post(create_graph))
        .route("/graph/{id}/shortest_path", get(shortest_path))
        .route("/graph/{id}", delete(delete_graph))
        .route("/status", get(status))
        .layer(DefaultBodyLimit::disable());

    if let Some(limit) = body_limit {
        app = app.layer(RequestBodyLimitLayer::new(limit));
    }

    app.layer(TraceLayer::new_for_http()).with_state(registry)
}

/// The HTTP REST server.
pub struct HttpServer {
    addr: SocketAddr,
    registry: SharedRegistry,
    body_limit: Option<usize>,
}

impl HttpServer {
    /// Creates a new server over a shared registry.
    pub fn new(registry: SharedRegistry, addr: SocketAddr) -> Self {
        Self {
            addr,
            registry,
            body_limit: None,
        }
    }

    /// Caps request bodies at `limit` bytes.
    pub fn with_body_limit(mut self, limit: Option<usize>) -> Self {
        self.body_limit = limit;
        self
    }

    /// Runs the server until it fails.
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let listener = TcpListener::bind(&self.addr).await?;
        info!("HTTP server listening on http://{}", self.addr);
        debug!("Registry holds {} graphs at startup", self.registry.len());

        let app = router_with_body_limit(self.registry.clone(), self.body_limit);
        axum::serve(listener, app).await?;

        Ok(())
    }
}
