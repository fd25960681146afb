//! JSON-RPC 2.0 message types for the WebSocket transport.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use waypoint_graph::{Edge, NodeId};

/// Graph id was not in the registry.
pub const GRAPH_NOT_FOUND: i32 = -32001;
/// No path joins the requested endpoints.
pub const PATH_NOT_FOUND: i32 = -32002;

const PARSE_ERROR: i32 = -32700;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;
const INTERNAL_ERROR: i32 = -32603;

/// An incoming JSON-RPC request.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    #[serde(default = "default_version")]
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub id: Option<Value>,
}

fn default_version() -> String {
    "2.0".to_string()
}

/// An outgoing JSON-RPC response.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    pub id: Option<Value>,
}

/// The error member of a failed response.
#[derive(Debug, Clone, Serialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
}

impl Response {
    /// Builds a success response around any serializable result.
    pub fn success<T: Serialize>(id: Option<Value>, result: T) -> Self {
        match serde_json::to_value(result) {
            Ok(value) => Self {
                jsonrpc: "2.0",
                result: Some(value),
                error: None,
                id,
            },
            Err(e) => Self::error(id, INTERNAL_ERROR, format!("Internal error: {}", e)),
        }
    }

    /// Builds an error response.
    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
            id,
        }
    }

    pub fn parse_error() -> Self {
        Self::error(None, PARSE_ERROR, "Parse error")
    }

    pub fn invalid_params(id: Option<Value>, detail: impl Into<String>) -> Self {
        Self::error(
            id,
            INVALID_PARAMS,
            format!("Invalid params: {}", detail.into()),
        )
    }

    pub fn method_not_found(id: Option<Value>, method: &str) -> Self {
        Self::error(id, METHOD_NOT_FOUND, format!("Method not found: {}", method))
    }

    /// Returns the error code, if this is an error response.
    pub fn error_code(&self) -> Option<i32> {
        self.error.as_ref().map(|e| e.code)
    }
}

/// Params for `graph.create`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateParams {
    pub edges: Vec<Edge>,
}

/// Params for `graph.shortestPath`.
#[derive(Debug, Clone, Deserialize)]
pub struct ShortestPathParams {
    #[serde(deserialize_with = "graph_key")]
    pub id: String,
    pub start: NodeId,
    pub end: NodeId,
}

/// Params for `graph.delete`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteParams {
    #[serde(deserialize_with = "graph_key")]
    pub id: String,
}

/// Accepts a graph id as either `"3"` or `3`.
fn graph_key<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Key {
        Number(u64),
        Text(String),
    }

    Ok(match Key::deserialize(deserializer)? {
        Key::Number(n) => n.to_string(),
        Key::Text(s) => s,
    })
}
