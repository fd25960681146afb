use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Port of the REST transport unless configured otherwise.
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address for the HTTP REST transport.
    pub http_addr: SocketAddr,
    /// Address for the WebSocket JSON-RPC transport; disabled when `None`.
    pub rpc_addr: Option<SocketAddr>,
    /// Largest accepted REST request body in bytes; unlimited when `None`.
    pub max_body_bytes: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_HTTP_PORT),
            rpc_addr: None,
            max_body_bytes: None,
        }
    }
}

impl ServerConfig {
    /// Builds a config from ports, binding every interface when `headless`.
    pub fn from_ports(http_port: u16, rpc_port: Option<u16>, headless: bool) -> Self {
        let ip = if headless {
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        } else {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        };

        Self {
            http_addr: SocketAddr::new(ip, http_port),
            rpc_addr: rpc_port.map(|port| SocketAddr::new(ip, port)),
            max_body_bytes: None,
        }
    }

    /// Caps REST request bodies at `limit` bytes.
    pub fn with_max_body_bytes(mut self, limit: Option<usize>) -> Self {
        self.max_body_bytes = limit;
        self
    }
}
