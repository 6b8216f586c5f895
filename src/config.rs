//! Configuration for nlpwire
//!
//! Centralized client configuration with sensible defaults.

use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{NlpError, Result};

/// Port the text-analysis service listens on by default
pub const DEFAULT_PORT: u16 = 12345;

/// Path of the service's administrative UNIX socket
pub const DEFAULT_ADMIN_SOCKET: &str = "/tmp/nlp_admin_socket";

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Service address (host:port)
    pub server_addr: String,

    /// Connect timeout (milliseconds, 0 = block until the OS gives up)
    pub connect_timeout_ms: u64,

    /// Read timeout (milliseconds, 0 = block indefinitely)
    pub read_timeout_ms: u64,

    /// Write timeout (milliseconds, 0 = block indefinitely)
    pub write_timeout_ms: u64,

    /// Disable Nagle's algorithm on TCP connections
    pub nodelay: bool,

    // -------------------------------------------------------------------------
    // Admin Configuration
    // -------------------------------------------------------------------------
    /// UNIX socket of the administrative endpoint
    pub admin_socket_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_addr: format!("127.0.0.1:{}", DEFAULT_PORT),
            connect_timeout_ms: 5000,
            read_timeout_ms: 0,
            write_timeout_ms: 0,
            nodelay: true,
            admin_socket_path: PathBuf::from(DEFAULT_ADMIN_SOCKET),
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Connect timeout, `None` when disabled
    pub fn connect_timeout(&self) -> Option<Duration> {
        millis(self.connect_timeout_ms)
    }

    /// Read timeout, `None` when disabled
    pub fn read_timeout(&self) -> Option<Duration> {
        millis(self.read_timeout_ms)
    }

    /// Write timeout, `None` when disabled
    pub fn write_timeout(&self) -> Option<Duration> {
        millis(self.write_timeout_ms)
    }

    /// Resolve `server_addr` to socket addresses, in resolver order
    pub fn resolve_server_addr(&self) -> Result<Vec<SocketAddr>> {
        let addrs: Vec<SocketAddr> = self
            .server_addr
            .to_socket_addrs()
            .map_err(|e| NlpError::Connection {
                addr: self.server_addr.clone(),
                source: e,
            })?
            .collect();

        if addrs.is_empty() {
            return Err(NlpError::Config(format!(
                "address {} resolved to nothing",
                self.server_addr
            )));
        }
        Ok(addrs)
    }
}

fn millis(ms: u64) -> Option<Duration> {
    if ms > 0 {
        Some(Duration::from_millis(ms))
    } else {
        None
    }
}

/// Builder for ClientConfig
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the service address (host:port)
    pub fn server_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.server_addr = addr.into();
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set both I/O timeouts at once (in milliseconds)
    pub fn io_timeout_ms(self, ms: u64) -> Self {
        self.read_timeout_ms(ms).write_timeout_ms(ms)
    }

    /// Enable or disable TCP_NODELAY
    pub fn nodelay(mut self, nodelay: bool) -> Self {
        self.config.nodelay = nodelay;
        self
    }

    /// Set the administrative socket path
    pub fn admin_socket_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.admin_socket_path = path.into();
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
