//! Admin Client
//!
//! One-shot queries against the service's administrative UNIX socket.

use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::{NlpError, Result};
use crate::protocol::admin::{decode_admin_response, encode_admin_request, AdminCommand, AdminResponse};
use super::{Connection, Transport};

impl<T: Transport> Connection<T> {
    /// Write one admin command
    pub fn send_admin_request(&mut self, command: AdminCommand) -> Result<()> {
        tracing::debug!("Sending admin command {:?} to {}", command, self.peer_addr());
        self.send_frame(&encode_admin_request(command))
    }

    /// Read and decode one admin response
    pub fn receive_admin_response(&mut self) -> Result<AdminResponse> {
        self.with_reader(decode_admin_response)
    }
}

/// Client for the administrative endpoint
#[derive(Debug, Clone)]
pub struct AdminClient {
    socket_path: PathBuf,
    timeout: Option<Duration>,
}

impl AdminClient {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
            timeout: None,
        }
    }

    /// Use the admin socket and read timeout from `config`
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            socket_path: config.admin_socket_path.clone(),
            timeout: config.read_timeout(),
        }
    }

    /// Set a read/write deadline for queries
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Open a connection to the admin socket
    pub fn connect(&self) -> Result<Connection<UnixStream>> {
        let stream = UnixStream::connect(&self.socket_path).map_err(|e| NlpError::Connection {
            addr: self.socket_path.display().to_string(),
            source: e,
        })?;

        let mut conn = Connection::from_stream(stream)?;
        conn.set_timeouts(self.timeout, self.timeout)?;
        Ok(conn)
    }

    /// Run one admin exchange on a fresh connection
    pub fn query(&self, command: AdminCommand) -> Result<AdminResponse> {
        let mut conn = self.connect()?;
        let result = conn
            .send_admin_request(command)
            .and_then(|()| conn.receive_admin_response());
        conn.disconnect();
        result
    }
}
