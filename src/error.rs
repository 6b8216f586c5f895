//! Error types for nlpwire
//!
//! Separates transport failures, frame-contract violations and caller-side
//! validation. A server-reported failure is not an error: it decodes to
//! [`Response::Failure`](crate::protocol::Response::Failure).

use std::io;
use thiserror::Error;

/// Result type alias using NlpError
pub type Result<T> = std::result::Result<T, NlpError>;

/// Unified error type for nlpwire operations
#[derive(Debug, Error)]
pub enum NlpError {
    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    #[error("Connection error: cannot reach {addr}: {source}")]
    Connection {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("Not connected")]
    NotConnected,

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Timed out waiting for peer: {0}")]
    Timeout(io::Error),

    #[error("Connection closed by peer after {received} of {expected} bytes")]
    ConnectionClosed { expected: usize, received: usize },

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("Payload too large: {size} bytes (max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl NlpError {
    /// Classify a socket error raised after the connection was established.
    ///
    /// Expired read/write deadlines surface as `WouldBlock` on Unix and
    /// `TimedOut` on Windows; both become [`NlpError::Timeout`].
    pub fn from_transport(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => NlpError::Timeout(err),
            _ => NlpError::Io(err),
        }
    }

    /// Whether this error belongs to the IOError family
    /// (`Io`, `Timeout`, `ConnectionClosed`).
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            NlpError::Io(_) | NlpError::Timeout(_) | NlpError::ConnectionClosed { .. }
        )
    }

    /// Whether the byte stream broke the frame contract
    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, NlpError::ProtocolViolation(_))
    }
}
