//! Protocol Client
//!
//! Runs complete exchanges: connect, send one request, receive one
//! response, disconnect.

use crate::config::ClientConfig;
use crate::error::Result;
use crate::protocol::{Request, RequestKind, Response};
use super::Connection;

/// Client for the text-analysis service
///
/// Holds configuration only. Every exchange opens its own [`Connection`], so
/// one client can be shared by threads issuing concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct ProtocolClient {
    config: ClientConfig,
}

impl ProtocolClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Open a fresh connection to the service
    pub fn connect(&self) -> Result<Connection> {
        Connection::connect(&self.config)
    }

    /// Perform one exchange on a fresh connection
    ///
    /// The connection is closed afterwards, whether or not the exchange
    /// succeeded. Nothing is retried.
    pub fn exchange(&self, request: &Request) -> Result<Response> {
        let mut conn = self.connect()?;
        let result = conn
            .send_request(request)
            .and_then(|()| conn.receive_response());
        conn.disconnect();
        result
    }

    /// Validate `text` and run one exchange
    ///
    /// Oversized text fails with `PayloadTooLarge` before any connection is
    /// opened.
    pub fn analyze(&self, kind: RequestKind, text: impl Into<String>) -> Result<Response> {
        let request = Request::new(kind, text)?;
        self.exchange(&request)
    }
}
