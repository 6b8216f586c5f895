//! Client Module
//!
//! Socket lifecycle and request/response exchanges.
//!
//! ## Architecture
//! - One `Connection` per exchange, never shared between callers
//! - Blocking I/O on the calling thread, optional deadlines
//! - Errors close the connection; retries belong to the caller

mod transport;
mod connection;
mod protocol_client;
#[cfg(unix)]
mod admin;

pub use transport::Transport;
pub use connection::Connection;
pub use protocol_client::ProtocolClient;
#[cfg(unix)]
pub use admin::AdminClient;
