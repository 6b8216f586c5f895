//! # nlpwire
//!
//! Client side of a binary request/response protocol for a remote
//! text-analysis service:
//! - Byte-exact little-endian wire codec (requests and responses)
//! - Exact-byte reads over transports without message boundaries
//! - One request/response exchange per connection
//! - Administrative queries over a UNIX-domain socket
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Orchestrator (src/bin/*)                     │
//! │          (command → RequestKind, file → text, output)        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   ProtocolClient                             │
//! │        connect → send_request → receive_response → close     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  WireCodec  │          │ ExactReader │
//!   │ (pure bytes)│◄─────────│ (read n B)  │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │  Transport  │
//!                           │ (TCP / UDS) │
//!                           └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{NlpError, Result};
pub use config::ClientConfig;
pub use client::{Connection, ProtocolClient};
pub use protocol::{Analysis, Request, RequestKind, Response};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of nlpwire
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
