//! Administrative protocol
//!
//! Queries the service's client table and processing queue over its
//! administrative socket.
//!
//! ### Request Format
//! ```text
//! ┌─────────────┐
//! │ Command (4) │
//! └─────────────┘
//! ```
//!
//! ### Response Format
//! ```text
//! OK:    │Status=0 (4)│ClientCount (4)│QueueSize (4)│QueueCap (4)│ClientInfo (72) x ClientCount│
//! ERROR: │Status=1 (4)│ErrLen (8)│Err│
//! ```
//!
//! ### ClientInfo Record (72 bytes)
//! ```text
//! ┌────────┬──────────────┬─────────┬──────────────────┬───────────────┬─────────┐
//! │ fd (4) │ address (50) │ pad (2) │ connect_time (8) │ requests (4)  │ pad (4) │
//! └────────┴──────────────┴─────────┴──────────────────┴───────────────┴─────────┘
//! ```

use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::Serialize;

use crate::error::{NlpError, Result};
use super::codec::{decode_string, put_string_field, read_string_field};
use super::{ByteSource, Status};

/// Most clients the service tracks (and reports)
pub const MAX_CLIENTS: usize = 10;

/// Size of one encoded ClientInfo record
pub const CLIENT_INFO_SIZE: usize = 72;

/// Size of the NUL-padded address field
pub const ADDRESS_FIELD_SIZE: usize = 50;

/// Administrative commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum AdminCommand {
    Clients = 1,
    QueueStatus = 2,
}

impl AdminCommand {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(AdminCommand::Clients),
            2 => Some(AdminCommand::QueueStatus),
            _ => None,
        }
    }
}

/// A client connected to the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientInfo {
    /// Service-side socket descriptor
    pub fd: i32,

    /// Peer IP address
    pub address: String,

    /// Connection time (Unix seconds)
    pub connect_time: i64,

    /// Requests received on this connection
    pub request_count: i32,
}

/// Service state snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminReport {
    pub clients: Vec<ClientInfo>,
    pub queue_size: i32,
    pub queue_capacity: i32,
}

/// A decoded administrative response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AdminResponse {
    Success(AdminReport),
    Failure { message: String },
}

impl AdminResponse {
    pub fn status(&self) -> Status {
        match self {
            AdminResponse::Success(_) => Status::Ok,
            AdminResponse::Failure { .. } => Status::Error,
        }
    }
}

// =============================================================================
// Request Encoding/Decoding
// =============================================================================

/// Encode an admin command
pub fn encode_admin_request(command: AdminCommand) -> Bytes {
    let mut buf = BytesMut::with_capacity(4);
    buf.put_i32_le(command.code());
    buf.freeze()
}

/// Decode an admin command (service side)
pub fn decode_admin_request<S: ByteSource>(source: &mut S) -> Result<AdminCommand> {
    let code = source.read_i32_le()?;
    AdminCommand::from_code(code)
        .ok_or_else(|| NlpError::ProtocolViolation(format!("Unknown admin command: {}", code)))
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode an admin response (service side)
///
/// Fails if the report lists more than [`MAX_CLIENTS`] clients or an address
/// does not fit its fixed-size field with a terminator.
pub fn encode_admin_response(response: &AdminResponse) -> Result<Bytes> {
    let mut buf = BytesMut::new();
    buf.put_i32_le(response.status().code());

    match response {
        AdminResponse::Success(report) => {
            if report.clients.len() > MAX_CLIENTS {
                return Err(NlpError::ProtocolViolation(format!(
                    "Too many clients: {} (max {})",
                    report.clients.len(),
                    MAX_CLIENTS
                )));
            }

            buf.put_i32_le(report.clients.len() as i32);
            buf.put_i32_le(report.queue_size);
            buf.put_i32_le(report.queue_capacity);
            for client in &report.clients {
                put_client_info(&mut buf, client)?;
            }
        }
        AdminResponse::Failure { message } => {
            put_string_field(&mut buf, Some(message));
        }
    }

    Ok(buf.freeze())
}

/// Decode an admin response
pub fn decode_admin_response<S: ByteSource>(source: &mut S) -> Result<AdminResponse> {
    let code = source.read_i32_le()?;
    let status = Status::from_code(code).ok_or_else(|| {
        NlpError::ProtocolViolation(format!("Unknown admin response status: {}", code))
    })?;

    match status {
        Status::Ok => {
            let client_count = source.read_i32_le()?;
            if client_count < 0 || client_count as usize > MAX_CLIENTS {
                return Err(NlpError::ProtocolViolation(format!(
                    "Client count {} out of range 0..={}",
                    client_count, MAX_CLIENTS
                )));
            }

            let queue_size = source.read_i32_le()?;
            let queue_capacity = source.read_i32_le()?;

            let clients = (0..client_count)
                .map(|_| decode_client_info(source.read_bytes(CLIENT_INFO_SIZE)?))
                .collect::<Result<Vec<_>>>()?;

            Ok(AdminResponse::Success(AdminReport {
                clients,
                queue_size,
                queue_capacity,
            }))
        }
        Status::Error => {
            let message = read_string_field(source, "admin error message")?.unwrap_or_default();
            Ok(AdminResponse::Failure { message })
        }
    }
}

// =============================================================================
// ClientInfo Records
// =============================================================================

fn put_client_info(buf: &mut BytesMut, client: &ClientInfo) -> Result<()> {
    let address = client.address.as_bytes();
    if address.len() >= ADDRESS_FIELD_SIZE {
        return Err(NlpError::ProtocolViolation(format!(
            "Client address too long: {} bytes (max {})",
            address.len(),
            ADDRESS_FIELD_SIZE - 1
        )));
    }

    buf.put_i32_le(client.fd);
    buf.put_slice(address);
    buf.put_bytes(0, ADDRESS_FIELD_SIZE - address.len() + 2);
    buf.put_i64_le(client.connect_time);
    buf.put_i32_le(client.request_count);
    buf.put_bytes(0, 4);
    Ok(())
}

fn decode_client_info(mut record: Bytes) -> Result<ClientInfo> {
    let fd = record.get_i32_le();

    let mut address = record.split_to(ADDRESS_FIELD_SIZE);
    if let Some(end) = address.iter().position(|&b| b == 0) {
        address.truncate(end);
    }
    let address = decode_string(address, "client address")?;

    record.advance(2);
    let connect_time = record.get_i64_le();
    let request_count = record.get_i32_le();

    Ok(ClientInfo {
        fd,
        address,
        connect_time,
        request_count,
    })
}
