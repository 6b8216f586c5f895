//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol. Encoders are pure
//! and build a complete frame in memory; decoders pull fields from a
//! [`ByteSource`] in strict wire order.
//!
//! ## Wire Format
//!
//! All integers are little-endian.
//!
//! ### Request Format
//! ```text
//! ┌──────────┬──────────────┬─────────────────────────┐
//! │ Kind (4) │ TextLen (8)  │ Text ... 0x00           │
//! └──────────┴──────────────┴─────────────────────────┘
//! ```
//! `TextLen` counts the terminator.
//!
//! ### Response Format
//! ```text
//! OK:    │Status=0 (4)│Words (4)│Time f64 (8)│TopicLen (8)│Topic│SummaryLen (8)│Summary│
//! ERROR: │Status=1 (4)│ErrLen (8)│Err│
//! ```
//! String lengths count the bytes actually transmitted; a length of 0 means
//! the field is absent.

use std::io::{Read, Write};

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{NlpError, Result};
use super::{ByteSource, ExactReader, Request, RequestKind, Response, Status, MAX_TEXT_SIZE};

/// Size of the kind / status field
pub const CODE_SIZE: usize = 4;

/// Size of every length prefix
pub const LEN_SIZE: usize = 8;

/// Largest response string accepted (16 MB)
pub const MAX_FIELD_SIZE: u64 = 16 * 1024 * 1024;

// =============================================================================
// Request Encoding/Decoding
// =============================================================================

/// Encode a request to bytes
///
/// Format: kind (4) + text_len (8) + text + NUL
pub fn encode_request(request: &Request) -> Bytes {
    let text = request.text().as_bytes();

    let mut buf = BytesMut::with_capacity(CODE_SIZE + LEN_SIZE + text.len() + 1);
    buf.put_i32_le(request.kind().code());
    buf.put_u64_le(text.len() as u64 + 1);
    buf.put_slice(text);
    buf.put_u8(0);

    buf.freeze()
}

/// Decode a request (service side)
pub fn decode_request<S: ByteSource>(source: &mut S) -> Result<Request> {
    let code = source.read_i32_le()?;
    let kind = RequestKind::from_code(code).ok_or_else(|| {
        NlpError::ProtocolViolation(format!("Unknown request kind: {}", code))
    })?;

    let text_len = source.read_u64_le()?;
    if text_len > MAX_TEXT_SIZE as u64 + 1 {
        return Err(NlpError::ProtocolViolation(format!(
            "Request text too large: {} bytes (max {})",
            text_len,
            MAX_TEXT_SIZE + 1
        )));
    }

    let text = decode_string(source.read_bytes(text_len as usize)?, "request text")?;
    if text.len() > MAX_TEXT_SIZE {
        return Err(NlpError::ProtocolViolation(format!(
            "Request text missing terminator: {} bytes",
            text.len()
        )));
    }

    Request::new(kind, text)
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response to bytes (service side)
///
/// Present strings are sent NUL-terminated with the terminator counted in
/// the length; absent strings are sent as a zero length.
pub fn encode_response(response: &Response) -> Bytes {
    let mut buf = BytesMut::new();
    buf.put_i32_le(response.status().code());

    match response {
        Response::Success(analysis) => {
            buf.put_i32_le(analysis.word_count);
            buf.put_f64_le(analysis.processing_time_secs);
            put_string_field(&mut buf, analysis.topic.as_deref());
            put_string_field(&mut buf, analysis.summary.as_deref());
        }
        Response::Failure { message } => {
            put_string_field(&mut buf, Some(message));
        }
    }

    buf.freeze()
}

/// Decode a response
///
/// The status is read first; an unknown status fails before any further
/// byte is consumed.
pub fn decode_response<S: ByteSource>(source: &mut S) -> Result<Response> {
    let code = source.read_i32_le()?;
    let status = Status::from_code(code).ok_or_else(|| {
        tracing::warn!("unknown response status {}", code);
        NlpError::ProtocolViolation(format!("Unknown response status: {}", code))
    })?;

    match status {
        Status::Ok => {
            let word_count = source.read_i32_le()?;
            let processing_time_secs = source.read_f64_le()?;
            let topic = read_string_field(source, "topic")?;
            let summary = read_string_field(source, "summary")?;
            Ok(Response::success(
                word_count,
                processing_time_secs,
                topic,
                summary,
            ))
        }
        Status::Error => {
            let message = read_string_field(source, "error message")?.unwrap_or_default();
            Ok(Response::Failure { message })
        }
    }
}

// =============================================================================
// String Fields
// =============================================================================

/// Append a length-prefixed string field
pub(crate) fn put_string_field(buf: &mut BytesMut, value: Option<&str>) {
    match value {
        Some(s) => {
            buf.put_u64_le(s.len() as u64 + 1);
            buf.put_slice(s.as_bytes());
            buf.put_u8(0);
        }
        None => buf.put_u64_le(0),
    }
}

/// Read a length-prefixed string field; a zero length yields `None`
pub(crate) fn read_string_field<S: ByteSource>(
    source: &mut S,
    field: &str,
) -> Result<Option<String>> {
    let len = source.read_u64_le()?;
    if len == 0 {
        return Ok(None);
    }
    if len > MAX_FIELD_SIZE {
        return Err(NlpError::ProtocolViolation(format!(
            "{} length {} exceeds {} bytes",
            field, len, MAX_FIELD_SIZE
        )));
    }

    let bytes = source.read_bytes(len as usize)?;
    decode_string(bytes, field).map(Some)
}

/// Strip at most one trailing NUL and decode strict UTF-8
pub(crate) fn decode_string(mut bytes: Bytes, field: &str) -> Result<String> {
    if bytes.last() == Some(&0) {
        bytes.truncate(bytes.len() - 1);
    }

    String::from_utf8(bytes.to_vec()).map_err(|e| {
        tracing::warn!("{} is not valid UTF-8", field);
        NlpError::ProtocolViolation(format!("{} is not valid UTF-8: {}", field, e))
    })
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Write a request to a stream
pub fn write_request<W: Write>(writer: &mut W, request: &Request) -> Result<()> {
    write_frame(writer, &encode_request(request))
}

/// Read a complete request from a stream
pub fn read_request<R: Read>(reader: &mut R) -> Result<Request> {
    decode_request(&mut ExactReader::new(reader))
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    write_frame(writer, &encode_response(response))
}

/// Read a complete response from a stream
pub fn read_response<R: Read>(reader: &mut R) -> Result<Response> {
    decode_response(&mut ExactReader::new(reader))
}

/// Write a whole frame, looping over partial writes
pub(crate) fn write_frame<W: Write>(writer: &mut W, frame: &[u8]) -> Result<()> {
    writer.write_all(frame).map_err(NlpError::from_transport)?;
    writer.flush().map_err(NlpError::from_transport)?;
    tracing::trace!("wrote frame of {} bytes", frame.len());
    Ok(())
}
