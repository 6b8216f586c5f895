//! Codec Tests
//!
//! Tests for request and response encoding/decoding.

use std::io::{self, Cursor, Write};
use nlpwire::protocol::{
    Analysis, ExactReader, Request, RequestKind, Response, Status,
    encode_request, decode_request,
    encode_response, decode_response,
    read_request, write_request,
    read_response, write_response,
    MAX_FIELD_SIZE, MAX_TEXT_SIZE,
};
use nlpwire::NlpError;

// =============================================================================
// Helper Functions
// =============================================================================

fn decode(bytes: &[u8]) -> nlpwire::Result<Response> {
    decode_response(&mut ExactReader::new(bytes))
}

fn ok_header(word_count: i32, time: f64) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0i32.to_le_bytes());
    bytes.extend_from_slice(&word_count.to_le_bytes());
    bytes.extend_from_slice(&time.to_le_bytes());
    bytes
}

fn push_field(bytes: &mut Vec<u8>, payload: &[u8]) {
    bytes.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    bytes.extend_from_slice(payload);
}

/// Accepts a single byte per `write` call
struct OneByteWriter {
    written: Vec<u8>,
    calls: usize,
}

impl Write for OneByteWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.calls += 1;
        match buf.first() {
            Some(&b) => {
                self.written.push(b);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Fails every write with the given error kind
struct FailingWriter(io::ErrorKind);

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(self.0, "write failed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// =============================================================================
// Request Encoding Tests
// =============================================================================

#[test]
fn test_wire_format_count_words() {
    let req = Request::new(RequestKind::CountWords, "hello world").unwrap();
    let encoded = encode_request(&req);

    // Expected: [01 00 00 00][0C 00 00 00 00 00 00 00][hello world\0]
    //           kind          text_len(12)              text + NUL
    assert_eq!(&encoded[0..4], &[0x01, 0x00, 0x00, 0x00]);
    assert_eq!(&encoded[4..12], &[0x0C, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(&encoded[12..], b"hello world\0");
    assert_eq!(encoded.len(), 4 + 8 + 12);
}

#[test]
fn test_wire_format_kind_codes() {
    for (kind, code) in [
        (RequestKind::CountWords, 1u8),
        (RequestKind::DetermineTopic, 2),
        (RequestKind::GenerateSummary, 3),
    ] {
        let encoded = encode_request(&Request::new(kind, "x").unwrap());
        assert_eq!(&encoded[0..4], &[code, 0, 0, 0]);
    }
}

#[test]
fn test_encode_empty_text() {
    let req = Request::new(RequestKind::DetermineTopic, "").unwrap();
    let encoded = encode_request(&req);

    assert_eq!(encoded.len(), 13);
    assert_eq!(&encoded[4..12], &1u64.to_le_bytes());
    assert_eq!(encoded[12], 0x00);
}

#[test]
fn test_encode_length_counts_utf8_bytes() {
    // 4 characters, 6 bytes in UTF-8
    let req = Request::new(RequestKind::GenerateSummary, "ţară").unwrap();
    assert_eq!(req.text().len(), 6);

    let encoded = encode_request(&req);
    assert_eq!(&encoded[4..12], &7u64.to_le_bytes());
    assert_eq!(&encoded[12..18], "ţară".as_bytes());
    assert_eq!(encoded[18], 0x00);
}

#[test]
fn test_encode_max_size_text() {
    let text = "a".repeat(MAX_TEXT_SIZE);
    let req = Request::new(RequestKind::CountWords, text).unwrap();
    let encoded = encode_request(&req);

    assert_eq!(&encoded[4..12], &(MAX_TEXT_SIZE as u64 + 1).to_le_bytes());
    assert_eq!(encoded.len(), 12 + MAX_TEXT_SIZE + 1);
}

// =============================================================================
// Response Decoding Tests
// =============================================================================

#[test]
fn test_decode_ok_without_strings() {
    let mut bytes = ok_header(2, 0.015);
    push_field(&mut bytes, b"");
    push_field(&mut bytes, b"");

    let resp = decode(&bytes).unwrap();
    assert_eq!(resp, Response::success(2, 0.015, None, None));
}

#[test]
fn test_decode_ok_with_topic_and_summary() {
    let mut bytes = ok_header(120, 1.0);
    push_field(&mut bytes, b"Sport\0");
    push_field(&mut bytes, b"The match ended 2-1.\0");

    match decode(&bytes).unwrap() {
        Response::Success(Analysis { word_count, processing_time_secs, topic, summary }) => {
            assert_eq!(word_count, 120);
            assert_eq!(processing_time_secs, 1.0);
            assert_eq!(topic.as_deref(), Some("Sport"));
            assert_eq!(summary.as_deref(), Some("The match ended 2-1."));
        }
        other => panic!("Expected success, got {:?}", other),
    }
}

#[test]
fn test_decode_string_without_terminator() {
    let mut bytes = ok_header(1, 0.0);
    push_field(&mut bytes, b"Tech");
    push_field(&mut bytes, b"");

    let resp = decode(&bytes).unwrap();
    assert_eq!(resp.analysis().unwrap().topic.as_deref(), Some("Tech"));
}

#[test]
fn test_decode_strips_only_one_nul() {
    let mut bytes = ok_header(1, 0.0);
    push_field(&mut bytes, b"Tech\0\0");
    push_field(&mut bytes, b"a\0b\0");

    let analysis = decode(&bytes).unwrap().analysis().cloned().unwrap();
    assert_eq!(analysis.topic.as_deref(), Some("Tech\0"));
    assert_eq!(analysis.summary.as_deref(), Some("a\0b"));
}

#[test]
fn test_decode_lone_terminator_is_empty_string() {
    let mut bytes = ok_header(0, 0.0);
    push_field(&mut bytes, b"\0");
    push_field(&mut bytes, b"");

    let analysis = decode(&bytes).unwrap().analysis().cloned().unwrap();
    assert_eq!(analysis.topic.as_deref(), Some(""));
    assert_eq!(analysis.summary, None);
}

#[test]
fn test_decode_processing_time_bit_exact() {
    let time = 0.1 + 0.2;
    let mut bytes = ok_header(7, time);
    push_field(&mut bytes, b"");
    push_field(&mut bytes, b"");

    let analysis = decode(&bytes).unwrap().analysis().cloned().unwrap();
    assert_eq!(analysis.processing_time_secs.to_bits(), time.to_bits());
}

#[test]
fn test_decode_negative_word_count() {
    let mut bytes = ok_header(-1, 0.0);
    push_field(&mut bytes, b"");
    push_field(&mut bytes, b"");

    assert_eq!(decode(&bytes).unwrap().analysis().unwrap().word_count, -1);
}

#[test]
fn test_decode_error_response() {
    let mut bytes = 1i32.to_le_bytes().to_vec();
    push_field(&mut bytes, b"Unknown request type\0");

    let resp = decode(&bytes).unwrap();
    assert_eq!(resp.status(), Status::Error);
    assert_eq!(resp, Response::failure("Unknown request type"));
}

#[test]
fn test_decode_error_response_empty_message() {
    let mut bytes = 1i32.to_le_bytes().to_vec();
    push_field(&mut bytes, b"");

    assert_eq!(decode(&bytes).unwrap(), Response::failure(""));
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[test]
fn test_unknown_status_consumes_only_status() {
    let mut bytes = 2i32.to_le_bytes().to_vec();
    bytes.extend_from_slice(&[0xAA; 32]);

    let mut reader = ExactReader::new(&bytes[..]);
    let err = decode_response(&mut reader).unwrap_err();

    assert!(err.is_protocol_violation());
    assert!(err.to_string().contains("Unknown response status: 2"));
    assert_eq!(reader.bytes_consumed(), 4);
}

#[test]
fn test_negative_status_is_violation() {
    let bytes = (-1i32).to_le_bytes();
    assert!(decode(&bytes).unwrap_err().is_protocol_violation());
}

#[test]
fn test_invalid_utf8_is_violation() {
    let mut bytes = ok_header(1, 0.0);
    push_field(&mut bytes, &[0xC3, 0x28, 0x00]);
    push_field(&mut bytes, b"");

    let err = decode(&bytes).unwrap_err();
    assert!(err.is_protocol_violation());
    assert!(err.to_string().contains("topic"));
}

#[test]
fn test_oversized_field_is_violation() {
    let mut bytes = 1i32.to_le_bytes().to_vec();
    bytes.extend_from_slice(&(MAX_FIELD_SIZE + 1).to_le_bytes());

    let err = decode(&bytes).unwrap_err();
    assert!(err.is_protocol_violation());
}

#[test]
fn test_truncated_response_is_connection_closed() {
    let mut bytes = ok_header(3, 0.5);
    bytes.extend_from_slice(&10u64.to_le_bytes());
    bytes.extend_from_slice(b"Spo");

    match decode(&bytes).unwrap_err() {
        NlpError::ConnectionClosed { expected, received } => {
            assert_eq!(expected, 10);
            assert_eq!(received, 3);
        }
        other => panic!("Expected ConnectionClosed, got {:?}", other),
    }
}

#[test]
fn test_empty_stream_is_connection_closed() {
    let err = decode(&[]).unwrap_err();
    assert!(matches!(err, NlpError::ConnectionClosed { expected: 4, received: 0 }));
    assert!(err.is_io());
}

// =============================================================================
// Service-side Codec Tests
// =============================================================================

#[test]
fn test_encode_response_reference_layout() {
    let resp = Response::success(5, 0.25, Some("Sport".to_string()), None);
    let encoded = encode_response(&resp);

    let mut expected = ok_header(5, 0.25);
    push_field(&mut expected, b"Sport\0");
    push_field(&mut expected, b"");
    assert_eq!(&encoded[..], &expected[..]);
}

#[test]
fn test_encode_decode_response_per_kind() {
    let responses = vec![
        Response::success(2, 0.015, None, None),
        Response::success(40, 0.5, Some("Politics".to_string()), None),
        Response::success(300, 2.0, None, Some("Ministers met. Budget passed.".to_string())),
        Response::failure("file too large"),
    ];

    for resp in responses {
        let encoded = encode_response(&resp);
        assert_eq!(decode(&encoded).unwrap(), resp);
    }
}

#[test]
fn test_decode_request() {
    let req = Request::new(RequestKind::DetermineTopic, "Parliament voted today").unwrap();
    let encoded = encode_request(&req);

    let decoded = decode_request(&mut ExactReader::new(&encoded[..])).unwrap();
    assert_eq!(decoded, req);
}

#[test]
fn test_decode_request_unknown_kind() {
    let mut bytes = 9i32.to_le_bytes().to_vec();
    push_field(&mut bytes, b"text\0");

    let err = decode_request(&mut ExactReader::new(&bytes[..])).unwrap_err();
    assert!(err.to_string().contains("Unknown request kind: 9"));
}

#[test]
fn test_decode_request_text_too_large() {
    let mut bytes = 1i32.to_le_bytes().to_vec();
    bytes.extend_from_slice(&(MAX_TEXT_SIZE as u64 + 2).to_le_bytes());

    let err = decode_request(&mut ExactReader::new(&bytes[..])).unwrap_err();
    assert!(err.is_protocol_violation());
}

#[test]
fn test_decode_request_max_text_without_terminator() {
    let mut bytes = 1i32.to_le_bytes().to_vec();
    push_field(&mut bytes, &vec![b'a'; MAX_TEXT_SIZE + 1]);

    let err = decode_request(&mut ExactReader::new(&bytes[..])).unwrap_err();
    assert!(err.to_string().contains("missing terminator"));
}

// =============================================================================
// Stream I/O Tests
// =============================================================================

#[test]
fn test_stream_write_read_request() {
    let req = Request::new(RequestKind::GenerateSummary, "One. Two. Three.").unwrap();

    let mut buffer = Vec::new();
    write_request(&mut buffer, &req).unwrap();

    let mut cursor = Cursor::new(buffer);
    assert_eq!(read_request(&mut cursor).unwrap(), req);
}

#[test]
fn test_stream_write_read_response() {
    let resp = Response::success(3, 0.001, None, Some("One.".to_string()));

    let mut buffer = Vec::new();
    write_response(&mut buffer, &resp).unwrap();

    let mut cursor = Cursor::new(buffer);
    assert_eq!(read_response(&mut cursor).unwrap(), resp);
}

#[test]
fn test_stream_leaves_following_bytes_unread() {
    let resp = Response::failure("busy");

    let mut buffer = Vec::new();
    write_response(&mut buffer, &resp).unwrap();
    buffer.extend_from_slice(b"trailing");

    let mut cursor = Cursor::new(buffer);
    read_response(&mut cursor).unwrap();

    let consumed = cursor.position() as usize;
    assert_eq!(&cursor.get_ref()[consumed..], b"trailing");
}

#[test]
fn test_write_request_across_partial_writes() {
    let req = Request::new(RequestKind::CountWords, "hello world").unwrap();
    let mut writer = OneByteWriter { written: Vec::new(), calls: 0 };

    write_request(&mut writer, &req).unwrap();

    let expected = encode_request(&req);
    assert_eq!(writer.written, &expected[..]);
    assert_eq!(writer.calls, expected.len());
}

#[test]
fn test_write_deadline_is_timeout() {
    let req = Request::new(RequestKind::DetermineTopic, "stalled").unwrap();

    let err = write_request(&mut FailingWriter(io::ErrorKind::WouldBlock), &req).unwrap_err();
    assert!(matches!(err, NlpError::Timeout(_)));
    assert!(err.is_io());

    let err = write_request(&mut FailingWriter(io::ErrorKind::TimedOut), &req).unwrap_err();
    assert!(matches!(err, NlpError::Timeout(_)));
}

#[test]
fn test_write_broken_pipe_is_io() {
    let resp = Response::failure("busy");

    let err = write_response(&mut FailingWriter(io::ErrorKind::BrokenPipe), &resp).unwrap_err();
    match err {
        NlpError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
        other => panic!("Expected Io, got {:?}", other),
    }
}
