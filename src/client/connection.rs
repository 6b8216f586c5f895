//! Connection Handle
//!
//! One open stream socket, used for a single request/response exchange.

use std::io::{BufReader, BufWriter};
use std::net::TcpStream;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::{NlpError, Result};
use crate::protocol::{decode_response, encode_request, write_frame, ExactReader, Request, Response};
use super::Transport;

/// Buffered halves of an open socket
struct Halves<T: Transport> {
    reader: ExactReader<BufReader<T>>,
    writer: BufWriter<T>,
}

/// An explicit, unshared connection to the service
///
/// States are "connected" and "not connected". Any error during
/// [`send_request`](Self::send_request) or
/// [`receive_response`](Self::receive_response) closes the connection, since
/// the byte stream cannot be resynchronized. Dropping the handle closes it.
pub struct Connection<T: Transport = TcpStream> {
    halves: Option<Halves<T>>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection<TcpStream> {
    /// Open a TCP connection to `addr` with default settings
    pub fn open(addr: impl Into<String>) -> Result<Self> {
        Self::connect(&ClientConfig::builder().server_addr(addr).build())
    }

    /// Open a TCP connection to `config.server_addr`
    ///
    /// A single attempt per resolved address; the first failure on the last
    /// address is returned as `NlpError::Connection`.
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        let addrs = config.resolve_server_addr()?;

        let mut last_err = None;
        let mut stream = None;
        for addr in &addrs {
            let attempt = match config.connect_timeout() {
                Some(timeout) => TcpStream::connect_timeout(addr, timeout),
                None => TcpStream::connect(addr),
            };
            match attempt {
                Ok(s) => {
                    stream = Some(s);
                    break;
                }
                Err(e) => {
                    tracing::debug!("connect to {} failed: {}", addr, e);
                    last_err = Some(e);
                }
            }
        }

        let stream = match (stream, last_err) {
            (Some(stream), _) => stream,
            (None, Some(source)) => {
                return Err(NlpError::Connection {
                    addr: config.server_addr.clone(),
                    source,
                })
            }
            (None, None) => {
                return Err(NlpError::Config(format!(
                    "address {} resolved to nothing",
                    config.server_addr
                )))
            }
        };

        if config.nodelay {
            stream.set_nodelay(true)?;
        }

        let mut conn = Self::from_stream(stream)?;
        conn.set_timeouts(config.read_timeout(), config.write_timeout())?;
        Ok(conn)
    }
}

impl<T: Transport> Connection<T> {
    /// Wrap an already connected stream
    pub fn from_stream(stream: T) -> Result<Self> {
        let peer_addr = stream.peer_label();

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        tracing::debug!("Connected to {}", peer_addr);

        Ok(Self {
            halves: Some(Halves {
                reader: ExactReader::new(BufReader::new(read_stream)),
                writer: BufWriter::new(write_stream),
            }),
            peer_addr,
        })
    }

    /// Configure read/write deadlines; `None` blocks indefinitely
    pub fn set_timeouts(
        &mut self,
        read: Option<Duration>,
        write: Option<Duration>,
    ) -> Result<()> {
        let halves = self.halves.as_ref().ok_or(NlpError::NotConnected)?;
        halves.reader.get_ref().get_ref().set_read_timeout(read)?;
        halves.writer.get_ref().set_write_timeout(write)?;
        Ok(())
    }

    /// Encode `request` and write it in full
    pub fn send_request(&mut self, request: &Request) -> Result<()> {
        let frame = encode_request(request);
        tracing::debug!(
            "Sending {} request ({} bytes) to {}",
            request.kind(),
            frame.len(),
            self.peer_addr
        );
        self.send_frame(&frame)
    }

    /// Read and decode one response
    pub fn receive_response(&mut self) -> Result<Response> {
        let response = self.with_reader(decode_response)?;
        tracing::debug!(
            "Received {:?} response from {}",
            response.status(),
            self.peer_addr
        );
        Ok(response)
    }

    /// Write a pre-encoded frame; closes the connection on failure
    pub(crate) fn send_frame(&mut self, frame: &[u8]) -> Result<()> {
        let halves = self.halves.as_mut().ok_or(NlpError::NotConnected)?;
        let result = write_frame(&mut halves.writer, frame);
        self.close_on_error(result)
    }

    /// Run a decoder against the reader; closes the connection on failure
    pub(crate) fn with_reader<V>(
        &mut self,
        decode: impl FnOnce(&mut ExactReader<BufReader<T>>) -> Result<V>,
    ) -> Result<V> {
        let halves = self.halves.as_mut().ok_or(NlpError::NotConnected)?;
        let result = decode(&mut halves.reader);
        self.close_on_error(result)
    }

    fn close_on_error<V>(&mut self, result: Result<V>) -> Result<V> {
        if let Err(ref e) = result {
            tracing::warn!("Exchange with {} failed: {}", self.peer_addr, e);
            self.disconnect();
        }
        result
    }

    /// Close the socket
    ///
    /// Idempotent; safe before any request was sent.
    pub fn disconnect(&mut self) {
        if let Some(halves) = self.halves.take() {
            // The peer may already be gone; nothing useful to report.
            let _ = halves.writer.get_ref().shutdown();
            tracing::debug!("Disconnected from {}", self.peer_addr);
        }
    }

    pub fn is_connected(&self) -> bool {
        self.halves.is_some()
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

impl<T: Transport> Drop for Connection<T> {
    fn drop(&mut self) {
        self.disconnect();
    }
}
