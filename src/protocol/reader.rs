//! Exact-byte reads
//!
//! Stream transports deliver data in arbitrary chunks. `ExactReader` hides
//! that: each call returns precisely the requested number of bytes or fails.

use std::io::{self, Read};

use bytes::{Buf, Bytes};

use crate::error::{NlpError, Result};

/// A source of exact-length byte runs for the decoder
///
/// The typed helpers read little-endian values, matching the wire format.
pub trait ByteSource {
    /// Return exactly `n` bytes
    fn read_bytes(&mut self, n: usize) -> Result<Bytes>;

    fn read_i32_le(&mut self) -> Result<i32> {
        Ok(self.read_bytes(4)?.get_i32_le())
    }

    fn read_i64_le(&mut self) -> Result<i64> {
        Ok(self.read_bytes(8)?.get_i64_le())
    }

    fn read_u64_le(&mut self) -> Result<u64> {
        Ok(self.read_bytes(8)?.get_u64_le())
    }

    fn read_f64_le(&mut self) -> Result<f64> {
        Ok(self.read_bytes(8)?.get_f64_le())
    }
}

/// Reads exact byte counts from a stream, across partial reads
pub struct ExactReader<R> {
    inner: R,
    consumed: u64,
}

impl<R: Read> ExactReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, consumed: 0 }
    }

    /// Read exactly `n` bytes
    ///
    /// Blocks across as many partial reads as needed. End-of-stream before
    /// `n` bytes fails with `ConnectionClosed`; the bytes received so far
    /// are discarded. `n == 0` returns immediately without touching the
    /// stream.
    pub fn read_exact(&mut self, n: usize) -> Result<Bytes> {
        if n == 0 {
            return Ok(Bytes::new());
        }

        let mut buf = vec![0u8; n];
        let mut filled = 0;

        while filled < n {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => {
                    self.consumed += filled as u64;
                    return Err(NlpError::ConnectionClosed {
                        expected: n,
                        received: filled,
                    });
                }
                Ok(read) => filled += read,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.consumed += filled as u64;
                    return Err(NlpError::from_transport(e));
                }
            }
        }

        self.consumed += n as u64;
        tracing::trace!("read {} bytes ({} total)", n, self.consumed);
        Ok(Bytes::from(buf))
    }

    /// Total bytes taken from the stream so far
    pub fn bytes_consumed(&self) -> u64 {
        self.consumed
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> ByteSource for ExactReader<R> {
    fn read_bytes(&mut self, n: usize) -> Result<Bytes> {
        self.read_exact(n)
    }
}
