//! Request definitions
//!
//! Represents analysis requests sent to the service.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::{NlpError, Result};

/// Largest text (in UTF-8 bytes, terminator excluded) a request may carry
pub const MAX_TEXT_SIZE: usize = 65536;

/// Request kinds and their wire codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum RequestKind {
    CountWords = 1,
    DetermineTopic = 2,
    GenerateSummary = 3,
}

impl RequestKind {
    /// Wire code of this kind
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Look up a kind by wire code
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(RequestKind::CountWords),
            2 => Some(RequestKind::DetermineTopic),
            3 => Some(RequestKind::GenerateSummary),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RequestKind::CountWords => "count-words",
            RequestKind::DetermineTopic => "determine-topic",
            RequestKind::GenerateSummary => "generate-summary",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated analysis request
///
/// The text is guaranteed to be at most [`MAX_TEXT_SIZE`] bytes, so encoding
/// a `Request` never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    kind: RequestKind,
    text: String,
}

impl Request {
    /// Create a request, rejecting text longer than [`MAX_TEXT_SIZE`] bytes
    pub fn new(kind: RequestKind, text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        check_size(text.len())?;
        Ok(Self { kind, text })
    }

    /// Load the request text from a UTF-8 file
    ///
    /// The size check happens before the bytes are decoded, so an oversized
    /// file is reported as `PayloadTooLarge` even if it is not valid UTF-8.
    pub fn from_file(kind: RequestKind, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        check_size(bytes.len())?;

        let text = String::from_utf8(bytes).map_err(|e| {
            NlpError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("{} is not valid UTF-8: {}", path.display(), e),
            ))
        })?;

        Ok(Self { kind, text })
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

fn check_size(size: usize) -> Result<()> {
    if size > MAX_TEXT_SIZE {
        return Err(NlpError::PayloadTooLarge {
            size,
            max: MAX_TEXT_SIZE,
        });
    }
    Ok(())
}
