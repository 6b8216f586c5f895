//! Response definitions
//!
//! Represents decoded replies from the service.

use serde::Serialize;

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Status {
    Ok = 0,
    Error = 1,
}

impl Status {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Status::Ok),
            1 => Some(Status::Error),
            _ => None,
        }
    }
}

/// Payload of a successful analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    /// Number of words in the submitted text
    pub word_count: i32,

    /// Seconds the service spent on the request
    pub processing_time_secs: f64,

    /// Topic label, only for `DetermineTopic`
    pub topic: Option<String>,

    /// Generated summary, only for `GenerateSummary`
    pub summary: Option<String>,
}

/// A decoded response
///
/// `Failure` is a valid reply in which the service reports that it could not
/// process the request; transport and framing problems are `NlpError`s.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    Success(Analysis),
    Failure { message: String },
}

impl Response {
    /// Create a successful response
    pub fn success(
        word_count: i32,
        processing_time_secs: f64,
        topic: Option<String>,
        summary: Option<String>,
    ) -> Self {
        Response::Success(Analysis {
            word_count,
            processing_time_secs,
            topic,
            summary,
        })
    }

    /// Create a failure response
    pub fn failure(message: impl Into<String>) -> Self {
        Response::Failure {
            message: message.into(),
        }
    }

    /// Wire status selecting this variant
    pub fn status(&self) -> Status {
        match self {
            Response::Success(_) => Status::Ok,
            Response::Failure { .. } => Status::Error,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success(_))
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        match self {
            Response::Success(analysis) => Some(analysis),
            Response::Failure { .. } => None,
        }
    }
}
