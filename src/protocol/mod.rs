//! Protocol Module
//!
//! Defines the wire protocol spoken with the text-analysis service.
//! One request and one response per connection; plaintext; unversioned.
//!
//! ## Protocol Format (little-endian)
//!
//! ### Request Format
//! ```text
//! ┌──────────┬──────────────┬─────────────────────────┐
//! │ Kind (4) │ TextLen (8)  │ Text ... 0x00           │
//! └──────────┴──────────────┴─────────────────────────┘
//! ```
//!
//! ### Request Kinds
//! - 1: COUNT_WORDS
//! - 2: DETERMINE_TOPIC
//! - 3: GENERATE_SUMMARY
//!
//! ### Response Format
//! ```text
//! ┌───────────┬─────────────────────────────────────────┐
//! │Status (4) │ Status-specific fields                  │
//! └───────────┴─────────────────────────────────────────┘
//! ```
//!
//! ### Status Codes
//! - 0: OK    - word count, processing time, topic, summary
//! - 1: ERROR - error message

mod request;
mod response;
mod reader;
mod codec;
pub mod admin;

pub use request::{Request, RequestKind, MAX_TEXT_SIZE};
pub use response::{Analysis, Response, Status};
pub use reader::{ByteSource, ExactReader};
pub use codec::{
    encode_request, decode_request, encode_response, decode_response,
    read_request, write_request, read_response, write_response,
    CODE_SIZE, LEN_SIZE, MAX_FIELD_SIZE,
};
pub(crate) use codec::write_frame;
