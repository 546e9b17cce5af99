//! Serialized layout for log events.
//!
//! Responsibilities:
//! - Expose the cached stream header, written once per stream by the owner
//! - Encode one event per record with the stream header suppressed
//! - Report static content metadata
//!
//! Non-responsibilities:
//! - Opening files or sockets (the stream manager's job)
//! - Ordering records in the output (also the manager's; it must write the
//!   header first and each record's bytes contiguously)

pub mod header;
pub mod record;

use std::collections::HashMap;

use bytes::Bytes;

use crate::constants::CONTENT_TYPE;
use crate::event::LogEvent;

pub use header::{generate_header, stream_header};
pub use record::encode_record;

/// The public layout contract. Stateless after construction: the header
/// lives in a process-wide cache and every record encode owns its session,
/// so one instance is safe to share across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerializedLayout;

impl SerializedLayout {
    pub fn new() -> Self {
        SerializedLayout
    }

    /// Cached stream header; byte-identical on every call. Empty if the
    /// one-time generation failed (logged at error severity).
    pub fn header(&self) -> Bytes {
        stream_header()
    }

    /// One event, encoded as a self-contained headerless record. Never
    /// fails past this boundary; see `layout::record`.
    pub fn encode_record(&self, event: &LogEvent) -> Bytes {
        encode_record(event)
    }

    /// The payload is an opaque binary stream.
    pub fn content_type(&self) -> &'static str {
        CONTENT_TYPE
    }

    /// The format is sufficiently specified by its content type; there are
    /// no additional structural hints.
    pub fn content_format(&self) -> HashMap<String, String> {
        HashMap::new()
    }
}
