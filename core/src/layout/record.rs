//! layout/record.rs
//! Headerless per-record encoding with a swallow-and-log error boundary.
//!
//! Design notes:
//! - Each call owns a fresh buffer and a fresh encoder session, so
//!   concurrent calls share no mutable state and no back-reference can
//!   point into another record.
//! - Failures never cross this boundary. A logging layout that throws takes
//!   its host application down with it; a logged diagnostic and a
//!   best-effort (possibly truncated, possibly empty) record does not.

use bytes::Bytes;
use tracing::error;

use crate::constants::DEFAULT_RECORD_CAPACITY;
use crate::event::LogEvent;
use crate::wire::ObjectEncoder;

/// Encodes one event as a headerless record. The stream owner prepends the
/// cached stream header once, at the stream level.
pub fn encode_record(event: &LogEvent) -> Bytes {
    let mut session = ObjectEncoder::headerless(Vec::with_capacity(DEFAULT_RECORD_CAPACITY));

    if let Err(e) = session.encode_event(event) {
        error!(error = %e, "log event encoding failed");
    }

    // Reset on every exit path, success or failure: the identity table must
    // be empty by the time any later record could observe it.
    if let Err(e) = session.reset() {
        error!(error = %e, "encoder session reset failed");
    }

    match session.finish() {
        Ok(buf) => Bytes::from(buf),
        Err(e) => {
            error!(error = %e, "encoder session flush failed");
            Bytes::new()
        }
    }
}
