//! layout/header.rs
//! One-time stream-header generation and the process-wide header cache.

use bytes::Bytes;
use once_cell::sync::Lazy;
use tracing::error;

use crate::constants::STREAM_HEADER_LEN;
use crate::wire::{ObjectEncoder, WireError};

/// Computed once per process, read many times, never mutated. `Lazy`
/// guarantees exactly one thread runs the generator; the rest observe the
/// published value. On failure the cache publishes empty bytes: a missing
/// header degrades the output format, it does not crash the host.
static STREAM_HEADER: Lazy<Bytes> = Lazy::new(|| match generate_header() {
    Ok(header) => header,
    Err(e) => {
        error!(error = %e, "unable to generate object stream header");
        Bytes::new()
    }
});

/// Runs the wire encoder against an empty buffer with zero objects and
/// captures whatever it emits from stream initialization alone. By
/// definition, that is the format's fixed stream header.
pub fn generate_header() -> Result<Bytes, WireError> {
    let encoder = ObjectEncoder::new(Vec::with_capacity(STREAM_HEADER_LEN))?;
    let buf = encoder.finish()?;
    Ok(Bytes::from(buf))
}

/// The cached header bytes. Cheap to call any number of times; every call
/// returns the same value.
pub fn stream_header() -> Bytes {
    STREAM_HEADER.clone()
}
