//! Object-stream wire format.
//!
//! Responsibilities:
//! - Define the tagged value grammar and its error taxonomy
//! - Encode one event per session, with an object-identity table for
//!   shared allocations (back-references)
//! - Decode streams and records with strict validation
//!
//! Non-responsibilities:
//! - Stream-header caching and suppression policy (see `layout`)
//! - Error swallowing (callers here get plain `Result`s)
//! - IO beyond in-memory `Read`/`Write` sinks

pub mod types;
pub mod encode;
pub mod decode;

pub use types::{fmt_bytes, WireError};
pub use encode::ObjectEncoder;
pub use decode::ObjectDecoder;
