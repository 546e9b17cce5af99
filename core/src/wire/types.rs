//! wire/types.rs
//! Error taxonomy for the object-stream wire format.
//!
//! Design notes:
//! - Structured variants carry the offending raw values so diagnostics stay
//!   useful without string-formatting at the failure site.
//! - `From<io::Error>` enables `?` across encode/decode paths.

use std::fmt;
use std::io;

/// Render a short byte sequence for error messages: printable ASCII as a
/// byte-string literal, anything else as hex.
pub fn fmt_bytes(b: &[u8]) -> String {
    if b.iter().all(|&c| c.is_ascii_graphic() || c == b' ') {
        format!("b\"{}\"", String::from_utf8_lossy(b))
    } else {
        format!("0x{}", hex::encode(b))
    }
}

#[derive(Debug)]
pub enum WireError {
    /// Underlying sink or source failed.
    Io(io::Error),

    /// Input ended inside a header, tag, or value body.
    Truncated,

    /// Stream header magic did not match (expected "LWS1").
    InvalidMagic { have: [u8; 4], need: [u8; 4] },

    /// Stream header version is not supported by this decoder.
    UnsupportedVersion { have: u16 },

    /// Unrecognized wire tag byte.
    UnknownTag { raw: u8 },

    /// Unrecognized severity id.
    UnknownLevel { raw: u8 },

    /// Back-reference index past the end of the identity table. The classic
    /// symptom of a record that leaked references into a neighbouring record.
    UnknownBackRef { index: u32, len: usize },

    /// Back-reference resolved, but to a slot of the wrong kind for the
    /// position it appears in.
    BackRefKind { index: u32, expected: &'static str },

    /// String payload is not valid UTF-8.
    InvalidUtf8,

    /// String or byte payload exceeds the wire bound.
    ValueTooLarge { len: usize, max: usize },

    /// Attribute or list element count exceeds the wire bound.
    CountTooLarge { count: usize, max: usize },

    /// Value nesting deeper than the wire bound; the event is not encodable.
    DepthExceeded { max: usize },

    /// Identity table ran out of u32 slot indexes within one record.
    RefOverflow,
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use WireError::*;
        match self {
            Io(e) => write!(f, "I/O error: {}", e),
            Truncated => write!(f, "input truncated"),

            InvalidMagic { have, need } =>
                write!(f, "invalid magic: expected {}, got {}", fmt_bytes(need), fmt_bytes(have)),
            UnsupportedVersion { have } =>
                write!(f, "unsupported stream version: {}", have),

            UnknownTag { raw } =>
                write!(f, "unknown wire tag: 0x{:02x}", raw),
            UnknownLevel { raw } =>
                write!(f, "unknown level id: 0x{:02x}", raw),

            UnknownBackRef { index, len } =>
                write!(f, "back-reference {} out of range (table has {} entries)", index, len),
            BackRefKind { index, expected } =>
                write!(f, "back-reference {} is not a {} slot", index, expected),

            InvalidUtf8 =>
                write!(f, "string payload is not valid UTF-8"),
            ValueTooLarge { len, max } =>
                write!(f, "value of {} bytes exceeds maximum {}", len, max),
            CountTooLarge { count, max } =>
                write!(f, "count {} exceeds maximum {}", count, max),
            DepthExceeded { max } =>
                write!(f, "value nesting exceeds maximum depth {}", max),
            RefOverflow =>
                write!(f, "identity table slot index overflow"),
        }
    }
}

impl std::error::Error for WireError {}

/// Allow `?` on std::io::Error
impl From<io::Error> for WireError {
    fn from(e: io::Error) -> Self {
        WireError::Io(e)
    }
}
