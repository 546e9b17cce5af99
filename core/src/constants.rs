/// Magic number for this wire format version.
/// "LWS1" = Log Wire Stream v1
// - A protocol magic field uses `[u8; 4]` so the type itself enforces
//   "exactly 4 bytes" and matches the header layout.
pub const WIRE_MAGIC: [u8; 4] = *b"LWS1";
pub const WIRE_VERSION: u16 = 1;

/// Fixed stream-header size in bytes: magic (4) + version (2).
/// This is everything the format emits for a zero-object stream.
pub const STREAM_HEADER_LEN: usize = 6;

/// MIME type reported by the layout facade. The payload is an opaque
/// binary stream, not text.
pub const CONTENT_TYPE: &str = "application/octet-stream";

/// Upper bound for a single string or byte-blob payload (16 MiB).
pub const MAX_VALUE_LEN: usize = 16 * 1024 * 1024;

/// Upper bound for attribute and list element counts.
pub const MAX_COUNT: usize = 64 * 1024;

/// Maximum nesting depth of list values. Exceeding this on encode is the
/// concrete "non-encodable event" case: the record is abandoned mid-write.
pub const MAX_VALUE_DEPTH: usize = 32;

/// Initial capacity for a per-record output buffer.
pub const DEFAULT_RECORD_CAPACITY: usize = 256;

/// Wire tag registry (mirrored by encoder and decoder).
pub mod tags {
    /// Value tags.
    pub const NULL: u8 = 0x70;
    pub const BOOL_FALSE: u8 = 0x71;
    pub const BOOL_TRUE: u8 = 0x72;
    pub const I64: u8 = 0x73;
    pub const F64: u8 = 0x74;
    pub const STR: u8 = 0x75;
    pub const BYTES: u8 = 0x76;
    pub const LIST: u8 = 0x77;

    /// Back-reference into the session's object-identity table.
    pub const REF: u8 = 0x78;

    /// Clears the identity table on both sides. Written after every record.
    pub const RESET: u8 = 0x79;

    /// Starts one encoded log event.
    pub const EVENT: u8 = 0x7A;
}
