//! wire/decode.rs
//! Decoder for the object-stream wire format, with strict validation.
//!
//! Design notes:
//! - The decoder mirrors the encoder's identity table as a vector of typed
//!   slots, pushed in the same post-order the encoder assigns indexes, so a
//!   REF resolves by plain indexing.
//! - A RESET marker clears the mirror table. Record encoders emit one after
//!   every record, which is what lets a single long-lived decoder read a
//!   stream of independently-encoded records: no back-reference can cross a
//!   record boundary.
//! - Every length and count is bounded before allocation; a hostile or
//!   corrupt stream fails with a specific error instead of exhausting memory.

use std::io::{self, Read};
use std::sync::Arc;

use byteorder::{LittleEndian, ReadBytesExt};
use num_enum::TryFromPrimitive;

use crate::constants::{tags, MAX_COUNT, MAX_VALUE_DEPTH, MAX_VALUE_LEN, WIRE_MAGIC, WIRE_VERSION};
use crate::event::{Level, LogEvent, Value};
use crate::wire::types::WireError;

/// One resolved identity-table slot.
#[derive(Debug)]
enum Shared {
    Str(Arc<str>),
    Bytes(Arc<[u8]>),
    List(Arc<Vec<Value>>),
}

#[derive(Debug)]
pub struct ObjectDecoder<R: Read> {
    input: R,
    /// Mirror of the encoder's object-identity table, in slot order.
    shared: Vec<Shared>,
}

impl<R: Read> ObjectDecoder<R> {
    /// Opens a full stream: reads and validates the fixed header first.
    pub fn new(mut input: R) -> Result<Self, WireError> {
        let mut magic = [0u8; 4];
        input.read_exact(&mut magic).map_err(map_eof)?;
        if magic != WIRE_MAGIC {
            return Err(WireError::InvalidMagic { have: magic, need: WIRE_MAGIC });
        }
        let version = input.read_u16::<LittleEndian>().map_err(map_eof)?;
        if version != WIRE_VERSION {
            return Err(WireError::UnsupportedVersion { have: version });
        }
        Ok(Self { input, shared: Vec::new() })
    }

    /// Opens a decoder over record bytes whose header the caller already
    /// consumed (or fetched separately from the layout).
    pub fn headerless(input: R) -> Self {
        Self { input, shared: Vec::new() }
    }

    /// Decodes the next event. Returns `Ok(None)` at a clean end of stream.
    pub fn decode_event(&mut self) -> Result<Option<LogEvent>, WireError> {
        loop {
            let tag = match self.input.read_u8() {
                Ok(t) => t,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
                Err(e) => return Err(WireError::Io(e)),
            };
            match tag {
                tags::RESET => {
                    self.shared.clear();
                    continue;
                }
                tags::EVENT => return Ok(Some(self.read_event()?)),
                raw => return Err(WireError::UnknownTag { raw }),
            }
        }
    }

    fn read_event(&mut self) -> Result<LogEvent, WireError> {
        let timestamp_ms = self.input.read_u64::<LittleEndian>().map_err(map_eof)?;

        let raw_level = self.input.read_u8().map_err(map_eof)?;
        let level = Level::try_from_primitive(raw_level)
            .map_err(|_| WireError::UnknownLevel { raw: raw_level })?;

        let target = self.read_str_value()?;
        let message = self.read_str_value()?;

        let count = self.input.read_u32::<LittleEndian>().map_err(map_eof)? as usize;
        if count > MAX_COUNT {
            return Err(WireError::CountTooLarge { count, max: MAX_COUNT });
        }
        let mut attrs = Vec::with_capacity(count);
        for _ in 0..count {
            let key = self.read_str_value()?;
            let value = self.read_value(0)?;
            attrs.push((key, value));
        }

        Ok(LogEvent { timestamp_ms, level, target, message, attrs })
    }

    /// Reads a position that must hold a string: either an inline STR or a
    /// REF into a string slot.
    fn read_str_value(&mut self) -> Result<Arc<str>, WireError> {
        let tag = self.input.read_u8().map_err(map_eof)?;
        match tag {
            tags::STR => self.read_str_body(),
            tags::REF => {
                let index = self.input.read_u32::<LittleEndian>().map_err(map_eof)?;
                match self.resolve(index)? {
                    Shared::Str(s) => Ok(s.clone()),
                    _ => Err(WireError::BackRefKind { index, expected: "string" }),
                }
            }
            raw => Err(WireError::UnknownTag { raw }),
        }
    }

    fn read_value(&mut self, depth: usize) -> Result<Value, WireError> {
        if depth > MAX_VALUE_DEPTH {
            return Err(WireError::DepthExceeded { max: MAX_VALUE_DEPTH });
        }
        let tag = self.input.read_u8().map_err(map_eof)?;
        match tag {
            tags::NULL => Ok(Value::Null),
            tags::BOOL_FALSE => Ok(Value::Bool(false)),
            tags::BOOL_TRUE => Ok(Value::Bool(true)),
            tags::I64 => {
                let v = self.input.read_i64::<LittleEndian>().map_err(map_eof)?;
                Ok(Value::Int(v))
            }
            tags::F64 => {
                let bits = self.input.read_u64::<LittleEndian>().map_err(map_eof)?;
                Ok(Value::Float(f64::from_bits(bits)))
            }
            tags::STR => Ok(Value::Str(self.read_str_body()?)),
            tags::BYTES => Ok(Value::Bytes(self.read_bytes_body()?)),
            tags::LIST => Ok(Value::List(self.read_list_body(depth)?)),
            tags::REF => {
                let index = self.input.read_u32::<LittleEndian>().map_err(map_eof)?;
                Ok(match self.resolve(index)? {
                    Shared::Str(s) => Value::Str(s.clone()),
                    Shared::Bytes(b) => Value::Bytes(b.clone()),
                    Shared::List(l) => Value::List(l.clone()),
                })
            }
            raw => Err(WireError::UnknownTag { raw }),
        }
    }

    // --- shareable object bodies (tag already consumed) ---------------------

    fn read_str_body(&mut self) -> Result<Arc<str>, WireError> {
        let buf = self.read_len_prefixed()?;
        let s = std::str::from_utf8(&buf).map_err(|_| WireError::InvalidUtf8)?;
        let shared: Arc<str> = Arc::from(s);
        self.shared.push(Shared::Str(shared.clone()));
        Ok(shared)
    }

    fn read_bytes_body(&mut self) -> Result<Arc<[u8]>, WireError> {
        let buf = self.read_len_prefixed()?;
        let shared: Arc<[u8]> = Arc::from(buf.as_slice());
        self.shared.push(Shared::Bytes(shared.clone()));
        Ok(shared)
    }

    fn read_list_body(&mut self, depth: usize) -> Result<Arc<Vec<Value>>, WireError> {
        let count = self.input.read_u32::<LittleEndian>().map_err(map_eof)? as usize;
        if count > MAX_COUNT {
            return Err(WireError::CountTooLarge { count, max: MAX_COUNT });
        }
        let mut elements = Vec::with_capacity(count);
        for _ in 0..count {
            elements.push(self.read_value(depth + 1)?);
        }
        // Registered after the elements, matching the encoder's post-order.
        let shared = Arc::new(elements);
        self.shared.push(Shared::List(shared.clone()));
        Ok(shared)
    }

    fn read_len_prefixed(&mut self) -> Result<Vec<u8>, WireError> {
        let len = self.input.read_u32::<LittleEndian>().map_err(map_eof)? as usize;
        if len > MAX_VALUE_LEN {
            return Err(WireError::ValueTooLarge { len, max: MAX_VALUE_LEN });
        }
        let mut buf = vec![0u8; len];
        self.input.read_exact(&mut buf).map_err(map_eof)?;
        Ok(buf)
    }

    fn resolve(&self, index: u32) -> Result<&Shared, WireError> {
        self.shared
            .get(index as usize)
            .ok_or(WireError::UnknownBackRef { index, len: self.shared.len() })
    }
}

/// Mid-value EOF is a framing error, not a clean end of stream.
fn map_eof(e: io::Error) -> WireError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        WireError::Truncated
    } else {
        WireError::Io(e)
    }
}
