//! wire/encode.rs
//! Encoder session for the object-stream wire format.
//!
//! Design notes:
//! - One `ObjectEncoder` per record. The session owns the object-identity
//!   table; sharing a session across records would let record N emit a
//!   back-reference into record N-1's table, which breaks independent
//!   record framing. `reset()` clears the table and marks the wire.
//! - `new` writes the stream header immediately; `headerless` suppresses it
//!   for record bodies whose stream owner prepends the header exactly once.
//! - Identity slots are registered after a shareable object is fully
//!   written (post-order), mirroring the decoder's table exactly.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::constants::{tags, MAX_COUNT, MAX_VALUE_DEPTH, MAX_VALUE_LEN, WIRE_MAGIC, WIRE_VERSION};
use crate::event::{LogEvent, Value};
use crate::wire::types::WireError;

pub struct ObjectEncoder<W: Write> {
    out: W,
    /// Object-identity table: allocation address -> slot index.
    refs: HashMap<usize, u32>,
    next_ref: u32,
}

impl<W: Write> ObjectEncoder<W> {
    /// Opens a full stream: writes the fixed header before any object data.
    pub fn new(mut out: W) -> Result<Self, WireError> {
        out.write_all(&WIRE_MAGIC)?;
        out.write_u16::<LittleEndian>(WIRE_VERSION)?;
        Ok(Self { out, refs: HashMap::new(), next_ref: 0 })
    }

    /// Opens a headerless session for one record body. The stream header is
    /// the stream owner's responsibility, written once per stream.
    pub fn headerless(out: W) -> Self {
        Self { out, refs: HashMap::new(), next_ref: 0 }
    }

    /// Encodes exactly one event into the session.
    pub fn encode_event(&mut self, event: &LogEvent) -> Result<(), WireError> {
        self.out.write_u8(tags::EVENT)?;
        self.out.write_u64::<LittleEndian>(event.timestamp_ms)?;
        self.out.write_u8(event.level as u8)?;

        self.write_str(&event.target)?;
        self.write_str(&event.message)?;

        if event.attrs.len() > MAX_COUNT {
            return Err(WireError::CountTooLarge { count: event.attrs.len(), max: MAX_COUNT });
        }
        self.out.write_u32::<LittleEndian>(event.attrs.len() as u32)?;
        for (key, value) in &event.attrs {
            self.write_str(key)?;
            self.write_value(value, 0)?;
        }
        Ok(())
    }

    /// Clears the object-identity table and marks the wire so a decoder
    /// clears its mirror at the same point. Required between records: a
    /// record must never resolve into objects from a different record.
    pub fn reset(&mut self) -> Result<(), WireError> {
        self.refs.clear();
        self.next_ref = 0;
        self.out.write_u8(tags::RESET)?;
        Ok(())
    }

    /// Flushes buffered bytes and returns the sink.
    pub fn finish(mut self) -> Result<W, WireError> {
        self.out.flush()?;
        Ok(self.out)
    }

    // --- shareable objects -------------------------------------------------

    fn write_str(&mut self, s: &Arc<str>) -> Result<(), WireError> {
        let addr = Arc::as_ptr(s) as *const u8 as usize;
        if self.write_ref_if_seen(addr)? {
            return Ok(());
        }
        if s.len() > MAX_VALUE_LEN {
            return Err(WireError::ValueTooLarge { len: s.len(), max: MAX_VALUE_LEN });
        }
        self.out.write_u8(tags::STR)?;
        self.out.write_u32::<LittleEndian>(s.len() as u32)?;
        self.out.write_all(s.as_bytes())?;
        self.register(addr)
    }

    fn write_bytes(&mut self, b: &Arc<[u8]>) -> Result<(), WireError> {
        let addr = Arc::as_ptr(b) as *const u8 as usize;
        if self.write_ref_if_seen(addr)? {
            return Ok(());
        }
        if b.len() > MAX_VALUE_LEN {
            return Err(WireError::ValueTooLarge { len: b.len(), max: MAX_VALUE_LEN });
        }
        self.out.write_u8(tags::BYTES)?;
        self.out.write_u32::<LittleEndian>(b.len() as u32)?;
        self.out.write_all(b)?;
        self.register(addr)
    }

    fn write_list(&mut self, list: &Arc<Vec<Value>>, depth: usize) -> Result<(), WireError> {
        let addr = Arc::as_ptr(list) as *const u8 as usize;
        if self.write_ref_if_seen(addr)? {
            return Ok(());
        }
        if list.len() > MAX_COUNT {
            return Err(WireError::CountTooLarge { count: list.len(), max: MAX_COUNT });
        }
        self.out.write_u8(tags::LIST)?;
        self.out.write_u32::<LittleEndian>(list.len() as u32)?;
        for element in list.iter() {
            self.write_value(element, depth + 1)?;
        }
        self.register(addr)
    }

    fn write_value(&mut self, value: &Value, depth: usize) -> Result<(), WireError> {
        if depth > MAX_VALUE_DEPTH {
            return Err(WireError::DepthExceeded { max: MAX_VALUE_DEPTH });
        }
        match value {
            Value::Null => self.out.write_u8(tags::NULL)?,
            Value::Bool(false) => self.out.write_u8(tags::BOOL_FALSE)?,
            Value::Bool(true) => self.out.write_u8(tags::BOOL_TRUE)?,
            Value::Int(v) => {
                self.out.write_u8(tags::I64)?;
                self.out.write_i64::<LittleEndian>(*v)?;
            }
            Value::Float(v) => {
                self.out.write_u8(tags::F64)?;
                self.out.write_u64::<LittleEndian>(v.to_bits())?;
            }
            Value::Str(s) => self.write_str(s)?,
            Value::Bytes(b) => self.write_bytes(b)?,
            Value::List(l) => self.write_list(l, depth)?,
        }
        Ok(())
    }

    // --- identity table ----------------------------------------------------

    /// Emits a REF if the allocation was already written in this session.
    fn write_ref_if_seen(&mut self, addr: usize) -> Result<bool, WireError> {
        if let Some(&idx) = self.refs.get(&addr) {
            self.out.write_u8(tags::REF)?;
            self.out.write_u32::<LittleEndian>(idx)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Assigns the next slot index to a fully-written shareable object.
    fn register(&mut self, addr: usize) -> Result<(), WireError> {
        let idx = self.next_ref;
        self.next_ref = self.next_ref.checked_add(1).ok_or(WireError::RefOverflow)?;
        self.refs.insert(addr, idx);
        Ok(())
    }
}
