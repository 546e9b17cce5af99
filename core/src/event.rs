//! event.rs
//! The log event record model: the unit the layout encodes.
//!
//! Design notes:
//! - Events are caller-owned and read-only to the layout; encoding never
//!   mutates them.
//! - `Arc`-backed values (`target`, `message`, attribute keys, `Value::Str`,
//!   `Value::Bytes`, `Value::List`) are the shareable objects the encoder's
//!   object-identity table tracks. Holding the same allocation twice inside
//!   one event encodes the second occurrence as a back-reference.

use std::sync::Arc;

use num_enum::TryFromPrimitive;

/// Severity registry (wire-stable `u8` ids).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
pub enum Level {
    Trace = 0x01,
    Debug = 0x02,
    Info  = 0x03,
    Warn  = 0x04,
    Error = 0x05,
    Fatal = 0x06,
}

/// A structured attribute value.
///
/// Shareable variants carry `Arc` so one allocation can appear in several
/// positions of one event and still encode once.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    Bytes(Arc<[u8]>),
    List(Arc<Vec<Value>>),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}
impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}
impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}
impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(Arc::from(v))
    }
}
impl From<Arc<str>> for Value {
    fn from(v: Arc<str>) -> Self {
        Value::Str(v)
    }
}

/// One structured log event.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
    /// Severity.
    pub level: Level,
    /// Originating component, usually a module path.
    pub target: Arc<str>,
    /// Rendered message text.
    pub message: Arc<str>,
    /// Ordered key/value attributes. Keys may be shared allocations.
    pub attrs: Vec<(Arc<str>, Value)>,
}

impl LogEvent {
    pub fn new(timestamp_ms: u64, level: Level, target: &str, message: &str) -> Self {
        Self {
            timestamp_ms,
            level,
            target: Arc::from(target),
            message: Arc::from(message),
            attrs: Vec::new(),
        }
    }

    /// Appends one attribute; chainable for test and call-site ergonomics.
    pub fn with_attr(mut self, key: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }
}
