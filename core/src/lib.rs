//! logwire-core
//!
//! Binary serialized layout for structured log events: a fixed stream
//! header written once per stream by an external owner, followed by
//! self-contained headerless records with per-record identity-table reset.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod event;

// Wire format and layout layers
pub mod wire;
pub mod layout;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::event::{Level, LogEvent, Value};
    pub use crate::layout::SerializedLayout;
}
