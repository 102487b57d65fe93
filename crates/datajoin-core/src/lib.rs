#![forbid(unsafe_code)]

//! Core: records, keyed joins, and logging shims shared by every backend.

pub mod join;
pub mod logging;
pub mod record;

pub use join::{Join, JoinMode, Slot};
pub use record::{Record, RecordError, RecordSet};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
