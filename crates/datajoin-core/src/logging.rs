#![forbid(unsafe_code)]

//! Diagnostics for the join and render passes.
//!
//! Code in this workspace logs through `datajoin_core::{debug, warn, ...}`.
//! Building with `--features tracing` routes those calls to the `tracing`
//! crate; a default build swaps in macros that discard their arguments, and
//! span macros hand back a [`NoopSpan`] whose guards do nothing.

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

// Each stand-in accepts the same token trees as its `tracing` counterpart.
#[cfg(not(feature = "tracing"))]
mod noop_macros {
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    #[macro_export]
    macro_rules! debug_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }

    #[macro_export]
    macro_rules! error {
        ($($arg:tt)*) => {};
    }

    #[macro_export]
    macro_rules! error_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }

    #[macro_export]
    macro_rules! info {
        ($($arg:tt)*) => {};
    }

    #[macro_export]
    macro_rules! info_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }

    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    #[macro_export]
    macro_rules! trace_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }

    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }

    #[macro_export]
    macro_rules! warn_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }
}

/// What the `*_span!` macros return in a build without `tracing`.
#[cfg(not(feature = "tracing"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    #[inline]
    pub fn enter(&self) -> NoopGuard {
        NoopGuard
    }

    #[inline]
    pub fn entered(self) -> NoopGuard {
        NoopGuard
    }
}

/// Held for the scope of a [`NoopSpan`]; dropping it is free.
#[cfg(not(feature = "tracing"))]
#[derive(Debug)]
pub struct NoopGuard;
