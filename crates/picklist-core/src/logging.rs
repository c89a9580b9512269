//! Logging facilities for Picklist.
//!
//! Picklist uses the `tracing` crate for instrumentation. Nothing is printed
//! unless the host application installs a subscriber:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("picklist=debug")
//!         .init();
//! }
//! ```
//!
//! Every subsystem logs under its own target (see [`targets`]) so hosts can
//! raise the level for one part of the widget without drowning in the rest.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "picklist_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "picklist_core::signal";
    /// Widget construction and public operations.
    pub const SELECT: &str = "picklist::select";
    /// Option store and value codec.
    pub const STORE: &str = "picklist::store";
    /// Open/close transitions and dismissal listeners.
    pub const VISIBILITY: &str = "picklist::visibility";
    /// Panel placement.
    pub const POSITION: &str = "picklist::position";
    /// Cross-instance coordination.
    pub const COORDINATOR: &str = "picklist::coordinator";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::debug_span!(target: "picklist::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

/// Macros for common tracing patterns.
///
/// These are thin wrappers around the `tracing` macros with a consistent
/// target naming.
#[macro_export]
macro_rules! picklist_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "picklist", $($arg)*)
    };
}

#[macro_export]
macro_rules! picklist_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "picklist", $($arg)*)
    };
}

#[macro_export]
macro_rules! picklist_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "picklist", $($arg)*)
    };
}
