//! Core systems for Picklist.
//!
//! This crate provides the foundational pieces the select widget engine is
//! built on:
//!
//! - **Signal/Slot System**: Type-safe notifications with scoped connections
//! - **Geometry**: Points, sizes and rectangles for placement math
//! - **Logging**: `tracing` targets and helpers
//!
//! # Signal/Slot Example
//!
//! ```
//! use picklist_core::Signal;
//! use std::sync::Arc;
//!
//! // Create a signal that notifies when a value changes
//! let value_changed = Arc::new(Signal::<String>::new());
//!
//! // A scoped connection is removed when the guard is dropped
//! let guard = value_changed.connect_scoped(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! value_changed.emit("apple".to_string());
//! drop(guard);
//! assert_eq!(value_changed.connection_count(), 0);
//! ```

pub mod geometry;
pub mod logging;
pub mod signal;

pub use geometry::{Point, Rect, Size};
pub use logging::PerfSpan;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
