//! Picklist: a select widget engine.
//!
//! Picklist replaces a native choice control (or a plain text input) with a
//! richer select: searchable options, multi-select with a JSON-encoded
//! form value, placement that flips and aligns to stay on screen, and
//! coordinated dismissal across instances on the same page.
//!
//! The crate holds no rendering code. A host view reads state from a
//! [`Select`] (display text, visible options, placement) and forwards user
//! input to it (activation, search, open/close, page clicks and scrolls via
//! [`Page`]). The `redraw_requested` signal says when to re-read.
//!
//! # Modules
//!
//! - [`option`] / [`store`]: option records, selection flags and search
//! - [`codec`]: the backing value format
//! - [`engine`]: selection and commit logic over [`SelectState`]
//! - [`visibility`]: open/closed state and dismissal listeners
//! - [`position`]: panel placement
//! - [`coordinator`] / [`page`]: instance registry and page events
//! - [`select`]: the public widget handle
//!
//! # Example
//!
//! ```
//! use picklist::{HostElement, Page, PageClick, PlacementRequest, Select, SelectConfig, TextInput};
//! use picklist_core::{Rect, Size};
//!
//! let page = Page::shared();
//! let config = SelectConfig::new()
//!     .with_multiple(true)
//!     .with_search(true)
//!     .with_options(["Rust", "Go", "Zig"]);
//! let tags = Select::new(Some(HostElement::input(TextInput::new("tags"))), config, page.clone()).unwrap();
//!
//! let request = PlacementRequest::new(Rect::new(0.0, 0.0, 200.0, 30.0), Size::new(800.0, 600.0));
//! tags.open(&request);
//! tags.set_search_term("ru");
//! assert_eq!(tags.visible_options().len(), 1);
//!
//! page.click(PageClick::outside());
//! assert!(!tags.is_open());
//!
//! tags.activate_value("Rust");
//! assert_eq!(tags.backing_input().value, r#"["Rust"]"#);
//! ```

pub mod codec;
pub mod config;
pub mod control;
pub mod coordinator;
pub mod engine;
pub mod error;
pub mod option;
pub mod page;
pub mod position;
pub mod select;
pub mod store;
pub mod visibility;

pub use codec::{decode_values, encode_values, SelectValue};
pub use config::{ConfigOverrides, PositionMode, SelectConfig, Viewport, DEFAULT_FLIP_THRESHOLD};
pub use control::{BackingInput, HostElement, NativeSelect, SharedSelect, TextInput};
pub use coordinator::{Coordinator, InstanceId};
pub use engine::{Activation, CommitOutcome, SelectState, Toggle};
pub use error::{Result, SelectError};
pub use option::{RawOption, SelectOption};
pub use page::{Page, PageClick, ScrollEvent};
pub use position::{
    HorizontalEdge, OffsetParent, Placement, PlacementRequest, Positioner, VerticalEdge,
};
pub use select::Select;
pub use store::{OptionStore, SearchPattern, SelectionMode};
pub use visibility::{DismissReason, DismissalListeners, Visibility, VisibilityMachine};
