//! Panel placement.
//!
//! The [`Positioner`] decides where the open panel goes relative to its
//! anchor (the widget's closed-state box). Two decisions are made:
//!
//! - **Horizontal**: align the panel's left edge with the anchor's, unless
//!   that would overflow the right edge of the bounds, in which case align
//!   right edges instead.
//! - **Vertical**: open below the anchor, unless the anchor sits low in the
//!   bounds, in which case open above it.
//!
//! The bounds are the window, or the viewport rectangle for modal widgets.
//! Output coordinates depend on [`PositionMode`]: window-relative for fixed
//! panels, offset-parent-relative for absolute ones.

use picklist_core::logging::targets;
use picklist_core::{Rect, Size};

use crate::config::{PositionMode, SelectConfig, DEFAULT_FLIP_THRESHOLD};

/// The anchor's layout box inside its offset parent, plus the parent's
/// client size. Used for absolute positioning.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OffsetParent {
    /// Anchor offset box (`offsetLeft`, `offsetTop`, `offsetWidth`,
    /// `offsetHeight`).
    pub anchor: Rect,
    /// Parent client size.
    pub client_size: Size,
}

impl OffsetParent {
    pub fn new(anchor: Rect, client_size: Size) -> Self {
        Self {
            anchor,
            client_size,
        }
    }
}

/// Measurements the host takes when a widget opens.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlacementRequest {
    /// Anchor box in window coordinates.
    pub anchor: Rect,
    /// Rendered panel height.
    pub panel_height: f32,
    /// Panel width; defaults to the anchor width.
    pub panel_width: Option<f32>,
    /// Window (client viewport) size.
    pub window: Size,
    /// Bounding rectangle of the configured scroll container, in window
    /// coordinates. Required for modal placement.
    pub viewport_rect: Option<Rect>,
    /// Offset-parent geometry for absolute placement.
    pub offset_parent: Option<OffsetParent>,
}

impl PlacementRequest {
    /// Create a request for an anchor inside a window.
    pub fn new(anchor: Rect, window: Size) -> Self {
        Self {
            anchor,
            window,
            ..Self::default()
        }
    }

    /// Set the panel height using builder pattern.
    pub fn with_panel_height(mut self, height: f32) -> Self {
        self.panel_height = height;
        self
    }

    /// Set the panel width using builder pattern.
    pub fn with_panel_width(mut self, width: f32) -> Self {
        self.panel_width = Some(width);
        self
    }

    /// Set the scroll container rectangle using builder pattern.
    pub fn with_viewport_rect(mut self, rect: Rect) -> Self {
        self.viewport_rect = Some(rect);
        self
    }

    /// Set the offset parent using builder pattern.
    pub fn with_offset_parent(mut self, parent: OffsetParent) -> Self {
        self.offset_parent = Some(parent);
        self
    }
}

/// Which horizontal edge the panel is pinned to, and at what distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HorizontalEdge {
    Left(f32),
    Right(f32),
}

/// Which vertical edge the panel is pinned to, and at what distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VerticalEdge {
    /// Panel opens downward from this offset.
    Top(f32),
    /// Panel opens upward; offset measured from the bottom.
    Bottom(f32),
}

/// A computed panel placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: PositionMode,
    pub horizontal: HorizontalEdge,
    pub vertical: VerticalEdge,
    pub width: f32,
}

impl Placement {
    /// Whether the panel opens above its anchor.
    pub fn is_flipped(&self) -> bool {
        matches!(self.vertical, VerticalEdge::Bottom(_))
    }

    /// Whether the panel is aligned to its anchor's right edge.
    pub fn is_right_aligned(&self) -> bool {
        matches!(self.horizontal, HorizontalEdge::Right(_))
    }

    /// CSS declarations for the panel's inline style.
    pub fn css_declarations(&self) -> Vec<(&'static str, String)> {
        let (h_name, h_value) = match self.horizontal {
            HorizontalEdge::Left(v) => ("left", v),
            HorizontalEdge::Right(v) => ("right", v),
        };
        let (v_name, v_value) = match self.vertical {
            VerticalEdge::Top(v) => ("top", v),
            VerticalEdge::Bottom(v) => ("bottom", v),
        };
        vec![
            ("position", self.position.as_css().to_string()),
            ("width", format!("{}px", self.width)),
            (h_name, format!("{h_value}px")),
            (v_name, format!("{v_value}px")),
        ]
    }
}

/// Computes panel placements for one widget configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Positioner {
    position: PositionMode,
    is_modal: bool,
    flip_threshold: f32,
}

impl Default for Positioner {
    fn default() -> Self {
        Self {
            position: PositionMode::Fixed,
            is_modal: false,
            flip_threshold: DEFAULT_FLIP_THRESHOLD,
        }
    }
}

impl Positioner {
    pub fn new(position: PositionMode, is_modal: bool, flip_threshold: f32) -> Self {
        Self {
            position,
            is_modal,
            flip_threshold,
        }
    }

    pub fn from_config(config: &SelectConfig) -> Self {
        Self::new(config.position, config.is_modal, config.flip_threshold)
    }

    /// Compute a placement.
    #[tracing::instrument(skip_all, target = "picklist::position", level = "trace")]
    pub fn place(&self, request: &PlacementRequest) -> Placement {
        let anchor = request.anchor;
        let width = request.panel_width.unwrap_or(anchor.width());

        // Modal widgets measure against their scroll container.
        let modal_bounds = if self.is_modal {
            if request.viewport_rect.is_none() {
                tracing::warn!(
                    target: targets::POSITION,
                    "modal placement without a viewport rectangle, using the window"
                );
            }
            request.viewport_rect
        } else {
            None
        };
        let bounds = modal_bounds.unwrap_or(Rect::from_size(request.window));

        let overflows_right = anchor.left() + width > bounds.right();
        let flip_up = match modal_bounds {
            Some(modal) => anchor.bottom() + request.panel_height > modal.bottom(),
            None => anchor.bottom() > bounds.top() + bounds.height() * self.flip_threshold,
        };

        let (horizontal, vertical) = match self.position {
            PositionMode::Fixed => {
                let origin = modal_bounds.map(|m| m.origin).unwrap_or_default();
                let horizontal = if overflows_right {
                    HorizontalEdge::Right(bounds.right() - anchor.right())
                } else {
                    HorizontalEdge::Left(anchor.left() - origin.x)
                };
                let vertical = if flip_up {
                    VerticalEdge::Bottom(bounds.bottom() - anchor.top())
                } else {
                    VerticalEdge::Top(anchor.bottom() - origin.y)
                };
                (horizontal, vertical)
            }
            PositionMode::Absolute => {
                let parent = request.offset_parent.unwrap_or_else(|| {
                    tracing::debug!(
                        target: targets::POSITION,
                        "no offset parent, measuring against the window"
                    );
                    OffsetParent::new(anchor, request.window)
                });
                let offset = parent.anchor;
                let horizontal = if overflows_right {
                    HorizontalEdge::Right(parent.client_size.width - offset.right())
                } else {
                    HorizontalEdge::Left(offset.left())
                };
                let vertical = if flip_up {
                    VerticalEdge::Bottom(parent.client_size.height - offset.top())
                } else {
                    VerticalEdge::Top(offset.bottom())
                };
                (horizontal, vertical)
            }
        };

        let placement = Placement {
            position: self.position,
            horizontal,
            vertical,
            width,
        };
        tracing::trace!(target: targets::POSITION, ?placement, "placed panel");
        placement
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Size = Size::new(1000.0, 800.0);

    fn fixed() -> Positioner {
        Positioner::default()
    }

    #[test]
    fn test_below_and_left_aligned() {
        let request = PlacementRequest::new(Rect::new(100.0, 100.0, 200.0, 30.0), WINDOW)
            .with_panel_height(150.0);
        let placement = fixed().place(&request);
        assert_eq!(placement.horizontal, HorizontalEdge::Left(100.0));
        assert_eq!(placement.vertical, VerticalEdge::Top(130.0));
        assert_eq!(placement.width, 200.0);
        assert!(!placement.is_flipped());
    }

    #[test]
    fn test_flips_up_past_threshold() {
        // bottom = 650 > 800 * 0.75 = 600
        let request = PlacementRequest::new(Rect::new(100.0, 620.0, 200.0, 30.0), WINDOW);
        let placement = fixed().place(&request);
        assert_eq!(placement.vertical, VerticalEdge::Bottom(800.0 - 620.0));
        assert!(placement.is_flipped());
    }

    #[test]
    fn test_threshold_boundary_stays_below() {
        // bottom = 600 == 800 * 0.75
        let request = PlacementRequest::new(Rect::new(0.0, 570.0, 100.0, 30.0), WINDOW);
        assert!(!fixed().place(&request).is_flipped());
    }

    #[test]
    fn test_custom_threshold() {
        let positioner = Positioner::new(PositionMode::Fixed, false, 0.5);
        let request = PlacementRequest::new(Rect::new(0.0, 400.0, 100.0, 30.0), WINDOW);
        assert!(positioner.place(&request).is_flipped());
    }

    #[test]
    fn test_right_aligned_on_overflow() {
        let request = PlacementRequest::new(Rect::new(850.0, 100.0, 100.0, 30.0), WINDOW)
            .with_panel_width(300.0);
        let placement = fixed().place(&request);
        assert_eq!(placement.horizontal, HorizontalEdge::Right(1000.0 - 950.0));
        assert_eq!(placement.width, 300.0);
        assert!(placement.is_right_aligned());
    }

    #[test]
    fn test_exact_fit_stays_left() {
        let request = PlacementRequest::new(Rect::new(900.0, 100.0, 100.0, 30.0), WINDOW);
        assert_eq!(fixed().place(&request).horizontal, HorizontalEdge::Left(900.0));
    }

    #[test]
    fn test_modal_flips_when_panel_would_overflow_container() {
        let positioner = Positioner::new(PositionMode::Fixed, true, DEFAULT_FLIP_THRESHOLD);
        let modal = Rect::new(200.0, 100.0, 400.0, 300.0);
        let request = PlacementRequest::new(Rect::new(250.0, 300.0, 100.0, 30.0), WINDOW)
            .with_panel_height(120.0)
            .with_viewport_rect(modal);
        let placement = positioner.place(&request);
        // 330 + 120 > 400
        assert_eq!(placement.vertical, VerticalEdge::Bottom(400.0 - 300.0));
        assert_eq!(placement.horizontal, HorizontalEdge::Left(50.0));
    }

    #[test]
    fn test_modal_below_uses_local_coordinates() {
        let positioner = Positioner::new(PositionMode::Fixed, true, DEFAULT_FLIP_THRESHOLD);
        let modal = Rect::new(200.0, 100.0, 400.0, 300.0);
        let request = PlacementRequest::new(Rect::new(250.0, 150.0, 100.0, 30.0), WINDOW)
            .with_panel_height(100.0)
            .with_viewport_rect(modal);
        let placement = positioner.place(&request);
        assert_eq!(placement.vertical, VerticalEdge::Top(80.0));
        assert_eq!(placement.horizontal, HorizontalEdge::Left(50.0));
    }

    #[test]
    fn test_modal_without_viewport_falls_back_to_window() {
        let positioner = Positioner::new(PositionMode::Fixed, true, DEFAULT_FLIP_THRESHOLD);
        let request = PlacementRequest::new(Rect::new(100.0, 620.0, 200.0, 30.0), WINDOW);
        let placement = positioner.place(&request);
        assert_eq!(placement.vertical, VerticalEdge::Bottom(180.0));
    }

    #[test]
    fn test_absolute_uses_offset_parent() {
        let positioner = Positioner::new(PositionMode::Absolute, false, DEFAULT_FLIP_THRESHOLD);
        let parent = OffsetParent::new(Rect::new(20.0, 40.0, 100.0, 30.0), Size::new(500.0, 400.0));
        let request = PlacementRequest::new(Rect::new(100.0, 100.0, 100.0, 30.0), WINDOW)
            .with_offset_parent(parent);
        let placement = positioner.place(&request);
        assert_eq!(placement.position, PositionMode::Absolute);
        assert_eq!(placement.horizontal, HorizontalEdge::Left(20.0));
        assert_eq!(placement.vertical, VerticalEdge::Top(70.0));
    }

    #[test]
    fn test_absolute_flipped_and_right_aligned() {
        let positioner = Positioner::new(PositionMode::Absolute, false, DEFAULT_FLIP_THRESHOLD);
        let parent = OffsetParent::new(Rect::new(300.0, 250.0, 100.0, 30.0), Size::new(500.0, 400.0));
        let request = PlacementRequest::new(Rect::new(900.0, 700.0, 100.0, 30.0), WINDOW)
            .with_panel_width(200.0)
            .with_offset_parent(parent);
        let placement = positioner.place(&request);
        assert_eq!(placement.horizontal, HorizontalEdge::Right(500.0 - 400.0));
        assert_eq!(placement.vertical, VerticalEdge::Bottom(400.0 - 250.0));
    }

    #[test]
    fn test_css_declarations() {
        let request = PlacementRequest::new(Rect::new(10.0, 20.0, 120.0, 20.0), WINDOW);
        let css = fixed().place(&request).css_declarations();
        assert_eq!(
            css,
            vec![
                ("position", "fixed".to_string()),
                ("width", "120px".to_string()),
                ("left", "10px".to_string()),
                ("top", "40px".to_string()),
            ]
        );
    }
}
