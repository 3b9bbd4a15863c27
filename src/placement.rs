//! Initial placement of newly visible windows.
//!
//! The first rule that applies wins:
//!
//! 1. cascade from the most recently opened sibling of the same scene,
//! 2. restore the scene's saved geometry descriptor,
//! 3. project the scene's default anchor onto the visible screen area,
//! 4. otherwise keep the position the OS picked (only applying a declared
//!    default size).

use crate::descriptor::GeometryDescriptor;
use crate::geometry::{Point, Rect, Size, UnitPoint};

#[derive(Debug, Clone, PartialEq)]
pub enum Placement {
    Cascade(Rect),
    Restore(GeometryDescriptor),
    /// Origin from the anchor, applied together with the size.
    Anchor(Rect),
    /// Keep the OS origin, apply the scene's default size.
    Resize(Size),
    Unchanged,
}

/// Everything the engine looks at for one window.
#[derive(Debug, Clone, Copy)]
pub struct PlacementRequest<'a> {
    pub current_frame: Rect,
    /// `None` while the window is not attached to a screen.
    pub visible_frame: Option<Rect>,
    pub sibling_frame: Option<Rect>,
    pub saved_geometry: Option<&'a GeometryDescriptor>,
    pub default_anchor: Option<UnitPoint>,
    pub default_size: Option<Size>,
    pub cascade_offset: f64,
}

pub fn plan(request: &PlacementRequest<'_>) -> Placement {
    if let Some(sibling) = request.sibling_frame {
        let frame = match request.visible_frame {
            Some(visible) => cascade_frame(sibling, visible, request.cascade_offset),
            None => {
                tracing::warn!("window is not attached to a screen; cascading unclamped");
                sibling.offset(request.cascade_offset, -request.cascade_offset)
            }
        };
        return Placement::Cascade(frame);
    }

    if let Some(saved) = request.saved_geometry {
        return Placement::Restore(saved.clone());
    }

    if let Some(anchor) = request.default_anchor {
        let size = request.default_size.unwrap_or(request.current_frame.size);
        let origin = anchor_origin_on(request.visible_frame, anchor, size);
        return Placement::Anchor(Rect::from_parts(origin, size));
    }

    match request.default_size {
        Some(size) => Placement::Resize(size),
        None => Placement::Unchanged,
    }
}

/// Offsets `sibling` down and to the right, then pulls it back inside
/// `visible`: a frame sticking out below is moved up against the top edge,
/// one sticking out to the right against the left edge.
pub fn cascade_frame(sibling: Rect, visible: Rect, offset: f64) -> Rect {
    let mut frame = sibling.offset(offset, -offset);
    if visible.contains_rect(&frame) {
        return frame;
    }
    tracing::debug!(%visible, %frame, "cascaded frame leaves visible area");
    if frame.min_y() < visible.min_y() {
        frame.origin.y = visible.max_y() - frame.height();
    }
    if frame.max_x() > visible.max_x() {
        frame.origin.x = visible.min_x();
    }
    frame
}

/// Projects a unit point onto `visible` for a window of `window_size`.
///
/// `(0, 0)` puts the window in the top-left corner of the visible area,
/// `(1, 1)` in the bottom-right one. The y axis is flipped because screen
/// coordinates grow upward.
pub fn anchor_origin(anchor: UnitPoint, window_size: Size, visible: Rect) -> Point {
    let free_width = visible.width() - window_size.width;
    let free_height = visible.height() - window_size.height;
    Point::new(
        visible.min_x() + (anchor.x * free_width).clamp(0.0, visible.width().max(0.0)),
        visible.min_y() + ((1.0 - anchor.y) * free_height).max(0.0),
    )
}

fn anchor_origin_on(visible: Option<Rect>, anchor: UnitPoint, window_size: Size) -> Point {
    match visible {
        Some(visible) => anchor_origin(anchor, window_size, visible),
        None => {
            tracing::warn!("window is not attached to a screen; using zero origin");
            Point::ZERO
        }
    }
}
