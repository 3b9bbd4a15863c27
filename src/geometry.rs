//! Screen-space geometry primitives.
//!
//! Frames use desktop coordinates where the y axis grows upward and a
//! rectangle's origin is its bottom-left corner. `UnitPoint` is the one
//! exception: it is a normalized, y-down position where `(0, 0)` is the
//! top-left of an area and `(1, 1)` its bottom-right.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn from_parts(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    pub fn min_x(&self) -> f64 {
        self.origin.x
    }

    pub fn min_y(&self) -> f64 {
        self.origin.y
    }

    pub fn max_x(&self) -> f64 {
        self.origin.x + self.size.width
    }

    pub fn max_y(&self) -> f64 {
        self.origin.y + self.size.height
    }

    pub fn width(&self) -> f64 {
        self.size.width
    }

    pub fn height(&self) -> f64 {
        self.size.height
    }

    /// Whether `other` lies entirely within `self` (edges inclusive).
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.min_x() >= self.min_x()
            && other.min_y() >= self.min_y()
            && other.max_x() <= self.max_x()
            && other.max_y() <= self.max_y()
    }

    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.min_x()
            && point.x <= self.max_x()
            && point.y >= self.min_y()
            && point.y <= self.max_y()
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.origin.x + dx, self.origin.y + dy, self.size.width, self.size.height)
    }

    pub fn with_origin(&self, origin: Point) -> Rect {
        Rect::from_parts(origin, self.size)
    }

    pub fn with_size(&self, size: Size) -> Rect {
        Rect::from_parts(self.origin, size)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.origin.x, self.origin.y, self.size.width, self.size.height
        )
    }
}

/// Normalized position inside an area, independent of its resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitPoint {
    pub x: f64,
    pub y: f64,
}

impl UnitPoint {
    pub const TOP_LEADING: UnitPoint = UnitPoint { x: 0.0, y: 0.0 };
    pub const CENTER: UnitPoint = UnitPoint { x: 0.5, y: 0.5 };
    pub const BOTTOM_TRAILING: UnitPoint = UnitPoint { x: 1.0, y: 1.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_rect_is_edge_inclusive() {
        let bounds = Rect::new(0.0, 0.0, 1000.0, 800.0);
        assert!(bounds.contains_rect(&Rect::new(0.0, 0.0, 1000.0, 800.0)));
        assert!(bounds.contains_rect(&Rect::new(600.0, 600.0, 400.0, 200.0)));
        assert!(!bounds.contains_rect(&Rect::new(601.0, 0.0, 400.0, 200.0)));
        assert!(!bounds.contains_rect(&Rect::new(10.0, -1.0, 400.0, 200.0)));
    }

    #[test]
    fn offset_keeps_size() {
        let r = Rect::new(100.0, 100.0, 400.0, 300.0).offset(29.0, -29.0);
        assert_eq!(r, Rect::new(129.0, 71.0, 400.0, 300.0));
        assert_eq!(r.max_x(), 529.0);
        assert_eq!(r.max_y(), 371.0);
    }

    #[test]
    fn rect_serializes_as_nested_object() {
        let json = serde_json::to_string(&Rect::new(1.0, 2.0, 3.0, 4.5)).unwrap();
        assert_eq!(
            json,
            r#"{"origin":{"x":1.0,"y":2.0},"size":{"width":3.0,"height":4.5}}"#
        );
        let back: Rect = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rect::new(1.0, 2.0, 3.0, 4.5));
    }

    #[test]
    fn empty_size() {
        assert!(Size::new(0.0, 10.0).is_empty());
        assert!(!Size::new(1.0, 1.0).is_empty());
    }
}
