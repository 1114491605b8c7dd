//! Page-space geometry.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in page space.
///
/// The origin is the top-left corner of the page and `y` grows downward,
/// so `y0` is the top edge and `y1` the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl Rect {
    /// Create a rectangle from its edges.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Create a rectangle from an origin and a size, normalizing negative sizes.
    pub fn from_origin_size(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x0: x.min(x + width),
            y0: y.min(y + height),
            x1: x.max(x + width),
            y1: y.max(y + height),
        }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Center point as `(x, y)`.
    pub fn center(&self) -> (f32, f32) {
        ((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }

    /// Check whether a point lies inside the rectangle (edges included).
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        self.x0 <= x && x <= self.x1 && self.y0 <= y && y <= self.y1
    }

    /// Check whether the center of `other` lies inside this rectangle.
    pub fn contains_center_of(&self, other: &Rect) -> bool {
        let (cx, cy) = other.center();
        self.contains_point(cx, cy)
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_origin_size_normalizes() {
        let r = Rect::from_origin_size(100.0, 50.0, -20.0, 10.0);
        assert_eq!(r, Rect::new(80.0, 50.0, 100.0, 60.0));
        assert_eq!(r.width(), 20.0);
        assert_eq!(r.height(), 10.0);
    }

    #[test]
    fn test_contains_center_of() {
        let table = Rect::new(50.0, 100.0, 500.0, 300.0);
        let inside = Rect::new(60.0, 150.0, 200.0, 162.0);
        let straddling = Rect::new(40.0, 290.0, 200.0, 330.0);
        assert!(table.contains_center_of(&inside));
        assert!(!table.contains_center_of(&straddling));
    }

    #[test]
    fn test_union() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, -5.0, 20.0, 8.0);
        assert_eq!(a.union(&b), Rect::new(0.0, -5.0, 20.0, 10.0));
    }
}
