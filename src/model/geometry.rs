//! Bounding-box primitives and spatial predicates.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in page coordinates.
///
/// The origin is the top-left corner of the page and `y` grows downwards,
/// so a smaller `y0` means "higher on the page".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl BBox {
    /// Create a new bounding box without checking its invariants.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Check the `x0 < x1, y0 < y1` invariant and finiteness.
    pub fn is_valid(&self) -> bool {
        [self.x0, self.y0, self.x1, self.y1]
            .iter()
            .all(|v| v.is_finite())
            && self.x0 < self.x1
            && self.y0 < self.y1
    }

    pub fn width(&self) -> f32 {
        (self.x1 - self.x0).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.y1 - self.y0).max(0.0)
    }

    pub fn center(&self) -> (f32, f32) {
        ((self.x0 + self.x1) * 0.5, (self.y0 + self.y1) * 0.5)
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Whether `other` lies entirely inside this box.
    pub fn contains(&self, other: &Self) -> bool {
        other.x0 >= self.x0 && other.x1 <= self.x1 && other.y0 >= self.y0 && other.y1 <= self.y1
    }

    /// Whether the point `x` falls within the horizontal extent.
    pub fn contains_x(&self, x: f32) -> bool {
        x >= self.x0 && x <= self.x1
    }

    /// Horizontal distance between the two boxes, `0.0` when they overlap
    /// horizontally.
    pub fn horizontal_gap(&self, other: &Self) -> f32 {
        if other.x0 >= self.x1 {
            other.x0 - self.x1
        } else if self.x0 >= other.x1 {
            self.x0 - other.x1
        } else {
            0.0
        }
    }

    /// Vertical distance between the two boxes, `0.0` when they overlap
    /// vertically.
    pub fn vertical_gap(&self, other: &Self) -> f32 {
        if other.y0 >= self.y1 {
            other.y0 - self.y1
        } else if self.y0 >= other.y1 {
            self.y0 - other.y1
        } else {
            0.0
        }
    }

    /// Whether this box starts above `other` (top-to-bottom order).
    pub fn is_above(&self, other: &Self) -> bool {
        self.y0 < other.y0
    }

    /// Whether this box starts left of `other` (left-to-right order).
    pub fn is_left_of(&self, other: &Self) -> bool {
        self.x0 < other.x0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_validity() {
        assert!(BBox::new(0.0, 0.0, 10.0, 10.0).is_valid());
        assert!(!BBox::new(10.0, 0.0, 10.0, 10.0).is_valid());
        assert!(!BBox::new(0.0, 5.0, 10.0, 1.0).is_valid());
        assert!(!BBox::new(0.0, 0.0, f32::NAN, 10.0).is_valid());
    }

    #[test]
    fn test_horizontal_gap() {
        let left = BBox::new(50.0, 100.0, 250.0, 120.0);
        let right = BBox::new(350.0, 100.0, 550.0, 120.0);
        assert_eq!(left.horizontal_gap(&right), 100.0);
        assert_eq!(right.horizontal_gap(&left), 100.0);

        let overlapping = BBox::new(200.0, 0.0, 300.0, 10.0);
        assert_eq!(left.horizontal_gap(&overlapping), 0.0);
    }

    #[test]
    fn test_containment_and_ordering() {
        let page = BBox::new(0.0, 0.0, 612.0, 792.0);
        let line = BBox::new(50.0, 100.0, 250.0, 120.0);
        assert!(page.contains(&line));
        assert!(!line.contains(&page));
        assert!(line.contains_x(50.0));
        assert!(!line.contains_x(251.0));

        let below = BBox::new(50.0, 130.0, 250.0, 150.0);
        assert!(line.is_above(&below));
        assert_eq!(line.vertical_gap(&below), 10.0);
        assert!(!below.is_left_of(&line));
    }

    #[test]
    fn test_union() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BBox::new(5.0, 5.0, 15.0, 20.0);
        assert_eq!(a.union(&b), BBox::new(0.0, 0.0, 15.0, 20.0));
        assert_eq!(b.center(), (10.0, 12.5));
    }
}
