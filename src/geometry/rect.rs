//! Bounding rectangles and rim intersection.

use super::vector::{Point, Vector};

/// Axis-aligned rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Smallest rectangle containing every point. `None` for an empty slice.
    pub fn enclosing(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        Rect::new(
            left,
            top,
            self.right().max(other.right()) - left,
            self.bottom().max(other.bottom()) - top,
        )
    }

    /// Corners clockwise from top-left, pushed outward by `offset`.
    /// A negative offset pulls them inward.
    pub fn corners(&self, offset: f64) -> [Point; 4] {
        [
            Point::new(self.left - offset, self.top - offset),
            Point::new(self.right() + offset, self.top - offset),
            Point::new(self.right() + offset, self.bottom() + offset),
            Point::new(self.left - offset, self.bottom() + offset),
        ]
    }

    /// Edges as clockwise vectors: top, right, bottom, left.
    pub fn edges(&self, offset: f64) -> [Vector; 4] {
        let c = self.corners(offset);
        [
            Vector::between(c[0], c[1]),
            Vector::between(c[1], c[2]),
            Vector::between(c[2], c[3]),
            Vector::between(c[3], c[0]),
        ]
    }

    /// First point where the segment `(x1, y1) -> (x2, y2)` crosses the rim,
    /// testing edges top, right, bottom, left in that order.
    pub fn rim_intersection(&self, x1: f64, y1: f64, x2: f64, y2: f64, offset: f64) -> Option<Point> {
        let ray = Vector::new(x1, y1, x2, y2);
        self.edges(offset)
            .iter()
            .find_map(|edge| edge.intersection(&ray))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners_with_offset() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        let c = r.corners(5.0);
        assert_eq!(c[0], Point::new(5.0, 15.0));
        assert_eq!(c[1], Point::new(115.0, 15.0));
        assert_eq!(c[2], Point::new(115.0, 75.0));
        assert_eq!(c[3], Point::new(5.0, 75.0));
    }

    #[test]
    fn test_negative_offset_shrinks() {
        let r = Rect::new(0.0, 0.0, 100.0, 100.0);
        let c = r.corners(-6.0);
        assert_eq!(c[0], Point::new(6.0, 6.0));
        assert_eq!(c[2], Point::new(94.0, 94.0));
    }

    #[test]
    fn test_rim_intersection_from_center() {
        let r = Rect::new(0.0, 0.0, 100.0, 100.0);
        // Ray from the center heading right leaves through the right edge.
        let p = r.rim_intersection(50.0, 50.0, 300.0, 50.0, 0.0).unwrap();
        assert_eq!(p, Point::new(100.0, 50.0));

        let p = r.rim_intersection(50.0, 50.0, 50.0, -200.0, 0.0).unwrap();
        assert_eq!(p, Point::new(50.0, 0.0));
    }

    #[test]
    fn test_rim_intersection_with_offset() {
        let r = Rect::new(0.0, 0.0, 100.0, 100.0);
        let p = r.rim_intersection(50.0, 50.0, 300.0, 50.0, 10.0).unwrap();
        assert_eq!(p, Point::new(110.0, 50.0));
        let p = r.rim_intersection(50.0, 50.0, 300.0, 50.0, -6.0).unwrap();
        assert_eq!(p, Point::new(94.0, 50.0));
    }

    #[test]
    fn test_rim_intersection_order() {
        let r = Rect::new(0.0, 0.0, 100.0, 100.0);
        // Passes straight through: crosses top first in test order.
        let p = r.rim_intersection(50.0, -50.0, 50.0, 150.0, 0.0).unwrap();
        assert_eq!(p, Point::new(50.0, 0.0));
    }

    #[test]
    fn test_no_rim_intersection() {
        let r = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(r.rim_intersection(10.0, 10.0, 90.0, 90.0, 0.0).is_none());
        assert!(r.rim_intersection(200.0, 0.0, 300.0, 100.0, 0.0).is_none());
    }

    #[test]
    fn test_enclosing_and_union() {
        let pts = [Point::new(3.0, -1.0), Point::new(-2.0, 4.0), Point::new(0.0, 0.0)];
        let r = Rect::enclosing(&pts).unwrap();
        assert_eq!(r, Rect::new(-2.0, -1.0, 5.0, 5.0));
        assert!(Rect::enclosing(&[]).is_none());

        let u = Rect::new(0.0, 0.0, 1.0, 1.0).union(&Rect::new(5.0, 5.0, 1.0, 2.0));
        assert_eq!(u, Rect::new(0.0, 0.0, 6.0, 7.0));
    }
}
