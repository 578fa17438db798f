//! Line-segment math in canvas coordinates.

use serde::{Deserialize, Serialize};

/// A point on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Directed segment `(x1, y1) -> (x2, y2)`.
///
/// Vectors are scratch values; nothing stores them between calls.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Vector {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn between(from: Point, to: Point) -> Self {
        Self::new(from.x, from.y, to.x, to.y)
    }

    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    fn dx(&self) -> f64 {
        self.x2 - self.x1
    }

    fn dy(&self) -> f64 {
        self.y2 - self.y1
    }

    pub fn length(&self) -> f64 {
        self.dx().hypot(self.dy())
    }

    /// 2-D cross product of the two directions. Positive when `other`
    /// turns counter-clockwise from `self` (y pointing up).
    pub fn cross(&self, other: &Vector) -> f64 {
        self.dx() * other.dy() - other.dx() * self.dy()
    }

    pub fn dot(&self, other: &Vector) -> f64 {
        self.dx() * other.dx() + self.dy() * other.dy()
    }

    /// Point where `self` and `other` strictly cross, lying on `self`.
    ///
    /// Touching, collinear and parallel segments return `None`: each pair of
    /// endpoints has to sit strictly on opposite sides of the other segment.
    pub fn intersection(&self, other: &Vector) -> Option<Point> {
        let a_to_c = Vector::new(self.x1, self.y1, other.x1, other.y1);
        let a_to_d = Vector::new(self.x1, self.y1, other.x2, other.y2);
        let b_to_c = Vector::new(self.x2, self.y2, other.x1, other.y1);
        let b_to_d = Vector::new(self.x2, self.y2, other.x2, other.y2);

        // Sides of other's endpoints relative to self.
        let side_c = a_to_c.cross(&b_to_c);
        let side_d = a_to_d.cross(&b_to_d);
        if side_c * side_d >= 0.0 {
            return None;
        }

        // Sides of self's endpoints relative to other.
        let side_a = a_to_c.cross(&a_to_d);
        let side_b = b_to_c.cross(&b_to_d);
        if side_a * side_b >= 0.0 {
            return None;
        }

        let t = side_a / (side_d - side_c);
        Some(Point::new(self.x1 + t * self.dx(), self.y1 + t * self.dy()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-6;

    fn on_segment(v: &Vector, p: Point) -> bool {
        let to_p = Vector::between(v.start(), p);
        let collinear = v.cross(&to_p).abs() <= EPS * v.length().max(1.0) * to_p.length().max(1.0);
        let min_x = v.x1.min(v.x2) - EPS;
        let max_x = v.x1.max(v.x2) + EPS;
        let min_y = v.y1.min(v.y2) - EPS;
        let max_y = v.y1.max(v.y2) + EPS;
        collinear && p.x >= min_x && p.x <= max_x && p.y >= min_y && p.y <= max_y
    }

    #[test]
    fn test_length() {
        assert_eq!(Vector::new(0.0, 0.0, 3.0, 4.0).length(), 5.0);
        assert_eq!(Vector::new(1.0, 1.0, 1.0, 1.0).length(), 0.0);
    }

    #[test]
    fn test_cross_sign() {
        let east = Vector::new(0.0, 0.0, 1.0, 0.0);
        let north = Vector::new(0.0, 0.0, 0.0, 1.0);
        assert!(east.cross(&north) > 0.0);
        assert!(north.cross(&east) < 0.0);
        assert_eq!(east.cross(&east), 0.0);
    }

    #[test]
    fn test_dot() {
        let a = Vector::new(1.0, 1.0, 3.0, 1.0);
        let b = Vector::new(0.0, 0.0, 0.0, 5.0);
        assert_eq!(a.dot(&b), 0.0);
        assert_eq!(a.dot(&a), 4.0);
    }

    #[test]
    fn test_crossing_diagonals() {
        let a = Vector::new(0.0, 0.0, 2.0, 2.0);
        let b = Vector::new(0.0, 2.0, 2.0, 0.0);
        assert_eq!(a.intersection(&b), Some(Point::new(1.0, 1.0)));
    }

    #[test]
    fn test_disjoint_segments() {
        let a = Vector::new(0.0, 0.0, 1.0, 1.0);
        let b = Vector::new(3.0, 0.0, 2.0, 1.0);
        assert_eq!(a.intersection(&b), None);
    }

    #[test]
    fn test_parallel_and_collinear() {
        let a = Vector::new(0.0, 0.0, 4.0, 0.0);
        assert_eq!(a.intersection(&Vector::new(0.0, 1.0, 4.0, 1.0)), None);
        assert_eq!(a.intersection(&Vector::new(1.0, 0.0, 6.0, 0.0)), None);
    }

    #[test]
    fn test_touching_endpoint_is_not_crossing() {
        let a = Vector::new(0.0, 0.0, 2.0, 0.0);
        let b = Vector::new(2.0, 0.0, 2.0, 3.0);
        assert_eq!(a.intersection(&b), None);
    }

    proptest! {
        #[test]
        fn crossing_point_lies_on_both_segments(
            cx in -500.0f64..500.0,
            cy in -500.0f64..500.0,
            a1 in 0.05f64..3.0,
            a2 in 0.05f64..3.0,
            b1 in 0.05f64..3.0,
            b2 in 0.05f64..3.0,
            angle_a in 0.0f64..std::f64::consts::PI,
            turn in 0.2f64..2.9,
        ) {
            // Two segments through (cx, cy) with distinct directions always cross strictly.
            let angle_b = angle_a + turn;
            let (sa, ca) = angle_a.sin_cos();
            let (sb, cb) = angle_b.sin_cos();
            let scale = 40.0;
            let a = Vector::new(cx - ca * a1 * scale, cy - sa * a1 * scale, cx + ca * a2 * scale, cy + sa * a2 * scale);
            let b = Vector::new(cx - cb * b1 * scale, cy - sb * b1 * scale, cx + cb * b2 * scale, cy + sb * b2 * scale);

            let p = a.intersection(&b);
            prop_assert!(p.is_some());
            let p = p.unwrap();
            prop_assert!(on_segment(&a, p));
            prop_assert!(on_segment(&b, p));
        }

        #[test]
        fn separated_segments_never_cross(
            x in -500.0f64..500.0,
            y in -500.0f64..500.0,
            len in 1.0f64..200.0,
            gap in 1.0f64..100.0,
            rise in -200.0f64..200.0,
        ) {
            // b lives entirely to the right of a's bounding box.
            let a = Vector::new(x, y, x + len, y + rise);
            let b = Vector::new(x + len + gap, y - 300.0, x + len + gap, y + 300.0);
            prop_assert_eq!(a.intersection(&b), None);
        }
    }
}
